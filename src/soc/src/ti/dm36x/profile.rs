//! Supported board clock and memory profiles.
//!
//! One row per oscillator / ARM clock / DDR clock combination. The values
//! are register images validated on hardware and must not be "corrected".

use super::ddr::MemoryTimingProfile;
use super::pll::PllParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    /// Lookup key
    pub name: &'static str,
    /// Device string reported to the host tools
    pub banner: &'static str,
    pub osc_hz: u32,
    pub pll1: PllParams,
    pub pll2: PllParams,
    /// PERI_CLKCTRL image, applied once both PLLs run
    pub clock_control: u32,
    pub ddr: MemoryTimingProfile,
}

/// ARM 297 MHz, DDR 243 MHz, 24 MHz oscillator. Differs from
/// `arm297-ddr243-osc24` in the VENC, SDMMC and PLL2 divider 3 settings.
pub const DEFAULT: Profile = Profile {
    name: "default",
    banner: "DM365_297",
    osc_hz: 24_000_000,
    pll1: PllParams {
        multiplier: 81,
        pre_divider: 7,
        post_divider: 0,
        dividers: &[0, 1, 1, 3, 1, 11, 0, 4, 1],
    },
    pll2: PllParams {
        multiplier: 99,
        pre_divider: 7,
        post_divider: 0,
        dividers: &[0, 1, 1, 28, 7],
    },
    clock_control: 0x243f_04fc,
    ddr: MemoryTimingProfile {
        phycr: 0x0000_00c5,
        sdbcr: 0x0853_4832,
        sdtimr: 0x3c93_4b51,
        sdtimr2: 0x4221_c702,
        pbbpr: 0x0000_00fe,
        sdrcr: 0x0000_0768,
    },
};

pub static PROFILES: &[Profile] = &[
    DEFAULT,
    Profile {
        name: "arm216-ddr173-osc19p2",
        banner: "DM365_216",
        osc_hz: 19_200_000,
        pll1: PllParams {
            multiplier: 45,
            pre_divider: 3,
            post_divider: 0,
            dividers: &[0, 1, 1, 3, 3, 15, 0, 3, 1],
        },
        pll2: PllParams {
            multiplier: 224,
            pre_divider: 24,
            post_divider: 0,
            dividers: &[0, 0, 0, 6, 0],
        },
        clock_control: 0x0bff_05fc,
        ddr: MemoryTimingProfile {
            phycr: 0x0000_00c5,
            sdbcr: 0x0853_4832,
            sdtimr: 0x2c92_3251,
            sdtimr2: 0x4217_c722,
            pbbpr: 0x0000_00fe,
            sdrcr: 0x0000_0546,
        },
    },
    Profile {
        name: "arm270-ddr216-osc27",
        banner: "DM365_270",
        osc_hz: 27_000_000,
        pll1: PllParams {
            multiplier: 9,
            pre_divider: 0,
            post_divider: 0,
            dividers: &[0, 1, 1, 3, 3, 15, 0, 3, 1],
        },
        pll2: PllParams {
            multiplier: 45,
            pre_divider: 7,
            post_divider: 0,
            dividers: &[0, 0, 0, 5, 9],
        },
        clock_control: 0x243f_04fc,
        ddr: MemoryTimingProfile {
            phycr: 0x0000_00c5,
            sdbcr: 0x0853_4832,
            sdtimr: 0x3693_42d1,
            sdtimr2: 0x421d_c702,
            pbbpr: 0x0000_00fe,
            sdrcr: 0x0000_0695,
        },
    },
    Profile {
        name: "arm297-ddr243-osc24",
        banner: "DM365_297",
        osc_hz: 24_000_000,
        pll1: PllParams {
            multiplier: 81,
            pre_divider: 7,
            post_divider: 0,
            dividers: &[0, 1, 1, 3, 1, 17, 0, 3, 1],
        },
        pll2: PllParams {
            multiplier: 99,
            pre_divider: 7,
            post_divider: 0,
            dividers: &[0, 1, 0, 28, 7],
        },
        clock_control: 0x243f_04fc,
        ddr: MemoryTimingProfile {
            phycr: 0x0000_00c5,
            sdbcr: 0x0853_4832,
            sdtimr: 0x3c93_4b51,
            sdtimr2: 0x4221_c702,
            pbbpr: 0x0000_00fe,
            sdrcr: 0x0000_0768,
        },
    },
    Profile {
        name: "arm297-ddr270-osc24",
        banner: "DM365_297",
        osc_hz: 24_000_000,
        pll1: PllParams {
            multiplier: 45,
            pre_divider: 3,
            post_divider: 0,
            dividers: &[0, 1, 1, 3, 1, 19, 0, 3, 1],
        },
        pll2: PllParams {
            multiplier: 99,
            pre_divider: 7,
            post_divider: 0,
            dividers: &[0, 1, 0, 28, 7],
        },
        clock_control: 0x243f_04fc,
        ddr: MemoryTimingProfile {
            phycr: 0x0000_00c6,
            sdbcr: 0x0053_4a32,
            sdtimr: 0x4524_5392,
            sdtimr2: 0x4225_c742,
            pbbpr: 0x0000_00fe,
            sdrcr: 0x0000_083a,
        },
    },
    Profile {
        name: "arm297-ddr277-osc27",
        banner: "DM365_297",
        osc_hz: 27_000_000,
        pll1: PllParams {
            multiplier: 44,
            pre_divider: 3,
            post_divider: 0,
            dividers: &[0, 1, 1, 3, 3, 21, 0, 3, 1],
        },
        pll2: PllParams {
            multiplier: 256,
            pre_divider: 24,
            post_divider: 0,
            dividers: &[0, 0, 0, 8, 0],
        },
        clock_control: 0x0bff_077c,
        ddr: MemoryTimingProfile {
            phycr: 0x0000_00c5,
            sdbcr: 0x0853_4832,
            sdtimr: 0x4adc_5c1a,
            sdtimr2: 0x4adc_5c1a,
            pbbpr: 0x0000_00fe,
            sdrcr: 0x0000_090d,
        },
    },
    Profile {
        name: "arm445-ddr351-osc24",
        banner: "DM365_445 DDR 351",
        osc_hz: 24_000_000,
        pll1: PllParams {
            multiplier: 0x75,
            pre_divider: 0x7,
            post_divider: 0,
            dividers: &[0x1b, 0x1, 0x1, 0x3, 0x1, 0x19, 0x0, 0x6, 0x1b],
        },
        pll2: PllParams {
            multiplier: 0xe8,
            pre_divider: 0x18,
            post_divider: 0,
            dividers: &[0x11, 0x0, 0x1, 0x5, 0x16],
        },
        clock_control: 0x243f_04fc,
        ddr: MemoryTimingProfile {
            phycr: 0x0000_00c5,
            sdbcr: 0x0853_4a32,
            sdtimr: 0x5725_6c9a,
            sdtimr2: 0x442e_c742,
            pbbpr: 0x0000_00fe,
            sdrcr: 0x0000_090d,
        },
    },
    Profile {
        name: "arm432-ddr340-osc24",
        banner: "DM365_432 DDR 340",
        osc_hz: 24_000_000,
        pll1: PllParams {
            multiplier: 85,
            pre_divider: 5,
            post_divider: 0,
            dividers: &[0x1b, 1, 1, 3, 1, 8, 0, 6, 0x1b],
        },
        pll2: PllParams {
            multiplier: 0x9,
            pre_divider: 0x0,
            post_divider: 0,
            dividers: &[0x11, 0, 1, 0x14, 0x0f],
        },
        clock_control: 0x343f_04fc,
        ddr: MemoryTimingProfile {
            phycr: 0x0000_00c5,
            sdbcr: 0x0853_4832,
            sdtimr: 0x5725_6c9a,
            sdtimr2: 0x442e_c742,
            pbbpr: 0x0000_00fe,
            sdrcr: 2652,
        },
    },
    Profile {
        name: "arm216-ddr173-osc24",
        banner: "DM365_297_OSC24",
        osc_hz: 24_000_000,
        pll1: PllParams {
            multiplier: 0x73,
            pre_divider: 0x0f,
            post_divider: 0,
            dividers: &[0xd, 1, 1, 3, 1, 0xc, 0, 3, 0x1],
        },
        pll2: PllParams {
            multiplier: 0x12,
            pre_divider: 0x1,
            post_divider: 0,
            dividers: &[0x11, 0x1, 1, 0x14, 0xf],
        },
        clock_control: 0x343f_04fc,
        ddr: MemoryTimingProfile {
            phycr: 0x0000_00c6,
            sdbcr: 0x0853_4a32,
            sdtimr: 0x2cda_3ac9,
            sdtimr2: 0x9c17_c723,
            pbbpr: 0x0000_00fe,
            sdrcr: 0x545,
        },
    },
];

pub fn by_name(name: &str) -> Option<&'static Profile> {
    PROFILES.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ti::dm36x::pll::PllId;

    #[test]
    fn default_is_first() {
        assert_eq!(by_name("default"), Some(&PROFILES[0]));
        assert_eq!(PROFILES[0], DEFAULT);
    }

    #[test]
    fn names_unique() {
        for (i, a) in PROFILES.iter().enumerate() {
            for b in &PROFILES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
        assert!(by_name("arm999").is_none());
    }

    #[test]
    fn every_row_fits_the_controllers() {
        for p in PROFILES {
            assert_eq!(p.pll1.validate(PllId::Pll1), Ok(()), "{}", p.name);
            assert_eq!(p.pll2.validate(PllId::Pll2), Ok(()), "{}", p.name);
            assert_eq!(p.pll1.dividers.len(), 9, "{}", p.name);
            assert_eq!(p.pll2.dividers.len(), 5, "{}", p.name);
        }
    }

    #[test]
    fn named_variants_keep_their_differences() {
        let named = by_name("arm297-ddr243-osc24").unwrap();
        assert_eq!(named.pll1.multiplier, DEFAULT.pll1.multiplier);
        assert_eq!(named.pll1.dividers[5], 17);
        assert_eq!(DEFAULT.pll1.dividers[5], 11);
        assert_eq!(named.pll2.dividers[2], 0);
        assert_eq!(DEFAULT.pll2.dividers[2], 1);
        assert_eq!(named.ddr, DEFAULT.ddr);
    }
}
