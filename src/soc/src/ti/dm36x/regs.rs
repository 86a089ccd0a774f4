//! DM36x register map.
//!
//! Only the blocks and fields the bring-up sequence touches are described.
//! Offsets follow the DM36x ARM subsystem and peripheral reference guides.

#![allow(non_upper_case_globals)]

use tock_registers::register_bitfields;

use crate::bank::Reg;

pub const SYSTEM_BASE: usize = 0x01C4_0000;
pub const PLLC1_BASE: usize = 0x01C4_0800;
pub const PLLC2_BASE: usize = 0x01C4_0C00;
pub const PSC_BASE: usize = 0x01C4_1000;
pub const AINTC_BASE: usize = 0x01C4_8000;
pub const UART0_BASE: usize = 0x01C2_0000;
pub const I2C0_BASE: usize = 0x01C2_1000;
pub const TIMER0_BASE: usize = 0x01C2_1400;
/// Timer 2 doubles as the watchdog.
pub const WDT_BASE: usize = 0x01C2_1C00;
pub const GPIO_BASE: usize = 0x01C6_7000;
pub const AEMIF_BASE: usize = 0x01D1_0000;
pub const DDR_BASE: usize = 0x2000_0000;

/// Words at the top of ARM internal RAM that the boot ROM leaves alone and
/// nothing initialises across a warm reset.
pub const SCRATCH_SENTINEL: usize = 0x0001_7FF8;
pub const SCRATCH_STATUS: usize = 0x0001_7FF0;

register_bitfields! [u32,
    pub RSTYPE [
        /// Power-on reset
        POR OFFSET(0) NUMBITS(1) [],
        /// External warm reset
        XWRST OFFSET(1) NUMBITS(1) []
    ],
    pub PLLCTL [
        PLLEN OFFSET(0) NUMBITS(1) [
            Bypass = 0,
            Pll = 1
        ],
        PLLPWRDN OFFSET(1) NUMBITS(1) [],
        PLLRST OFFSET(3) NUMBITS(1) [],
        /// PLLEN is only honoured from the register while this is clear.
        PLLENSRC OFFSET(5) NUMBITS(1) [],
        CLKMODE OFFSET(8) NUMBITS(1) [
            Oscillator = 0,
            SquareWave = 1
        ]
    ],
    pub SECCTL [
        TINITZ OFFSET(16) NUMBITS(1) [],
        TENABLE OFFSET(17) NUMBITS(1) [],
        TENABLEDIV OFFSET(18) NUMBITS(1) [],
        STOPMODE OFFSET(22) NUMBITS(1) []
    ],
    pub PLLM [
        MULT OFFSET(0) NUMBITS(10) []
    ],
    /// PREDIV, POSTDIV and PLLDIV1..9 share this layout.
    pub PLLDIV [
        RATIO OFFSET(0) NUMBITS(5) [],
        DEN OFFSET(15) NUMBITS(1) []
    ],
    pub PLLCMD [
        GOSET OFFSET(0) NUMBITS(1) []
    ],
    pub PLL_CONFIG [
        LOCK OFFSET(24) NUMBITS(3) [
            Locked = 0b111
        ]
    ],
    pub VPSS_CLKCTL [
        VPSS_CLKMD OFFSET(7) NUMBITS(1) [
            Half = 0,
            Full = 1
        ]
    ],
    pub VTPIOCR [
        PWRDN OFFSET(6) NUMBITS(1) [],
        LOCK OFFSET(7) NUMBITS(1) [],
        PWRSAVE OFFSET(8) NUMBITS(1) [],
        CLRZ OFFSET(13) NUMBITS(1) [],
        IOPWRDN OFFSET(14) NUMBITS(1) [],
        READY OFFSET(15) NUMBITS(1) []
    ],
    pub BOOTCFG [
        BTSEL OFFSET(0) NUMBITS(3) [
            Nand = 0,
            Nor = 1,
            SdMmc = 2,
            Uart = 3,
            Usb = 4,
            Spi = 5,
            Emac = 6,
            Hpi = 7
        ],
        EM_WIDTH OFFSET(5) NUMBITS(1) [
            Bits8 = 0,
            Bits16 = 1
        ]
    ],
    pub PTCMD [
        GO OFFSET(0) NUMBITS(2) []
    ],
    pub PTSTAT [
        GOSTAT OFFSET(0) NUMBITS(2) []
    ],
    pub MDCTL [
        NEXT OFFSET(0) NUMBITS(5) [
            SwRstDisable = 0,
            SyncReset = 1,
            Disable = 2,
            Enable = 3
        ]
    ],
    pub MDSTAT [
        STATE OFFSET(0) NUMBITS(5) []
    ],
    pub SDBCR [
        TIMUNLOCK OFFSET(15) NUMBITS(1) [],
        BOOTUNLOCK OFFSET(23) NUMBITS(1) []
    ],
    pub ICMDR [
        IRS OFFSET(5) NUMBITS(1) []
    ]
];

/// A PLL controller instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pllc {
    base: usize,
}

pub const PLLC1: Pllc = Pllc { base: PLLC1_BASE };
pub const PLLC2: Pllc = Pllc { base: PLLC2_BASE };

impl Pllc {
    pub const fn rstype(self) -> Reg<RSTYPE::Register> {
        Reg::new(self.base + 0x0e4)
    }

    pub const fn pllctl(self) -> Reg<PLLCTL::Register> {
        Reg::new(self.base + 0x100)
    }

    pub const fn secctl(self) -> Reg<SECCTL::Register> {
        Reg::new(self.base + 0x108)
    }

    pub const fn pllm(self) -> Reg<PLLM::Register> {
        Reg::new(self.base + 0x110)
    }

    pub const fn prediv(self) -> Reg<PLLDIV::Register> {
        Reg::new(self.base + 0x114)
    }

    pub const fn postdiv(self) -> Reg<PLLDIV::Register> {
        Reg::new(self.base + 0x128)
    }

    pub const fn pllcmd(self) -> Reg<PLLCMD::Register> {
        Reg::new(self.base + 0x138)
    }

    /// PLLDIV1..PLLDIV9. The first three sit ahead of OSCDIV1, the rest
    /// were appended after the status block.
    pub const fn plldiv(self, n: usize) -> Reg<PLLDIV::Register> {
        if n <= 3 {
            Reg::new(self.base + 0x118 + 4 * (n - 1))
        } else {
            Reg::new(self.base + 0x160 + 4 * (n - 4))
        }
    }

    /// True for addresses of fields that must only change in bypass.
    pub const fn is_ratio_register(self, addr: usize) -> bool {
        let off = addr.wrapping_sub(self.base);
        matches!(off, 0x110..=0x120 | 0x128 | 0x160..=0x174)
    }
}

pub mod system {
    use super::*;

    pub const fn pinmux(n: usize) -> Reg {
        Reg::new(SYSTEM_BASE + 4 * n)
    }

    pub const BOOTCFG: Reg<BOOTCFG::Register> = Reg::new(SYSTEM_BASE + 0x14);
    pub const VPSS_CLKCTL: Reg<VPSS_CLKCTL::Register> = Reg::new(SYSTEM_BASE + 0x44);
    pub const PERI_CLKCTRL: Reg = Reg::new(SYSTEM_BASE + 0x48);
    pub const VTPIOCR: Reg<VTPIOCR::Register> = Reg::new(SYSTEM_BASE + 0x74);
    /// Lock status of PLLC1.
    pub const PLL0_CONFIG: Reg<PLL_CONFIG::Register> = Reg::new(SYSTEM_BASE + 0x84);
    /// Lock status of PLLC2.
    pub const PLL1_CONFIG: Reg<PLL_CONFIG::Register> = Reg::new(SYSTEM_BASE + 0x88);
}

pub mod psc {
    use super::*;

    pub const PTCMD: Reg<PTCMD::Register> = Reg::new(PSC_BASE + 0x120);
    pub const PTSTAT: Reg<PTSTAT::Register> = Reg::new(PSC_BASE + 0x128);

    pub const fn mdstat(module: u8) -> Reg<MDSTAT::Register> {
        Reg::new(PSC_BASE + 0x800 + 4 * module as usize)
    }

    pub const fn mdctl(module: u8) -> Reg<MDCTL::Register> {
        Reg::new(PSC_BASE + 0xa00 + 4 * module as usize)
    }
}

pub mod ddr {
    use super::*;

    pub const SDBCR: Reg<SDBCR::Register> = Reg::new(DDR_BASE + 0x08);
    pub const SDRCR: Reg = Reg::new(DDR_BASE + 0x0c);
    pub const SDTIMR: Reg = Reg::new(DDR_BASE + 0x10);
    pub const SDTIMR2: Reg = Reg::new(DDR_BASE + 0x14);
    pub const PBBPR: Reg = Reg::new(DDR_BASE + 0x20);
    pub const DDRPHYCR: Reg = Reg::new(DDR_BASE + 0xe4);
}

pub mod aintc {
    use super::*;

    pub const FIQ0: Reg = Reg::new(AINTC_BASE + 0x00);
    pub const FIQ1: Reg = Reg::new(AINTC_BASE + 0x04);
    pub const IRQ0: Reg = Reg::new(AINTC_BASE + 0x08);
    pub const IRQ1: Reg = Reg::new(AINTC_BASE + 0x0c);
    pub const EINT0: Reg = Reg::new(AINTC_BASE + 0x18);
    pub const EINT1: Reg = Reg::new(AINTC_BASE + 0x1c);
    pub const INTCTL: Reg = Reg::new(AINTC_BASE + 0x20);
    pub const EABASE: Reg = Reg::new(AINTC_BASE + 0x24);
}

pub mod gpio {
    use super::*;

    pub const DIR23: Reg = Reg::new(GPIO_BASE + 0x38);
    pub const CLR_DATA23: Reg = Reg::new(GPIO_BASE + 0x44);
}

/// Watchdog timer pins run in GPIO mode for the diagnostic signal.
pub mod wdt {
    use super::*;

    pub const GPINT_GPEN: Reg = Reg::new(WDT_BASE + 0x08);
    pub const GPTDAT_GPDIR: Reg = Reg::new(WDT_BASE + 0x0c);
}

pub mod uart0 {
    use super::*;

    pub const THR: Reg = Reg::new(UART0_BASE + 0x00);
    pub const IER: Reg = Reg::new(UART0_BASE + 0x04);
    pub const FCR: Reg = Reg::new(UART0_BASE + 0x08);
    pub const LCR: Reg = Reg::new(UART0_BASE + 0x0c);
    pub const MCR: Reg = Reg::new(UART0_BASE + 0x10);
    pub const LSR: Reg = Reg::new(UART0_BASE + 0x14);
    pub const DLL: Reg = Reg::new(UART0_BASE + 0x20);
    pub const DLH: Reg = Reg::new(UART0_BASE + 0x24);
    pub const PWREMU_MGMT: Reg = Reg::new(UART0_BASE + 0x30);
    pub const MDR: Reg = Reg::new(UART0_BASE + 0x34);

    /// Transmitter holding register empty
    pub const LSR_THRE: u32 = 1 << 5;
}

pub mod timer0 {
    use super::*;

    pub const EMUMGT_CLKSPD: Reg = Reg::new(TIMER0_BASE + 0x04);
    pub const TIM12: Reg = Reg::new(TIMER0_BASE + 0x10);
    pub const TIM34: Reg = Reg::new(TIMER0_BASE + 0x14);
    pub const PRD12: Reg = Reg::new(TIMER0_BASE + 0x18);
    pub const PRD34: Reg = Reg::new(TIMER0_BASE + 0x1c);
    pub const TCR: Reg = Reg::new(TIMER0_BASE + 0x20);
    pub const TGCR: Reg = Reg::new(TIMER0_BASE + 0x24);
    pub const INTCTL_STAT: Reg = Reg::new(TIMER0_BASE + 0x44);
}

pub mod i2c0 {
    use super::*;

    pub const ICCLKL: Reg = Reg::new(I2C0_BASE + 0x0c);
    pub const ICCLKH: Reg = Reg::new(I2C0_BASE + 0x10);
    pub const ICMDR: Reg<ICMDR::Register> = Reg::new(I2C0_BASE + 0x24);
    pub const ICPSC: Reg = Reg::new(I2C0_BASE + 0x30);
}

pub mod aemif {
    use super::*;

    pub const AWCCR: Reg = Reg::new(AEMIF_BASE + 0x04);
    pub const A1CR: Reg = Reg::new(AEMIF_BASE + 0x10);
    pub const A2CR: Reg = Reg::new(AEMIF_BASE + 0x14);
    pub const NANDFCR: Reg = Reg::new(AEMIF_BASE + 0x60);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plldiv_addresses() {
        assert_eq!(PLLC1.plldiv(1).addr(), 0x01c4_0918);
        assert_eq!(PLLC1.plldiv(3).addr(), 0x01c4_0920);
        assert_eq!(PLLC1.plldiv(4).addr(), 0x01c4_0960);
        assert_eq!(PLLC2.plldiv(9).addr(), 0x01c4_0d74);
    }

    #[test]
    fn ratio_registers() {
        assert!(PLLC1.is_ratio_register(PLLC1.pllm().addr()));
        assert!(PLLC1.is_ratio_register(PLLC1.plldiv(9).addr()));
        assert!(!PLLC1.is_ratio_register(PLLC1.pllctl().addr()));
        assert!(!PLLC1.is_ratio_register(PLLC1.secctl().addr()));
        assert!(!PLLC1.is_ratio_register(PLLC2.pllm().addr()));
    }

    #[test]
    fn psc_addresses() {
        assert_eq!(psc::mdstat(47).addr(), 0x01c4_18bc);
        assert_eq!(psc::mdctl(13).addr(), 0x01c4_1a34);
    }
}
