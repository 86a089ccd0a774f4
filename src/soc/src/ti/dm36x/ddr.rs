//! DDR2/mDDR controller bring-up: VTP impedance calibration followed by
//! the timing and refresh programming.

use log::{debug, trace};
use util::PollPolicy;

use super::error::{Error, WaitPoint};
use super::psc::{Module, ModuleState, PowerDomain, Psc};
use super::regs::{ddr, system, SDBCR, VTPIOCR};
use crate::bank::RegisterBank;

/// Controller settings for one memory part and clock. Opaque register
/// images, written as given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryTimingProfile {
    pub phycr: u32,
    pub sdbcr: u32,
    pub sdtimr: u32,
    pub sdtimr2: u32,
    pub pbbpr: u32,
    pub sdrcr: u32,
}

const VTP_SETTLE: u32 = 150;

pub struct DdrCalibrator<'a, B: RegisterBank> {
    bank: &'a mut B,
    poll: PollPolicy,
}

impl<'a, B: RegisterBank> DdrCalibrator<'a, B> {
    pub fn new(bank: &'a mut B, poll: PollPolicy) -> Self {
        Self { bank, poll }
    }

    fn psc(&mut self) -> Psc<'_, B> {
        Psc::new(self.bank, self.poll)
    }

    pub fn init_external_memory(&mut self, timing: &MemoryTimingProfile) -> Result<(), Error> {
        self.psc()
            .transition(Module::DDR2, PowerDomain::ALWAYS_ON, ModuleState::Enable)?;

        self.calibrate_vtp()?;
        self.reset_controller()?;

        debug!("ddr: programming timings, SDBCR {:#010x}", timing.sdbcr);
        self.bank.set(ddr::DDRPHYCR, timing.phycr);

        // Boot fields first, then timing fields. Never both unlocked.
        let boot = SDBCR::BOOTUNLOCK::SET + SDBCR::TIMUNLOCK::CLEAR;
        let tim = SDBCR::BOOTUNLOCK::CLEAR + SDBCR::TIMUNLOCK::SET;
        let locked = SDBCR::BOOTUNLOCK::CLEAR + SDBCR::TIMUNLOCK::CLEAR;
        self.bank.set(ddr::SDBCR, boot.modify(timing.sdbcr));
        self.bank.set(ddr::SDBCR, tim.modify(timing.sdbcr));

        self.bank.set(ddr::SDTIMR, timing.sdtimr);
        self.bank.set(ddr::SDTIMR2, timing.sdtimr2);
        self.bank.set(ddr::PBBPR, timing.pbbpr);

        self.bank.set(ddr::SDBCR, locked.modify(timing.sdbcr));
        self.bank.set(ddr::SDRCR, timing.sdrcr);

        self.reset_controller()
    }

    fn calibrate_vtp(&mut self) -> Result<(), Error> {
        self.bank.modify(
            system::VTPIOCR,
            VTPIOCR::PWRDN::CLEAR
                + VTPIOCR::LOCK::CLEAR
                + VTPIOCR::CLRZ::CLEAR
                + VTPIOCR::IOPWRDN::CLEAR,
        );
        self.bank.modify(system::VTPIOCR, VTPIOCR::CLRZ::SET);

        let bank = &mut *self.bank;
        let polls = self
            .poll
            .wait(|| bank.is_set(system::VTPIOCR, VTPIOCR::READY))
            .map_err(Error::timeout(WaitPoint::VtpReady))?;
        trace!("ddr: VTP ready after {polls} polls");

        // latch the result, then power the calibration circuit down
        self.bank.modify(system::VTPIOCR, VTPIOCR::LOCK::SET);
        self.bank
            .modify(system::VTPIOCR, VTPIOCR::IOPWRDN::SET + VTPIOCR::PWRDN::SET);
        self.bank.settle(VTP_SETTLE);
        Ok(())
    }

    fn reset_controller(&mut self) -> Result<(), Error> {
        let mut psc = self.psc();
        psc.transition(Module::DDR2, PowerDomain::ALWAYS_ON, ModuleState::SyncReset)?;
        psc.transition(Module::DDR2, PowerDomain::ALWAYS_ON, ModuleState::Enable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ti::dm36x::profile;
    use crate::ti::dm36x::regs::psc;
    use crate::ti::dm36x::sim::{Event, SimBank};

    fn init(sim: &mut SimBank) -> Result<(), Error> {
        DdrCalibrator::new(sim, PollPolicy::Forever)
            .init_external_memory(&profile::DEFAULT.ddr)
    }

    #[test]
    fn default_profile_register_images() {
        let mut sim = SimBank::new();
        init(&mut sim).unwrap();

        assert_eq!(sim.last_write(ddr::DDRPHYCR.addr()), Some(0xc5));
        assert_eq!(sim.last_write(ddr::SDTIMR.addr()), Some(0x3c93_4b51));
        assert_eq!(sim.last_write(ddr::SDTIMR2.addr()), Some(0x4221_c702));
        assert_eq!(sim.last_write(ddr::PBBPR.addr()), Some(0xfe));
        assert_eq!(sim.last_write(ddr::SDRCR.addr()), Some(0x768));

        let sdbcr: heapless::Vec<u32, 4> = sim.writes_to(ddr::SDBCR.addr()).collect();
        assert_eq!(&sdbcr[..], &[0x08d3_4832, 0x0853_c832, 0x0853_4832]);
        assert!(sim.violations().is_empty(), "{:?}", sim.violations());
    }

    #[test]
    fn unlock_bits_never_both_set() {
        for p in profile::PROFILES {
            let mut sim = SimBank::new();
            DdrCalibrator::new(&mut sim, PollPolicy::Forever)
                .init_external_memory(&p.ddr)
                .unwrap();
            for v in sim.writes_to(ddr::SDBCR.addr()) {
                let both = (1 << 23) | (1 << 15);
                assert_ne!(v & both, both, "{}: {v:#x}", p.name);
            }
            assert!(sim.violations().is_empty(), "{}: {:?}", p.name, sim.violations());
        }
    }

    #[test]
    fn timing_written_only_while_timing_unlocked() {
        let mut sim = SimBank::new();
        init(&mut sim).unwrap();
        let sdbcr = ddr::SDBCR.addr();
        let mut unlocked = false;
        for e in sim.trace() {
            if let Event::Write { addr, value } = e {
                if *addr == sdbcr {
                    unlocked = value & (1 << 15) != 0;
                } else if [ddr::SDTIMR.addr(), ddr::SDTIMR2.addr(), ddr::PBBPR.addr()]
                    .contains(addr)
                {
                    assert!(unlocked, "{addr:#x} written while locked");
                }
            }
        }
    }

    #[test]
    fn vtp_power_down_after_ready() {
        let mut sim = SimBank::new();
        sim.set_vtp_latency(8);
        init(&mut sim).unwrap();

        let vtp = system::VTPIOCR.addr();
        let t = sim.trace();
        let trigger = t
            .iter()
            .position(|e| matches!(e, Event::Write { addr, value } if *addr == vtp && value & (1 << 13) != 0))
            .unwrap();
        let ready = t
            .iter()
            .position(|e| matches!(e, Event::Read { addr, value } if *addr == vtp && value & (1 << 15) != 0))
            .unwrap();
        let powerdown = t
            .iter()
            .position(|e| matches!(e, Event::Write { addr, value } if *addr == vtp && value & 0x4040 != 0))
            .unwrap();
        assert!(trigger < ready);
        assert!(ready < powerdown);
        // a fixed settle follows the power-down
        assert!(t[powerdown..]
            .iter()
            .any(|e| matches!(e, Event::Settle(150))));
    }

    #[test]
    fn controller_reset_around_programming() {
        let mut sim = SimBank::new();
        init(&mut sim).unwrap();

        let mdctl = psc::mdctl(Module::DDR2.index()).addr();
        let states: heapless::Vec<u32, 8> = sim.writes_to(mdctl).map(|v| v & 0x1f).collect();
        assert_eq!(&states[..], &[3, 1, 3, 1, 3]);

        let phy = sim.first_write(ddr::DDRPHYCR.addr()).unwrap();
        let refresh = sim.first_write(ddr::SDRCR.addr()).unwrap();
        let ctl: heapless::Vec<usize, 8> = sim
            .trace()
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Event::Write { addr, .. } if *addr == mdctl))
            .map(|(i, _)| i)
            .collect();
        assert!(ctl[2] < phy);
        assert!(refresh < ctl[3]);
    }

    #[test]
    fn calibration_never_ready() {
        let mut sim = SimBank::new();
        sim.set_vtp_latency(u32::MAX);
        let r = DdrCalibrator::new(&mut sim, PollPolicy::Bounded { polls: 20 })
            .init_external_memory(&profile::DEFAULT.ddr);
        assert_eq!(
            r,
            Err(Error::HardwareTimeout {
                wait: WaitPoint::VtpReady,
                polls: 21
            })
        );
        assert!(sim.first_write(ddr::SDBCR.addr()).is_none());
    }
}
