//! Power and sleep controller.
//!
//! Each module (LPSC) has a control register holding the requested next
//! state and a status register reporting the current one. Nothing moves
//! until a GO bit is written for the owning power domain; the domain then
//! reports busy in PTSTAT until every pending module in it has settled.
//!
//! Module state is never cached here: the status register is the only
//! source of truth.

use core::ops::RangeInclusive;

use log::trace;
use util::PollPolicy;

use super::error::{Error, WaitPoint};
use super::regs::{psc, MDCTL, MDSTAT, PTCMD, PTSTAT};
use crate::bank::RegisterBank;

/// Number of LPSCs on the DM36x.
pub const MODULE_COUNT: u8 = 52;

/// Modules switched on at boot. 29..=37 are locked modules (ARM, system,
/// timers owned by the boot ROM) and 48..=49 are reserved.
pub const BOOT_ENABLE_RANGES: [RangeInclusive<u8>; 3] = [0..=28, 38..=47, 50..=51];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Module(u8);

impl Module {
    pub const DDR2: Module = Module(13);
    pub const AEMIF: Module = Module(14);
    pub const SDMMC0: Module = Module(15);
    pub const I2C0: Module = Module(18);
    pub const UART0: Module = Module(19);
    pub const SPI0: Module = Module(22);
    pub const TIMER0: Module = Module(27);
    pub const VPSS_MASTER: Module = Module(47);

    pub const fn new(index: u8) -> Option<Module> {
        if index < MODULE_COUNT {
            Some(Module(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerDomain(u8);

impl PowerDomain {
    /// PD0, the always-on domain holding every module the boot touches.
    pub const ALWAYS_ON: PowerDomain = PowerDomain(0);

    pub const fn index(self) -> u8 {
        self.0
    }

    const fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Module states used during bring-up. The PSC has more; none of them are
/// requested here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleState {
    Disable,
    SyncReset,
    Enable,
}

impl ModuleState {
    const fn next(self) -> tock_registers::fields::FieldValue<u32, MDCTL::Register> {
        match self {
            ModuleState::Disable => MDCTL::NEXT::Disable,
            ModuleState::SyncReset => MDCTL::NEXT::SyncReset,
            ModuleState::Enable => MDCTL::NEXT::Enable,
        }
    }

    const fn code(self) -> u32 {
        match self {
            ModuleState::Disable => 2,
            ModuleState::SyncReset => 1,
            ModuleState::Enable => 3,
        }
    }
}

pub struct Psc<'a, B: RegisterBank> {
    bank: &'a mut B,
    poll: PollPolicy,
}

impl<'a, B: RegisterBank> Psc<'a, B> {
    pub fn new(bank: &'a mut B, poll: PollPolicy) -> Self {
        Self { bank, poll }
    }

    /// Raw MDSTAT state code of `module`.
    pub fn state(&mut self, module: Module) -> u32 {
        self.bank.read(psc::mdstat(module.0), MDSTAT::STATE)
    }

    /// Move `module` to `state`.
    ///
    /// Blocks until `domain` is idle first, so a request never overlaps a
    /// transition still in flight. A module already in `state` is left
    /// alone: no control write and no GO.
    pub fn transition(
        &mut self,
        module: Module,
        domain: PowerDomain,
        state: ModuleState,
    ) -> Result<(), Error> {
        self.wait_domain_idle(domain)?;
        if self.state(module) == state.code() {
            trace!("psc: module {} already {:?}", module.0, state);
            return Ok(());
        }
        self.request(module, domain, state)
    }

    /// Request `state` unconditionally, without checking the domain or the
    /// current module state first. Used for the VPSS sync reset, where the
    /// boot ROM may have left the domain in any condition.
    pub fn force(
        &mut self,
        module: Module,
        domain: PowerDomain,
        state: ModuleState,
    ) -> Result<(), Error> {
        self.request(module, domain, state)
    }

    /// Enable every module in `ranges` with one GO per range.
    pub fn bulk_enable(
        &mut self,
        ranges: &[RangeInclusive<u8>],
        domain: PowerDomain,
    ) -> Result<(), Error> {
        for range in ranges {
            let last = *range.end();
            if Module::new(last).is_none() {
                return Err(Error::InvalidModule { index: last });
            }
            trace!("psc: enable modules {}..={}", range.start(), last);
            for m in range.clone() {
                self.bank
                    .modify(psc::mdctl(m), ModuleState::Enable.next());
            }
            self.go(domain);
            self.wait_domain_idle(domain)?;
            for m in range.clone() {
                self.wait_module_state(Module(m), ModuleState::Enable)?;
            }
        }
        Ok(())
    }

    fn request(
        &mut self,
        module: Module,
        domain: PowerDomain,
        state: ModuleState,
    ) -> Result<(), Error> {
        trace!("psc: module {} -> {:?}", module.0, state);
        self.bank.modify(psc::mdctl(module.0), state.next());
        self.go(domain);
        self.wait_domain_idle(domain)?;
        self.wait_module_state(module, state)
    }

    fn go(&mut self, domain: PowerDomain) {
        self.bank.write(psc::PTCMD, PTCMD::GO.val(domain.mask()));
    }

    fn wait_domain_idle(&mut self, domain: PowerDomain) -> Result<(), Error> {
        let bank = &mut *self.bank;
        self.poll
            .wait(|| bank.read(psc::PTSTAT, PTSTAT::GOSTAT) & domain.mask() == 0)
            .map(|_| ())
            .map_err(Error::timeout(WaitPoint::DomainIdle(domain)))
    }

    fn wait_module_state(&mut self, module: Module, state: ModuleState) -> Result<(), Error> {
        let bank = &mut *self.bank;
        self.poll
            .wait(|| bank.read(psc::mdstat(module.0), MDSTAT::STATE) == state.code())
            .map(|_| ())
            .map_err(Error::timeout(WaitPoint::ModuleState { module, state }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ti::dm36x::sim::{Event, SimBank};

    fn ptcmd_writes(sim: &SimBank) -> usize {
        sim.writes_to(psc::PTCMD.addr()).count()
    }

    #[test]
    fn transition_to_current_state_is_a_no_op() {
        let mut sim = SimBank::new();
        sim.set_module_state(Module::DDR2, 3);
        let before = sim.trace().len();

        Psc::new(&mut sim, PollPolicy::Forever)
            .transition(Module::DDR2, PowerDomain::ALWAYS_ON, ModuleState::Enable)
            .unwrap();

        assert_eq!(ptcmd_writes(&sim), 0);
        assert!(sim.trace()[before..]
            .iter()
            .all(|e| !matches!(e, Event::Write { .. })));
    }

    #[test]
    fn transition_pulses_go_and_waits() {
        let mut sim = SimBank::new();
        Psc::new(&mut sim, PollPolicy::Forever)
            .transition(Module::UART0, PowerDomain::ALWAYS_ON, ModuleState::SyncReset)
            .unwrap();

        assert_eq!(sim.module_state(Module::UART0), 1);
        let go: heapless::Vec<u32, 4> = sim.writes_to(psc::PTCMD.addr()).collect();
        assert_eq!(&go[..], &[1]);
        // GO comes after the control write
        let ctl = sim.first_write(psc::mdctl(Module::UART0.index()).addr()).unwrap();
        let pulse = sim.first_write(psc::PTCMD.addr()).unwrap();
        assert!(ctl < pulse);
    }

    #[test]
    fn transition_waits_for_busy_domain_first() {
        let mut sim = SimBank::new();
        sim.hold_domain_busy(0, 5);
        Psc::new(&mut sim, PollPolicy::Forever)
            .transition(Module::SPI0, PowerDomain::ALWAYS_ON, ModuleState::Enable)
            .unwrap();

        // the control write only lands once PTSTAT has read idle
        let ctl = sim.first_write(psc::mdctl(Module::SPI0.index()).addr()).unwrap();
        let idle = sim
            .trace()
            .iter()
            .position(|e| {
                matches!(e, Event::Read { addr, value }
                    if *addr == psc::PTSTAT.addr() && value & 1 == 0)
            })
            .unwrap();
        assert!(idle < ctl);
    }

    #[test]
    fn bulk_enable_skips_locked_modules() {
        let mut sim = SimBank::new();
        Psc::new(&mut sim, PollPolicy::Forever)
            .bulk_enable(&BOOT_ENABLE_RANGES, PowerDomain::ALWAYS_ON)
            .unwrap();

        assert_eq!(sim.go_pulses(0), 3);
        for m in (0..=28).chain(38..=47).chain(50..=51) {
            assert_eq!(sim.module_state(Module(m)), 3, "module {m}");
        }
        for m in (29..=37).chain(48..=49) {
            assert!(sim.first_write(psc::mdctl(m).addr()).is_none(), "module {m}");
        }
    }

    #[test]
    fn bulk_enable_polls_every_module_before_next_range() {
        let mut sim = SimBank::new();
        Psc::new(&mut sim, PollPolicy::Forever)
            .bulk_enable(&BOOT_ENABLE_RANGES, PowerDomain::ALWAYS_ON)
            .unwrap();

        let pulses: heapless::Vec<usize, 4> = sim
            .trace()
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, Event::Write { addr, .. } if *addr == psc::PTCMD.addr()))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(pulses.len(), 3);

        let status_read = |m: u8, from: usize, to: usize| {
            sim.trace()[from..to].iter().any(|e| {
                matches!(e, Event::Read { addr, value }
                    if *addr == psc::mdstat(m).addr() && *value == 3)
            })
        };
        let end = sim.trace().len();
        for m in 0..=28 {
            assert!(status_read(m, pulses[0], pulses[1]), "module {m}");
        }
        for m in 38..=47 {
            assert!(status_read(m, pulses[1], pulses[2]), "module {m}");
        }
        for m in 50..=51 {
            assert!(status_read(m, pulses[2], end), "module {m}");
        }
    }

    #[test]
    fn bulk_enable_rejects_out_of_range_module() {
        let mut sim = SimBank::new();
        let r = Psc::new(&mut sim, PollPolicy::Forever)
            .bulk_enable(&[50..=60], PowerDomain::ALWAYS_ON);
        assert_eq!(r, Err(Error::InvalidModule { index: 60 }));
        assert_eq!(sim.go_pulses(0), 0);
    }

    #[test]
    fn stuck_module_times_out_when_bounded() {
        let mut sim = SimBank::new();
        sim.stick_module(Module::DDR2);
        let r = Psc::new(&mut sim, PollPolicy::Bounded { polls: 50 })
            .transition(Module::DDR2, PowerDomain::ALWAYS_ON, ModuleState::Enable);
        assert_eq!(
            r,
            Err(Error::HardwareTimeout {
                wait: WaitPoint::ModuleState {
                    module: Module::DDR2,
                    state: ModuleState::Enable
                },
                polls: 51,
            })
        );
    }

    #[test]
    fn busy_domain_times_out_when_bounded() {
        let mut sim = SimBank::new();
        sim.hold_domain_busy(0, u32::MAX);
        let r = Psc::new(&mut sim, PollPolicy::Bounded { polls: 10 })
            .transition(Module::DDR2, PowerDomain::ALWAYS_ON, ModuleState::Enable);
        assert!(matches!(
            r,
            Err(Error::HardwareTimeout {
                wait: WaitPoint::DomainIdle(_),
                ..
            })
        ));
        assert_eq!(sim.go_pulses(0), 0);
    }
}
