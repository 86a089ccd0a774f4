//! The bring-up sequence.
//!
//! Runs once, from reset, on the ARM926 before anything else owns the
//! chip. Each stage after reset classification only starts while the
//! stages before it all passed. A stage that rejects its arguments fails
//! the run but returns normally; a stage that gives up waiting on the
//! hardware aborts it with the error.

use log::{debug, error, info, warn};
use util::{PollPolicy, Status};

use super::ddr::DdrCalibrator;
use super::error::Error;
use super::flag::{FlagStore, ScratchRegion};
use super::periph::Peripherals;
use super::pll::{PllId, PllSequencer};
use super::profile::{self, Profile};
use super::psc::{PowerDomain, Psc, BOOT_ENABLE_RANGES};
use super::regs::system;
use super::reset::{ResetClassifier, ResetOrigin};
use crate::bank::RegisterBank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub profile: &'static Profile,
    pub poll: PollPolicy,
    /// Set up AEMIF for the NAND on chip select 2.
    pub nand_boot: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: &profile::DEFAULT,
            poll: PollPolicy::Forever,
            nand_boot: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every stage ran, or the run stopped at the first failing one.
    Completed(Status),
    /// Diagnostic lines are driven; the caller must not continue.
    Halted(ResetOrigin),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    PowerDomains,
    PinMux,
    SystemPll,
    ArmFlag,
    MemoryPll,
    ClockMux,
    ExternalMemory,
    NandEmif,
    Timer0,
    I2c0,
}

const STAGES: [Stage; 10] = [
    Stage::PowerDomains,
    Stage::PinMux,
    Stage::SystemPll,
    Stage::ArmFlag,
    Stage::MemoryPll,
    Stage::ClockMux,
    Stage::ExternalMemory,
    Stage::NandEmif,
    Stage::Timer0,
    Stage::I2c0,
];

pub struct BringUp<B: RegisterBank> {
    bank: B,
    config: Config,
}

impl<B: RegisterBank> BringUp<B> {
    pub fn new(bank: B, config: Config) -> Self {
        Self { bank, config }
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn into_bank(self) -> B {
        self.bank
    }

    pub fn run(&mut self) -> Result<Outcome, Error> {
        let origin = ResetClassifier::new(&mut self.bank, self.config.poll, ScratchRegion::IRAM)
            .classify()?;
        if origin.halts() {
            return Ok(Outcome::Halted(origin));
        }

        info!(
            "bring-up: profile {} ({})",
            self.config.profile.name, self.config.profile.banner
        );
        Peripherals::new(&mut self.bank, self.config.poll).mask_interrupts();

        let mut status = Status::Pass;
        for stage in STAGES {
            if !status.is_pass() {
                break;
            }
            debug!("bring-up: {stage:?}");
            status |= self.fold(stage)?;
        }
        info!("bring-up: done, status {}", status.code());
        Ok(Outcome::Completed(status))
    }

    /// Run `stage`, turning rejected arguments into a failed status.
    fn fold(&mut self, stage: Stage) -> Result<Status, Error> {
        match self.stage(stage) {
            Ok(()) => Ok(Status::Pass),
            Err(e) if e.is_timeout() => {
                error!("bring-up: {stage:?}: {e}");
                Err(e)
            }
            Err(e) => {
                warn!("bring-up: {stage:?}: {e}");
                Ok(Status::Fail)
            }
        }
    }

    fn stage(&mut self, stage: Stage) -> Result<(), Error> {
        let poll = self.config.poll;
        let profile = self.config.profile;
        let bank = &mut self.bank;
        match stage {
            Stage::PowerDomains => {
                Psc::new(bank, poll).bulk_enable(&BOOT_ENABLE_RANGES, PowerDomain::ALWAYS_ON)
            }
            Stage::PinMux => Peripherals::new(bank, poll).boot_pinmux(),
            Stage::SystemPll => PllSequencer::new(bank, poll).lock(PllId::Pll1, &profile.pll1),
            Stage::ArmFlag => {
                FlagStore::new(bank, ScratchRegion::IRAM).arm();
                Ok(())
            }
            Stage::MemoryPll => PllSequencer::new(bank, poll).lock(PllId::Pll2, &profile.pll2),
            Stage::ClockMux => {
                bank.set(system::PERI_CLKCTRL, profile.clock_control);
                Ok(())
            }
            Stage::ExternalMemory => {
                DdrCalibrator::new(bank, poll).init_external_memory(&profile.ddr)
            }
            Stage::NandEmif => {
                if self.config.nand_boot {
                    Peripherals::new(bank, poll).emif_init();
                }
                Ok(())
            }
            Stage::Timer0 => {
                Peripherals::new(bank, poll).timer0_init();
                Ok(())
            }
            Stage::I2c0 => {
                Peripherals::new(bank, poll).i2c0_init();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ti::dm36x::error::WaitPoint;
    use crate::ti::dm36x::flag::SENTINEL;
    use crate::ti::dm36x::pll::PllParams;
    use crate::ti::dm36x::regs::{
        aemif, aintc, ddr, i2c0, psc, timer0, PLLC1, PLLC2, SCRATCH_SENTINEL,
    };
    use crate::ti::dm36x::sim::{Event, SimBank};

    fn run(sim: SimBank, config: Config) -> (SimBank, Result<Outcome, Error>) {
        let mut b = BringUp::new(sim, config);
        let r = b.run();
        (b.into_bank(), r)
    }

    fn at(sim: &SimBank, addr: usize) -> usize {
        sim.first_write(addr)
            .unwrap_or_else(|| panic!("{addr:#x} never written"))
    }

    #[test]
    fn cold_boot_completes() {
        let (sim, r) = run(SimBank::new(), Config::default());
        assert_eq!(r, Ok(Outcome::Completed(Status::Pass)));
        assert!(sim.violations().is_empty(), "{:?}", sim.violations());
        assert_eq!(sim.peek(SCRATCH_SENTINEL), SENTINEL);
        assert_eq!(sim.last_write(system::PERI_CLKCTRL.addr()), Some(0x243f_04fc));
    }

    #[test]
    fn stage_order() {
        let (sim, r) = run(SimBank::new(), Config::default());
        r.unwrap();
        let order = [
            at(&sim, aintc::INTCTL.addr()),
            at(&sim, aintc::IRQ1.addr()),
            at(&sim, psc::PTCMD.addr()),
            at(&sim, system::pinmux(0).addr()),
            at(&sim, PLLC1.pllm().addr()),
            at(&sim, SCRATCH_SENTINEL),
            at(&sim, PLLC2.pllm().addr()),
            at(&sim, system::PERI_CLKCTRL.addr()),
            at(&sim, ddr::DDRPHYCR.addr()),
            at(&sim, timer0::PRD12.addr()),
            at(&sim, i2c0::ICPSC.addr()),
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");
    }

    #[test]
    fn flag_armed_between_plls() {
        let (sim, r) = run(SimBank::new(), Config::default());
        r.unwrap();
        let pll1_enabled = sim
            .trace()
            .iter()
            .rposition(|e| {
                matches!(e, Event::Write { addr, value }
                    if *addr == PLLC1.pllctl().addr() && value & 1 == 1)
            })
            .unwrap();
        let armed = at(&sim, SCRATCH_SENTINEL);
        assert!(pll1_enabled < armed);
        assert!(armed < at(&sim, PLLC2.pllctl().addr()));
    }

    #[test]
    fn armed_flag_halts_before_anything_else() {
        let mut sim = SimBank::new();
        sim.poke(SCRATCH_SENTINEL, SENTINEL);
        let (sim, r) = run(sim, Config::default());
        assert_eq!(r, Ok(Outcome::Halted(ResetOrigin::WatchdogRestart)));
        assert!(sim.first_write(aintc::INTCTL.addr()).is_none());
        assert!(sim.first_write(PLLC1.pllctl().addr()).is_none());
        assert_eq!(sim.peek(SCRATCH_SENTINEL), 0);
    }

    #[test]
    fn power_on_reset_halts() {
        let mut sim = SimBank::new();
        sim.poke(PLLC1.rstype().addr(), 1);
        let (sim, r) = run(sim, Config::default());
        assert_eq!(r, Ok(Outcome::Halted(ResetOrigin::PowerOnReset)));
        assert_eq!(sim.go_pulses(0), 1);
        assert!(sim.first_write(system::pinmux(0).addr()).is_none());
    }

    #[test]
    fn memory_pll_timeout_aborts() {
        let mut sim = SimBank::new();
        sim.stick_pll(PllId::Pll2);
        let config = Config {
            poll: PollPolicy::Bounded { polls: 64 },
            ..Config::default()
        };
        let (sim, r) = run(sim, config);
        assert_eq!(
            r,
            Err(Error::HardwareTimeout {
                wait: WaitPoint::PllLock(PllId::Pll2),
                polls: 65
            })
        );
        // armed before the failure, so the watchdog reset is diagnosed
        assert_eq!(sim.peek(SCRATCH_SENTINEL), SENTINEL);
        assert!(sim.first_write(system::PERI_CLKCTRL.addr()).is_none());
        assert!(sim.first_write(ddr::SDBCR.addr()).is_none());
    }

    static SHORT_PLL2: Profile = Profile {
        pll2: PllParams {
            dividers: &[0, 1, 1, 28, 7, 1],
            ..profile::DEFAULT.pll2
        },
        ..profile::DEFAULT
    };

    #[test]
    fn rejected_profile_fails_the_run() {
        let config = Config {
            profile: &SHORT_PLL2,
            ..Config::default()
        };
        let (sim, r) = run(SimBank::new(), config);
        assert_eq!(r, Ok(Outcome::Completed(Status::Fail)));
        assert!(sim.first_write(PLLC1.pllm().addr()).is_some());
        assert!(sim.first_write(PLLC2.pllctl().addr()).is_none());
        assert!(sim.first_write(ddr::DDRPHYCR.addr()).is_none());
        assert!(sim.first_write(timer0::PRD12.addr()).is_none());
    }

    #[test]
    fn emif_only_for_nand_boot() {
        let (sim, _) = run(SimBank::new(), Config::default());
        assert!(sim.first_write(aemif::A1CR.addr()).is_none());

        let config = Config {
            nand_boot: true,
            ..Config::default()
        };
        let (sim, r) = run(SimBank::new(), config);
        assert_eq!(r, Ok(Outcome::Completed(Status::Pass)));
        assert!(at(&sim, ddr::SDRCR.addr()) < at(&sim, aemif::A1CR.addr()));
        assert!(at(&sim, aemif::A2CR.addr()) < at(&sim, timer0::PRD12.addr()));
    }

    #[test]
    fn every_profile_boots_clean() {
        for p in profile::PROFILES {
            let config = Config {
                profile: p,
                ..Config::default()
            };
            let (sim, r) = run(SimBank::new(), config);
            assert_eq!(r, Ok(Outcome::Completed(Status::Pass)), "{}", p.name);
            assert!(sim.violations().is_empty(), "{}: {:?}", p.name, sim.violations());
        }
    }
}
