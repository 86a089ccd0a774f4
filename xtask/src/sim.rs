use std::fmt;

use log::{debug, info, warn};
use oreboot_soc::ti::dm36x::{
    flag::SENTINEL,
    pll::PllId,
    profile::{self, PROFILES},
    regs::{PLLC1, SCRATCH_SENTINEL},
    sim::{Event, SimBank},
    BringUp, Config, Error, Outcome,
};
use ::util::PollPolicy;

use crate::{Scenario, SimArgs};

/// Poll limit for scenarios that would otherwise spin forever.
const STUCK_POLLS: u32 = 1000;

#[derive(Debug)]
pub(crate) enum SimError {
    UnknownProfile(String),
    BringUp(Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownProfile(name) => {
                write!(f, "no profile named '{name}', see `cargo xtask profiles`")
            }
            SimError::BringUp(e) => write!(f, "bring-up aborted: {e}"),
        }
    }
}

pub(crate) fn print_profiles() {
    println!(
        "{:<24} {:<20} {:>7} {:>9} {:>9} {:>10}",
        "name", "banner", "osc", "PLL1 VCO", "PLL2 VCO", "SDRCR"
    );
    for p in PROFILES {
        println!(
            "{:<24} {:<20} {:>7} {:>9} {:>9} {:>#10x}",
            p.name,
            p.banner,
            mhz(p.osc_hz as u64),
            mhz(p.pll1.vco_hz(p.osc_hz)),
            mhz(p.pll2.vco_hz(p.osc_hz)),
            p.ddr.sdrcr
        );
    }
}

fn mhz(hz: u64) -> String {
    format!("{}.{}", hz / 1_000_000, hz % 1_000_000 / 100_000)
}

pub(crate) fn simulate(args: &SimArgs) -> Result<(), SimError> {
    let profile = profile::by_name(&args.profile)
        .ok_or_else(|| SimError::UnknownProfile(args.profile.clone()))?;

    let mut bank = SimBank::new();
    let stuck = match args.scenario {
        Scenario::Cold => false,
        Scenario::PowerOn => {
            bank.poke(PLLC1.rstype().addr(), 1);
            false
        }
        Scenario::Watchdog => {
            bank.poke(SCRATCH_SENTINEL, SENTINEL);
            false
        }
        Scenario::StuckPll => {
            bank.stick_pll(PllId::Pll2);
            true
        }
        Scenario::StuckVtp => {
            bank.set_vtp_latency(u32::MAX);
            true
        }
    };
    let poll = match args.polls {
        Some(polls) => PollPolicy::Bounded { polls },
        None if stuck => PollPolicy::Bounded { polls: STUCK_POLLS },
        None => PollPolicy::Forever,
    };
    debug!("simulating {:?} with {} and {poll:?}", args.scenario, profile.name);

    let config = Config {
        profile,
        poll,
        nand_boot: args.nand,
    };
    let mut bringup = BringUp::new(bank, config);
    let result = bringup.run();
    let bank = bringup.into_bank();

    if args.trace {
        for e in bank.trace() {
            match e {
                Event::Read { addr, value } => println!("R {addr:#010x} -> {value:#010x}"),
                Event::Write { addr, value } => println!("W {addr:#010x} <- {value:#010x}"),
                Event::Settle(loops) => println!("  settle {loops}"),
            }
        }
    }
    for v in bank.violations() {
        warn!("sequencing violation: {v:?}");
    }
    info!("{} register accesses", bank.trace().len());

    match result {
        Ok(Outcome::Completed(status)) => {
            println!("completed, status {}", status.code());
            Ok(())
        }
        Ok(Outcome::Halted(origin)) => {
            println!("halted: {origin:?}");
            Ok(())
        }
        Err(e) => Err(SimError::BringUp(e)),
    }
}
