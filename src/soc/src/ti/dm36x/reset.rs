//! Reset origin classification.
//!
//! Runs first thing on entry. A power-on or external warm reset reported by
//! PLLC1, or an armed flag left behind by the previous boot, both end in
//! the diagnostic signal on the watchdog timer pins instead of a normal
//! boot.

use log::{info, warn};
use util::PollPolicy;

use super::error::Error;
use super::flag::{FlagStore, ScratchRegion};
use super::psc::{Module, ModuleState, PowerDomain, Psc};
use super::regs::{system, wdt, PLLC1, RSTYPE, VPSS_CLKCTL};
use crate::bank::RegisterBank;

/// Pin configuration that drives the diagnostic pattern.
const GPINT_GPEN: u32 = 0x0002_0000;
const GPTDAT_GPDIR: u32 = 0x0002_0002;

/// Busy-wait before the VPSS reset on the watchdog path.
const WATCHDOG_SETTLE: u32 = 0x100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetOrigin {
    /// PLLC1 reports a power-on or external warm reset.
    PowerOnReset,
    /// The previous boot armed the flag and never took it down.
    WatchdogRestart,
    /// Neither: carry on with bring-up.
    Normal,
}

impl ResetOrigin {
    /// The caller must stop here; diagnostic lines are already driven.
    pub const fn halts(self) -> bool {
        !matches!(self, ResetOrigin::Normal)
    }
}

pub struct ResetClassifier<'a, B: RegisterBank> {
    bank: &'a mut B,
    poll: PollPolicy,
    region: ScratchRegion,
}

impl<'a, B: RegisterBank> ResetClassifier<'a, B> {
    pub fn new(bank: &'a mut B, poll: PollPolicy, region: ScratchRegion) -> Self {
        Self { bank, poll, region }
    }

    fn flags(&mut self) -> FlagStore<'_, B> {
        FlagStore::new(self.bank, self.region)
    }

    pub fn classify(&mut self) -> Result<ResetOrigin, Error> {
        let rstype = self.bank.get(PLLC1.rstype());
        if rstype.is_set(RSTYPE::POR) || rstype.is_set(RSTYPE::XWRST) {
            warn!("reset: RSTYPE {:#x}, signalling power-on reset", rstype.get());
            self.vpss_sync_reset()?;
            let mut flags = self.flags();
            flags.clear();
            flags.update_status(|s| s.set_power_on_reset(true));
            self.signal();
            return Ok(ResetOrigin::PowerOnReset);
        }

        if self.flags().is_armed() {
            // consume the flag before anything else can observe it
            let mut flags = self.flags();
            flags.clear();
            flags.update_status(|s| {
                s.set_power_on_reset(true);
                s.set_flag_disarmed(true);
            });
            warn!("reset: armed flag found, signalling watchdog restart");
            self.bank.settle(WATCHDOG_SETTLE);
            self.vpss_sync_reset()?;
            self.signal();
            return Ok(ResetOrigin::WatchdogRestart);
        }

        info!("reset: normal entry");
        Ok(ResetOrigin::Normal)
    }

    /// Put VPSS in 1:1 clock mode and hold its master module in sync reset.
    pub fn vpss_sync_reset(&mut self) -> Result<(), Error> {
        self.bank
            .modify(system::VPSS_CLKCTL, VPSS_CLKCTL::VPSS_CLKMD::Full);
        Psc::new(self.bank, self.poll).force(
            Module::VPSS_MASTER,
            PowerDomain::ALWAYS_ON,
            ModuleState::SyncReset,
        )
    }

    fn signal(&mut self) {
        self.bank.set(wdt::GPINT_GPEN, GPINT_GPEN);
        self.bank.set(wdt::GPTDAT_GPDIR, GPTDAT_GPDIR);
    }
}
