//! Reset flag kept in ARM internal RAM across a watchdog reset.
//!
//! The region holds a sentinel word and a status word. Bring-up writes the
//! sentinel once the system PLL is running. If the watchdog then resets
//! the chip before the next stage has taken the flag down again, the next
//! entry finds the sentinel and routes into the diagnostic halt instead of
//! retrying the same boot.

use bitfield::bitfield;
use log::debug;

use super::regs::{system, SCRATCH_SENTINEL, SCRATCH_STATUS, VPSS_CLKCTL};
use crate::bank::{Reg, RegisterBank};

/// Value of the sentinel word while the flag is armed.
pub const SENTINEL: u32 = 0x591b_3ed7;

bitfield! {
    /// Status word. `flag_disarmed` shares bit 0 with `power_on_reset`;
    /// both names are kept so each writer reads the way the boot flow
    /// intends, but they are the same bit.
    #[derive(Clone, Copy, PartialEq, Eq, Default)]
    pub struct ResetStatus(u32);
    impl Debug;
    pub power_on_reset, set_power_on_reset: 0;
    pub watchdog_reset, set_watchdog_reset: 1;
    pub flag_armed, set_flag_armed: 2;
    pub flag_disarmed, set_flag_disarmed: 0;
}

/// Where the two words live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScratchRegion {
    pub sentinel: usize,
    pub status: usize,
}

impl ScratchRegion {
    pub const IRAM: ScratchRegion = ScratchRegion {
        sentinel: SCRATCH_SENTINEL,
        status: SCRATCH_STATUS,
    };
}

/// Both words as found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PersistentFlag {
    pub sentinel: u32,
    pub status: ResetStatus,
}

impl PersistentFlag {
    pub const fn is_armed(&self) -> bool {
        self.sentinel == SENTINEL
    }
}

pub struct FlagStore<'a, B: RegisterBank> {
    bank: &'a mut B,
    region: ScratchRegion,
}

impl<'a, B: RegisterBank> FlagStore<'a, B> {
    pub fn new(bank: &'a mut B, region: ScratchRegion) -> Self {
        Self { bank, region }
    }

    fn sentinel_reg(&self) -> Reg {
        Reg::new(self.region.sentinel)
    }

    fn status_reg(&self) -> Reg {
        Reg::new(self.region.status)
    }

    pub fn read(&mut self) -> PersistentFlag {
        let sentinel = self.bank.get(self.sentinel_reg()).get();
        PersistentFlag {
            sentinel,
            status: self.status(),
        }
    }

    pub fn write(&mut self, sentinel: u32) {
        let reg = self.sentinel_reg();
        self.bank.set(reg, sentinel);
    }

    /// Zero the sentinel word. The status word is left as is.
    pub fn clear(&mut self) {
        self.write(0);
    }

    pub fn is_armed(&mut self) -> bool {
        self.bank.get(self.sentinel_reg()).get() == SENTINEL
    }

    pub fn status(&mut self) -> ResetStatus {
        ResetStatus(self.bank.get(self.status_reg()).get())
    }

    /// Read-modify-write of the status word.
    pub fn update_status<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ResetStatus),
    {
        let mut s = self.status();
        f(&mut s);
        let reg = self.status_reg();
        self.bank.set(reg, s.0);
    }

    /// Arm the flag for the next reset. VPSS goes back to its 1:2 clock
    /// mode, which the diagnostic path switched to 1:1.
    pub fn arm(&mut self) {
        debug!("reset flag: arm");
        self.bank
            .modify(system::VPSS_CLKCTL, VPSS_CLKCTL::VPSS_CLKMD::Half);
        self.write(SENTINEL);
        self.update_status(|s| s.set_flag_armed(true));
    }

    /// Take the flag down once the system is known good. Not done during
    /// bring-up; left to whichever stage decides the boot succeeded.
    pub fn disarm(&mut self) {
        debug!("reset flag: disarm");
        self.clear();
        self.update_status(|s| s.set_flag_disarmed(true));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ti::dm36x::sim::SimBank;

    #[test]
    fn status_bits() {
        let mut s = ResetStatus(0);
        s.set_power_on_reset(true);
        assert_eq!(s.0, 0x1);
        s.set_watchdog_reset(true);
        assert_eq!(s.0, 0x3);
        s.set_flag_armed(true);
        assert_eq!(s.0, 0x7);
        let mut d = ResetStatus(0);
        d.set_flag_disarmed(true);
        assert_eq!(d.0, 0x1);
        assert!(d.power_on_reset());
    }

    #[test]
    fn arm_then_read() {
        let mut sim = SimBank::new();
        sim.poke(system::VPSS_CLKCTL.addr(), 0x80);
        let mut store = FlagStore::new(&mut sim, ScratchRegion::IRAM);
        assert!(!store.is_armed());
        store.arm();
        let f = store.read();
        assert!(f.is_armed());
        assert_eq!(f.sentinel, SENTINEL);
        assert!(f.status.flag_armed());
        assert_eq!(sim.peek(SCRATCH_SENTINEL), 0x591b_3ed7);
        assert_eq!(sim.peek(SCRATCH_STATUS), 0x4);
        assert_eq!(sim.peek(system::VPSS_CLKCTL.addr()) & 0x80, 0);
    }

    #[test]
    fn clear_keeps_status() {
        let mut sim = SimBank::new();
        sim.poke(SCRATCH_SENTINEL, SENTINEL);
        sim.poke(SCRATCH_STATUS, 0x4);
        let mut store = FlagStore::new(&mut sim, ScratchRegion::IRAM);
        store.clear();
        assert!(!store.is_armed());
        assert_eq!(store.status().0, 0x4);
    }

    #[test]
    fn disarm() {
        let mut sim = SimBank::new();
        let mut store = FlagStore::new(&mut sim, ScratchRegion::IRAM);
        store.arm();
        store.disarm();
        let f = store.read();
        assert!(!f.is_armed());
        assert!(f.status.flag_disarmed());
        assert!(f.status.flag_armed());
    }

    #[test]
    fn other_region() {
        let mut sim = SimBank::new();
        let region = ScratchRegion {
            sentinel: 0x8000_0000,
            status: 0x8000_0004,
        };
        FlagStore::new(&mut sim, region).write(SENTINEL);
        assert_eq!(sim.peek(0x8000_0000), SENTINEL);
        assert_eq!(sim.peek(SCRATCH_SENTINEL), 0);
    }
}
