//! Host model of the DM36x register blocks used during bring-up.
//!
//! [`SimBank`] stores every register as a plain word and records each
//! access in a trace. On top of the storage it models the handful of
//! hardware behaviours the bring-up code waits on:
//!
//! * PSC: a GO write moves every pending module of the domain to its
//!   requested state and leaves PTSTAT busy for a few reads.
//! * PLLC: the lock bits in the system module come up a few reads after
//!   GOSET, unless the PLL has been stuck.
//! * VTP: READY rises a configurable number of reads after CLRZ goes high.
//!
//! Sequencing rules the real silicon relies on are checked as they happen
//! and reported through [`SimBank::violations`].

use heapless::{FnvIndexMap, Vec};

use super::pll::PllId;
use super::psc::{Module, MODULE_COUNT};
use super::regs::{ddr, psc, system, PLLC1, PLLC2};
use crate::bank::RegisterBank;

const TRACE_LEN: usize = 2048;
const REGISTERS: usize = 512;

/// Reads PTSTAT reports busy after a GO.
const GO_BUSY_READS: u32 = 2;
/// Reads of the lock status before a PLL reports lock.
const LOCK_READS: u32 = 3;
/// Default reads between CLRZ and READY.
const VTP_READS: u32 = 4;

const LOCK_MASK: u32 = 0b111 << 24;
const PLLEN: u32 = 1 << 0;
const PLLRST: u32 = 1 << 3;
const GOSET: u32 = 1 << 0;
const VTP_PWRDN: u32 = 1 << 6;
const VTP_CLRZ: u32 = 1 << 13;
const VTP_IOPWRDN: u32 = 1 << 14;
const VTP_READY: u32 = 1 << 15;
const SDBCR_TIMUNLOCK: u32 = 1 << 15;
const SDBCR_BOOTUNLOCK: u32 = 1 << 23;
const STATE_MASK: u32 = 0x1f;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Read { addr: usize, value: u32 },
    Write { addr: usize, value: u32 },
    Settle(u32),
}

/// A sequencing rule broken by the code driving the bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// Multiplier or divider written while the PLL drives the clock tree.
    RatioWriteWhileEnabled(usize),
    /// PLLEN raised without the lock pattern having been read.
    EnabledBeforeLock(PllId),
    /// SDBCR written with both unlock bits set.
    BothUnlocked(u32),
    /// DDR timing register written while SDBCR had timings locked.
    TimingWriteWhileLocked(usize),
    /// VTP powered down before READY was read back.
    VtpPowerDownBeforeReady,
    /// Trace storage ran out; later accesses were not recorded.
    TraceFull,
}

#[derive(Clone, Copy, Debug, Default)]
struct PllModel {
    /// Reads left before lock, `None` until GOSET
    countdown: Option<u32>,
    stuck: bool,
    lock_seen: bool,
}

pub struct SimBank {
    regs: FnvIndexMap<usize, u32, REGISTERS>,
    trace: Vec<Event, TRACE_LEN>,
    violations: Vec<Violation, 32>,
    busy: [u32; 8],
    go: [usize; 8],
    stuck_modules: u64,
    pll: [PllModel; 2],
    vtp_latency: u32,
    vtp_countdown: Option<u32>,
    vtp_ready_seen: bool,
}

impl Default for SimBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBank {
    /// Every register reads as zero.
    pub fn new() -> Self {
        Self {
            regs: FnvIndexMap::new(),
            trace: Vec::new(),
            violations: Vec::new(),
            busy: [0; 8],
            go: [0; 8],
            stuck_modules: 0,
            pll: [PllModel::default(); 2],
            vtp_latency: VTP_READS,
            vtp_countdown: None,
            vtp_ready_seen: false,
        }
    }

    pub fn trace(&self) -> &[Event] {
        &self.trace
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Values written to `addr`, oldest first.
    pub fn writes_to(&self, addr: usize) -> impl Iterator<Item = u32> + '_ {
        self.trace.iter().filter_map(move |e| match e {
            Event::Write { addr: a, value } if *a == addr => Some(*value),
            _ => None,
        })
    }

    /// Trace position of the first write to `addr`.
    pub fn first_write(&self, addr: usize) -> Option<usize> {
        self.trace
            .iter()
            .position(|e| matches!(e, Event::Write { addr: a, .. } if *a == addr))
    }

    pub fn last_write(&self, addr: usize) -> Option<u32> {
        self.writes_to(addr).last()
    }

    /// Stored value of `addr`, without side effects or tracing.
    pub fn peek(&self, addr: usize) -> u32 {
        self.regs.get(&addr).copied().unwrap_or(0)
    }

    /// Store `value` at `addr`, without side effects or tracing.
    pub fn poke(&mut self, addr: usize, value: u32) {
        self.store(addr, value);
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn set_module_state(&mut self, module: Module, state: u32) {
        self.store(psc::mdstat(module.index()).addr(), state & STATE_MASK);
    }

    pub fn module_state(&self, module: Module) -> u32 {
        self.peek(psc::mdstat(module.index()).addr()) & STATE_MASK
    }

    /// Keep `domain` busy in PTSTAT for the next `reads` reads.
    pub fn hold_domain_busy(&mut self, domain: u8, reads: u32) {
        self.busy[domain as usize] = reads;
    }

    /// GO bits written for `domain`.
    pub fn go_pulses(&self, domain: u8) -> usize {
        self.go[domain as usize]
    }

    /// `module` ignores every state change request.
    pub fn stick_module(&mut self, module: Module) {
        self.stuck_modules |= 1 << module.index();
    }

    /// `pll` never reports lock.
    pub fn stick_pll(&mut self, pll: PllId) {
        self.pll[pll_slot(pll)].stuck = true;
    }

    /// Reads of VTPIOCR between CLRZ rising and READY. `u32::MAX` never
    /// becomes ready.
    pub fn set_vtp_latency(&mut self, reads: u32) {
        self.vtp_latency = reads;
    }

    fn store(&mut self, addr: usize, value: u32) {
        // a full map drops the write, so the register keeps reading zero
        let _ = self.regs.insert(addr, value);
    }

    fn record(&mut self, event: Event) {
        if self.trace.push(event).is_err() {
            self.violate(Violation::TraceFull);
        }
    }

    fn violate(&mut self, v: Violation) {
        if !self.violations.contains(&v) {
            let _ = self.violations.push(v);
        }
    }

    fn model_read(&mut self, addr: usize) -> u32 {
        let stored = self.peek(addr);
        if addr == psc::PTSTAT.addr() {
            let mut value = 0;
            for (d, busy) in self.busy.iter_mut().enumerate() {
                if *busy > 0 {
                    value |= 1 << d;
                    *busy -= 1;
                }
            }
            return value;
        }
        if let Some(pll) = lock_status_owner(addr) {
            let m = &mut self.pll[pll_slot(pll)];
            let locked = match m.countdown {
                Some(0) => !m.stuck,
                Some(n) => {
                    m.countdown = Some(n - 1);
                    false
                }
                None => false,
            };
            if locked {
                m.lock_seen = true;
                return stored | LOCK_MASK;
            }
            return stored & !LOCK_MASK;
        }
        if addr == system::VTPIOCR.addr() {
            let ready = match self.vtp_countdown {
                _ if self.vtp_latency == u32::MAX => false,
                Some(0) => true,
                Some(n) => {
                    self.vtp_countdown = Some(n - 1);
                    false
                }
                None => false,
            };
            if ready {
                self.vtp_ready_seen = true;
                return stored | VTP_READY;
            }
            return stored;
        }
        stored
    }

    fn model_write(&mut self, addr: usize, value: u32) -> u32 {
        let old = self.peek(addr);

        if addr == psc::PTCMD.addr() {
            self.go_domains(value);
            return 0;
        }

        for (pll, c) in [(PllId::Pll1, PLLC1), (PllId::Pll2, PLLC2)] {
            let enabled = self.peek(c.pllctl().addr()) & PLLEN != 0;
            if c.is_ratio_register(addr) && enabled {
                self.violate(Violation::RatioWriteWhileEnabled(addr));
            }
            let m = &mut self.pll[pll_slot(pll)];
            if addr == c.pllctl().addr() {
                if value & PLLRST != 0 {
                    m.countdown = None;
                }
                if value & PLLEN == 0 {
                    m.lock_seen = false;
                } else if old & PLLEN == 0 && !m.lock_seen {
                    self.violate(Violation::EnabledBeforeLock(pll));
                }
            } else if addr == c.pllcmd().addr() && value & GOSET != 0 {
                m.countdown = Some(LOCK_READS);
                // GOSET is self-clearing
                return value & !GOSET;
            }
        }

        if addr == system::VTPIOCR.addr() {
            if value & VTP_CLRZ == 0 {
                self.vtp_countdown = None;
                self.vtp_ready_seen = false;
            } else if old & VTP_CLRZ == 0 {
                self.vtp_countdown = Some(self.vtp_latency);
            }
            let powering_down = value & !old & (VTP_PWRDN | VTP_IOPWRDN) != 0;
            if powering_down && !self.vtp_ready_seen {
                self.violate(Violation::VtpPowerDownBeforeReady);
            }
            return value & !VTP_READY;
        }

        if addr == ddr::SDBCR.addr() {
            let both = SDBCR_BOOTUNLOCK | SDBCR_TIMUNLOCK;
            if value & both == both {
                self.violate(Violation::BothUnlocked(value));
            }
        } else if [ddr::SDTIMR.addr(), ddr::SDTIMR2.addr(), ddr::PBBPR.addr()].contains(&addr)
            && self.peek(ddr::SDBCR.addr()) & SDBCR_TIMUNLOCK == 0
        {
            self.violate(Violation::TimingWriteWhileLocked(addr));
        }

        value
    }

    fn go_domains(&mut self, value: u32) {
        for d in 0..self.go.len() {
            if value & (1 << d) == 0 {
                continue;
            }
            self.go[d] += 1;
            // every module sits in the always-on domain on this part
            if d == 0 {
                for m in 0..MODULE_COUNT {
                    if self.stuck_modules & (1 << m) != 0 {
                        continue;
                    }
                    let next = self.peek(psc::mdctl(m).addr()) & STATE_MASK;
                    let stat = psc::mdstat(m).addr();
                    if self.peek(stat) & STATE_MASK != next {
                        let v = (self.peek(stat) & !STATE_MASK) | next;
                        self.store(stat, v);
                    }
                }
            }
            self.busy[d] = self.busy[d].max(GO_BUSY_READS);
        }
    }
}

impl RegisterBank for SimBank {
    fn read_raw(&mut self, addr: usize) -> u32 {
        let value = self.model_read(addr);
        self.record(Event::Read { addr, value });
        value
    }

    fn write_raw(&mut self, addr: usize, value: u32) {
        self.record(Event::Write { addr, value });
        let stored = self.model_write(addr, value);
        self.store(addr, stored);
    }

    fn settle(&mut self, loops: u32) {
        self.record(Event::Settle(loops));
    }
}

const fn pll_slot(pll: PllId) -> usize {
    match pll {
        PllId::Pll1 => 0,
        PllId::Pll2 => 1,
    }
}

fn lock_status_owner(addr: usize) -> Option<PllId> {
    [PllId::Pll1, PllId::Pll2]
        .into_iter()
        .find(|p| p.lock_status().addr() == addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_storage() {
        let mut sim = SimBank::new();
        assert_eq!(sim.read_raw(0x1000), 0);
        sim.write_raw(0x1000, 0xabcd);
        assert_eq!(sim.read_raw(0x1000), 0xabcd);
        assert_eq!(
            sim.trace(),
            &[
                Event::Read { addr: 0x1000, value: 0 },
                Event::Write { addr: 0x1000, value: 0xabcd },
                Event::Read { addr: 0x1000, value: 0xabcd },
            ]
        );
    }

    #[test]
    fn go_moves_pending_modules() {
        let mut sim = SimBank::new();
        sim.write_raw(psc::mdctl(19).addr(), 3);
        sim.write_raw(psc::PTCMD.addr(), 1);
        assert_eq!(sim.peek(psc::mdstat(19).addr()), 3);
        assert_eq!(sim.read_raw(psc::PTSTAT.addr()), 1);
        assert_eq!(sim.read_raw(psc::PTSTAT.addr()), 1);
        assert_eq!(sim.read_raw(psc::PTSTAT.addr()), 0);
        assert_eq!(sim.go_pulses(0), 1);
    }

    #[test]
    fn pll_locks_only_after_goset() {
        let mut sim = SimBank::new();
        let status = system::PLL0_CONFIG.addr();
        for _ in 0..10 {
            assert_eq!(sim.read_raw(status) & LOCK_MASK, 0);
        }
        sim.write_raw(PLLC1.pllcmd().addr(), 1);
        assert_eq!(sim.peek(PLLC1.pllcmd().addr()), 0);
        let reads = (0..10)
            .position(|_| sim.read_raw(status) & LOCK_MASK == LOCK_MASK)
            .unwrap();
        assert_eq!(reads as u32, LOCK_READS);
    }

    #[test]
    fn enable_without_lock_is_flagged() {
        let mut sim = SimBank::new();
        sim.write_raw(PLLC1.pllctl().addr(), 1);
        assert_eq!(sim.violations(), &[Violation::EnabledBeforeLock(PllId::Pll1)]);
    }

    #[test]
    fn sdbcr_rules() {
        let mut sim = SimBank::new();
        sim.write_raw(ddr::SDTIMR.addr(), 1);
        sim.write_raw(ddr::SDBCR.addr(), SDBCR_BOOTUNLOCK | SDBCR_TIMUNLOCK);
        assert_eq!(
            sim.violations(),
            &[
                Violation::TimingWriteWhileLocked(ddr::SDTIMR.addr()),
                Violation::BothUnlocked(SDBCR_BOOTUNLOCK | SDBCR_TIMUNLOCK),
            ]
        );
    }

    #[test]
    fn vtp_ready_after_latency() {
        let mut sim = SimBank::new();
        let vtp = system::VTPIOCR.addr();
        sim.set_vtp_latency(2);
        sim.write_raw(vtp, VTP_CLRZ);
        assert_eq!(sim.read_raw(vtp) & VTP_READY, 0);
        assert_eq!(sim.read_raw(vtp) & VTP_READY, 0);
        assert_ne!(sim.read_raw(vtp) & VTP_READY, 0);
        sim.write_raw(vtp, VTP_CLRZ | VTP_READY | VTP_PWRDN);
        assert_eq!(sim.peek(vtp) & VTP_READY, 0);
        assert!(sim.violations().is_empty());
    }

    #[test]
    fn vtp_power_down_too_early() {
        let mut sim = SimBank::new();
        let vtp = system::VTPIOCR.addr();
        sim.write_raw(vtp, VTP_CLRZ);
        sim.write_raw(vtp, VTP_CLRZ | VTP_IOPWRDN);
        assert_eq!(sim.violations(), &[Violation::VtpPowerDownBeforeReady]);
    }
}
