//! PLL controller lock sequence.
//!
//! Both controllers run the same protocol: drop to bypass, cycle the PLL
//! through reset, reload the ratio fields, commit the dividers with GOSET,
//! wait for the lock pattern in the system module and only then switch the
//! output back from the reference clock to the PLL.

use log::{debug, trace};
use util::PollPolicy;

use super::error::{Error, WaitPoint};
use super::regs::{
    system, Pllc, PLLC1, PLLC2, PLLCMD, PLLCTL, PLLDIV, PLLM, PLL_CONFIG, SECCTL,
};
use crate::bank::{Reg, RegisterBank};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PllId {
    /// PLLC1: ARM/system clocks on most profiles
    Pll1,
    /// PLLC2: DDR and video clocks on most profiles
    Pll2,
}

/// Busy-wait lengths between the steps of the lock sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PllTiming {
    pub bypass: u32,
    pub reset: u32,
    pub pre_go: u32,
    pub post_go: u32,
    pub post_lock: u32,
}

const PLL1_TIMING: PllTiming = PllTiming {
    bypass: 150,
    reset: 300,
    pre_go: 300,
    post_go: 300,
    post_lock: 0,
};

const PLL2_TIMING: PllTiming = PllTiming {
    bypass: 50,
    reset: 300,
    pre_go: 0,
    post_go: 150,
    post_lock: 4100,
};

impl PllId {
    pub const fn controller(self) -> Pllc {
        match self {
            PllId::Pll1 => PLLC1,
            PllId::Pll2 => PLLC2,
        }
    }

    /// Lock status lives in the system module, not the controller.
    pub const fn lock_status(self) -> Reg<PLL_CONFIG::Register> {
        match self {
            PllId::Pll1 => system::PLL0_CONFIG,
            PllId::Pll2 => system::PLL1_CONFIG,
        }
    }

    pub const fn timing(self) -> PllTiming {
        match self {
            PllId::Pll1 => PLL1_TIMING,
            PllId::Pll2 => PLL2_TIMING,
        }
    }

    /// PLLC2 only implements PLLDIV1..5.
    pub const fn max_dividers(self) -> usize {
        match self {
            PllId::Pll1 => 9,
            PllId::Pll2 => 5,
        }
    }
}

/// Multiplier and divider settings for one PLL. Divider values are the raw
/// register ratios, i.e. the divide factor minus one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PllParams {
    pub multiplier: u16,
    pub pre_divider: u8,
    pub post_divider: u8,
    pub dividers: &'static [u8],
}

const RATIO_MAX: u8 = 0x1f;
const MULT_MAX: u16 = 0x3ff;

impl PllParams {
    pub fn validate(&self, pll: PllId) -> Result<(), Error> {
        let field = if self.multiplier > MULT_MAX {
            "multiplier"
        } else if self.pre_divider > RATIO_MAX {
            "pre-divider"
        } else if self.post_divider > RATIO_MAX {
            "post-divider"
        } else if self.dividers.len() > pll.max_dividers() {
            "divider count"
        } else if self.dividers.iter().any(|d| *d > RATIO_MAX) {
            "divider"
        } else {
            return Ok(());
        };
        Err(Error::InvalidProfile { pll, field })
    }

    /// VCO output for a reference clock of `ref_hz`.
    pub const fn vco_hz(&self, ref_hz: u32) -> u64 {
        ref_hz as u64 * 2 * self.multiplier as u64 / (self.pre_divider as u64 + 1)
    }
}

fn ratio(r: u8) -> tock_registers::fields::FieldValue<u32, PLLDIV::Register> {
    PLLDIV::DEN::SET + PLLDIV::RATIO.val(r as u32)
}

pub struct PllSequencer<'a, B: RegisterBank> {
    bank: &'a mut B,
    poll: PollPolicy,
}

impl<'a, B: RegisterBank> PllSequencer<'a, B> {
    pub fn new(bank: &'a mut B, poll: PollPolicy) -> Self {
        Self { bank, poll }
    }

    /// Reprogram `pll` with `params` and wait for it to lock.
    ///
    /// Nothing is written if `params` do not fit the controller.
    pub fn lock(&mut self, pll: PllId, params: &PllParams) -> Result<(), Error> {
        params.validate(pll)?;
        let c = pll.controller();
        let t = pll.timing();
        debug!(
            "{pll:?}: M {} prediv {} dividers {:?}",
            params.multiplier, params.pre_divider, params.dividers
        );

        // power up on the MXI oscillator, PLLEN under register control
        self.bank.modify(c.pllctl(), PLLCTL::PLLPWRDN::CLEAR);
        self.bank.modify(c.pllctl(), PLLCTL::CLKMODE::Oscillator);
        self.bank.modify(c.pllctl(), PLLCTL::PLLENSRC::CLEAR);

        self.bank.modify(c.pllctl(), PLLCTL::PLLEN::Bypass);
        self.settle(t.bypass);

        self.bank.modify(c.pllctl(), PLLCTL::PLLRST::SET);
        self.settle(t.reset);
        self.bank.modify(c.pllctl(), PLLCTL::PLLRST::CLEAR);

        self.bank
            .write(c.pllm(), PLLM::MULT.val(params.multiplier as u32));
        self.bank.write(c.prediv(), ratio(params.pre_divider));

        // divider latch init
        let stop = SECCTL::STOPMODE::SET;
        for step in [
            stop + SECCTL::TENABLEDIV::SET + SECCTL::TENABLE::SET + SECCTL::TINITZ::SET,
            stop + SECCTL::TENABLEDIV::SET + SECCTL::TENABLE::SET,
            stop,
            stop + SECCTL::TINITZ::SET,
        ] {
            self.bank.write(c.secctl(), step);
        }

        self.bank.write(c.postdiv(), ratio(params.post_divider));
        for (i, d) in params.dividers.iter().enumerate() {
            self.bank.write(c.plldiv(i + 1), ratio(*d));
        }
        self.settle(t.pre_go);

        self.bank.write(c.pllcmd(), PLLCMD::GOSET::SET);
        self.settle(t.post_go);

        let status = pll.lock_status();
        let bank = &mut *self.bank;
        let polls = self
            .poll
            .wait(|| bank.get(status).matches_all(PLL_CONFIG::LOCK::Locked))
            .map_err(Error::timeout(WaitPoint::PllLock(pll)))?;
        trace!("{pll:?}: locked after {polls} polls");
        self.settle(t.post_lock);

        self.bank.modify(c.pllctl(), PLLCTL::PLLEN::Pll);
        Ok(())
    }

    fn settle(&mut self, loops: u32) {
        if loops != 0 {
            self.bank.settle(loops);
        }
    }
}
