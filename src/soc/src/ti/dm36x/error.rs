use core::fmt;

use util::Exhausted;

use super::periph::Peripheral;
use super::pll::PllId;
use super::psc::{Module, ModuleState, PowerDomain};

/// Hardware condition a bring-up step was waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitPoint {
    /// PTSTAT.GOSTAT for the domain to drop
    DomainIdle(PowerDomain),
    /// MDSTAT of the module to report the requested state
    ModuleState { module: Module, state: ModuleState },
    /// The three PLL lock bits in the system module
    PllLock(PllId),
    /// VTP impedance calibration to finish
    VtpReady,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The hardware never reported the awaited condition. Only produced
    /// under a bounded [`util::PollPolicy`].
    HardwareTimeout { wait: WaitPoint, polls: u32 },
    /// A leaf initialiser was asked for an instance the board does not have.
    InvalidPeripheral { peripheral: Peripheral, index: u8 },
    /// Module index outside the PSC.
    InvalidModule { index: u8 },
    /// Pin-mux register index outside PINMUX0..4.
    InvalidPinmux { register: usize },
    /// A profile value does not fit its register field.
    InvalidProfile { pll: PllId, field: &'static str },
}

impl Error {
    pub(crate) fn timeout(wait: WaitPoint) -> impl FnOnce(Exhausted) -> Error {
        move |e| Error::HardwareTimeout {
            wait,
            polls: e.polls,
        }
    }

    /// Hardware non-responsiveness, as opposed to a rejected argument.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Error::HardwareTimeout { .. })
    }
}

impl fmt::Display for WaitPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitPoint::DomainIdle(pd) => write!(f, "power domain {} idle", pd.index()),
            WaitPoint::ModuleState { module, state } => {
                write!(f, "module {} to reach {:?}", module.index(), state)
            }
            WaitPoint::PllLock(pll) => write!(f, "{pll:?} lock"),
            WaitPoint::VtpReady => write!(f, "VTP calibration ready"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HardwareTimeout { wait, polls } => {
                write!(f, "timed out after {polls} polls waiting for {wait}")
            }
            Error::InvalidPeripheral { peripheral, index } => {
                write!(f, "no {peripheral:?} instance {index}")
            }
            Error::InvalidModule { index } => write!(f, "no PSC module {index}"),
            Error::InvalidPinmux { register } => write!(f, "no PINMUX{register} register"),
            Error::InvalidProfile { pll, field } => {
                write!(f, "{pll:?} {field} does not fit its register field")
            }
        }
    }
}
