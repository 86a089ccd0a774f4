//! TI DM36x (DM365/DM368) first-stage bring-up.
//!
//! Everything here runs against a [`RegisterBank`](crate::bank::RegisterBank)
//! borrowed from the caller, so the same code drives the silicon through
//! [`Mmio`](crate::bank::Mmio) and the host model in [`sim`].

pub mod bootmode;
pub mod ddr;
pub mod error;
pub mod flag;
pub mod init;
pub mod periph;
pub mod pll;
pub mod profile;
pub mod psc;
pub mod regs;
pub mod reset;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use error::{Error, WaitPoint};
pub use init::{BringUp, Config, Outcome};
pub use profile::Profile;
pub use reset::ResetOrigin;
