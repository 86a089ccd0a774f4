#![no_std]

pub mod delay;
pub mod poll;
pub mod status;

pub use poll::{Exhausted, PollPolicy};
pub use status::Status;
