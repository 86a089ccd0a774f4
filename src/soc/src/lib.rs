#![no_std]

pub mod bank;

#[cfg(any(feature = "ti", test))]
pub mod ti;
