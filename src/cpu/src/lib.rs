#![no_std]

#[cfg(feature = "arm926")]
pub mod arm926;
