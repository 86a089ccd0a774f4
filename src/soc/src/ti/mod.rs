#[cfg(any(feature = "ti_dm36x", test))]
pub mod dm36x;
