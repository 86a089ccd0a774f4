use oreboot_soc::ti::dm36x::profile::{self, Profile};

#[cfg(feature = "arm216-ddr173-osc19p2")]
const PROFILE: &str = "arm216-ddr173-osc19p2";
#[cfg(feature = "arm216-ddr173-osc24")]
const PROFILE: &str = "arm216-ddr173-osc24";
#[cfg(feature = "arm270-ddr216-osc27")]
const PROFILE: &str = "arm270-ddr216-osc27";
#[cfg(feature = "arm297-ddr243-osc24")]
const PROFILE: &str = "arm297-ddr243-osc24";
#[cfg(feature = "arm297-ddr270-osc24")]
const PROFILE: &str = "arm297-ddr270-osc24";
#[cfg(feature = "arm297-ddr277-osc27")]
const PROFILE: &str = "arm297-ddr277-osc27";
#[cfg(feature = "arm432-ddr340-osc24")]
const PROFILE: &str = "arm432-ddr340-osc24";
#[cfg(feature = "arm445-ddr351-osc24")]
const PROFILE: &str = "arm445-ddr351-osc24";
#[cfg(not(any(
    feature = "arm216-ddr173-osc19p2",
    feature = "arm216-ddr173-osc24",
    feature = "arm270-ddr216-osc27",
    feature = "arm297-ddr243-osc24",
    feature = "arm297-ddr270-osc24",
    feature = "arm297-ddr277-osc27",
    feature = "arm432-ddr340-osc24",
    feature = "arm445-ddr351-osc24",
)))]
const PROFILE: &str = "default";

/// Force the NAND EMIF setup even when strapped for another boot device.
pub const FORCE_NAND: bool = cfg!(feature = "nand");

pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

pub fn profile() -> &'static Profile {
    profile::by_name(PROFILE).unwrap_or(&profile::DEFAULT)
}
