//! Boot strap decode from BOOTCFG.

use super::regs::{system, BOOTCFG};
use crate::bank::RegisterBank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootMode {
    Nand,
    Nor,
    SdMmc,
    Uart,
    Usb,
    SpiMem,
    Emac,
    Hpi,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusWidth {
    Bits8,
    Bits16,
}

/// Boot device the ROM was strapped for.
pub fn boot_mode<B: RegisterBank>(bank: &mut B) -> BootMode {
    use BOOTCFG::BTSEL::Value;

    // BTSEL is three bits wide and all eight encodings are assigned
    match bank.get(system::BOOTCFG).read_as_enum::<Value>(BOOTCFG::BTSEL) {
        Some(Value::Nand) | None => BootMode::Nand,
        Some(Value::Nor) => BootMode::Nor,
        Some(Value::SdMmc) => BootMode::SdMmc,
        Some(Value::Uart) => BootMode::Uart,
        Some(Value::Usb) => BootMode::Usb,
        Some(Value::Spi) => BootMode::SpiMem,
        Some(Value::Emac) => BootMode::Emac,
        Some(Value::Hpi) => BootMode::Hpi,
    }
}

/// AEMIF data bus width strap.
pub fn emif_bus_width<B: RegisterBank>(bank: &mut B) -> BusWidth {
    if bank.is_set(system::BOOTCFG, BOOTCFG::EM_WIDTH) {
        BusWidth::Bits16
    } else {
        BusWidth::Bits8
    }
}
