#![doc = include_str!("../README.md")]
#![no_std]
#![no_main]

mod configs;
mod uart_log;

use core::panic::PanicInfo;

use log::{error, info};
use oreboot_cpu::arm926;
use oreboot_soc::bank::Mmio;
use oreboot_soc::ti::dm36x::bootmode::{self, BootMode};
use oreboot_soc::ti::dm36x::periph::Peripherals;
use oreboot_soc::ti::dm36x::{BringUp, Config, Outcome};
use util::PollPolicy;

#[cfg(target_arch = "arm")]
core::arch::global_asm!(
    ".section .text.start, \"ax\"",
    ".global _start",
    "_start:",
    "    ldr sp, =__stack_top",
    "    ldr r0, =__bss_start",
    "    ldr r1, =__bss_end",
    "    mov r2, #0",
    "1:  cmp r0, r1",
    "    strlo r2, [r0], #4",
    "    blo 1b",
    "    bl main",
    "2:  b 2b",
);

#[no_mangle]
unsafe extern "C" fn main() -> usize {
    arm926::mask_interrupts();

    let mut bank = Mmio::new();
    let strapped = bootmode::boot_mode(&mut bank);
    let config = Config {
        profile: configs::profile(),
        poll: PollPolicy::Forever,
        nand_boot: configs::FORCE_NAND || strapped == BootMode::Nand,
    };

    let mut bringup = BringUp::new(bank, config);
    let status = match bringup.run() {
        Ok(Outcome::Completed(status)) => status,
        Ok(Outcome::Halted(_)) | Err(_) => arm926::hang(),
    };

    let mut bank = bringup.into_bank();
    if Peripherals::new(&mut bank, PollPolicy::Forever)
        .uart_init(0)
        .is_ok()
    {
        uart_log::init(configs::LOG_LEVEL);
    }
    info!(
        "{} booted from {strapped:?}, status {}",
        config.profile.banner,
        status.code()
    );
    if !status.is_pass() {
        error!("bring-up failed");
    }
    status.code() as usize
}

#[cfg_attr(not(test), panic_handler)]
fn panic(info: &PanicInfo) -> ! {
    if let Some(location) = info.location() {
        error!("panic in '{}' line {}", location.file(), location.line());
    } else {
        error!("panic at unknown location");
    }
    arm926::hang()
}
