//! ARM926EJ-S helpers used during early bring-up.

#[cfg(target_arch = "arm")]
use core::arch::asm;

/// CPSR I bit
pub const CPSR_IRQ_DISABLE: u32 = 1 << 7;
/// CPSR F bit
pub const CPSR_FIQ_DISABLE: u32 = 1 << 6;

/// Mask IRQ and FIQ at the core. The boot ROM hands over with both masked;
/// this makes it explicit before the interrupt controller is touched.
#[inline(always)]
pub fn mask_interrupts() {
    #[cfg(target_arch = "arm")]
    unsafe {
        asm!(
            "mrs {tmp}, cpsr",
            "orr {tmp}, {tmp}, {bits}",
            "msr cpsr_c, {tmp}",
            tmp = out(reg) _,
            bits = in(reg) CPSR_IRQ_DISABLE | CPSR_FIQ_DISABLE,
        );
    }
}

/// Wait for interrupt. On ARMv5 this is the CP15 c7 "wait for interrupt"
/// operation rather than the `wfi` instruction.
#[inline(always)]
pub fn wait_for_interrupt() {
    #[cfg(target_arch = "arm")]
    unsafe {
        asm!("mcr p15, 0, {zero}, c7, c0, 4", zero = in(reg) 0u32);
    }
    #[cfg(not(target_arch = "arm"))]
    core::hint::spin_loop();
}

/// Stop here for good. Interrupts are masked, so nothing but a reset or
/// the watchdog gets the core out of this loop.
pub fn hang() -> ! {
    mask_interrupts();
    loop {
        wait_for_interrupt();
    }
}
