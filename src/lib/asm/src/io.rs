//! IO functions after u-boot headers: <arch/arm/include/asm/io.h>
//!
//! The DM36x peripheral blocks only decode 32-bit accesses, so only the
//! long-word accessors are provided.

use core::ptr::{read_volatile, write_volatile};

/// Read a 32-bit device register.
///
/// # Safety
///
/// `a` must be a mapped, 4-byte aligned device register or RAM word.
#[inline(always)]
pub unsafe fn readl(a: usize) -> u32 {
    u32::from_le(read_volatile::<u32>(a as *const u32))
}

/// Write a 32-bit device register.
///
/// # Safety
///
/// `a` must be a mapped, 4-byte aligned device register or RAM word.
#[inline(always)]
pub unsafe fn writel(v: u32, a: usize) {
    write_volatile::<u32>(a as *mut u32, v.to_le())
}

/// Read-modify-write: clear the bits in `clear`, then set the bits in `set`.
///
/// # Safety
///
/// Same requirements as [`readl`] and [`writel`].
#[inline(always)]
pub unsafe fn clrsetbits_le32(a: usize, clear: u32, set: u32) {
    writel((readl(a) & !clear) | set, a)
}
