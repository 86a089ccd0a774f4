//! Register-bank access.
//!
//! Every bring-up component talks to the hardware through a [`RegisterBank`]
//! that it borrows for the duration of the operation. On the board that bank
//! is [`Mmio`]; on the host it is a model of the SoC, which lets the
//! sequencing logic be tested without touching it.

use core::marker::PhantomData;

use oreboot_asm::io::{clrsetbits_le32, readl, writel};
use tock_registers::{
    fields::{Field, FieldValue},
    LocalRegisterCopy, RegisterLongName,
};

/// Address of a 32-bit register whose layout is described by `R`.
pub struct Reg<R: RegisterLongName = ()> {
    addr: usize,
    layout: PhantomData<R>,
}

// Manual impls: deriving would require `R: Copy`.
impl<R: RegisterLongName> Clone for Reg<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: RegisterLongName> Copy for Reg<R> {}

impl<R: RegisterLongName> Reg<R> {
    pub const fn new(addr: usize) -> Self {
        Self {
            addr,
            layout: PhantomData,
        }
    }

    pub const fn addr(self) -> usize {
        self.addr
    }
}

impl<R: RegisterLongName> core::fmt::Debug for Reg<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Reg({:#010x})", self.addr)
    }
}

pub trait RegisterBank {
    fn read_raw(&mut self, addr: usize) -> u32;

    fn write_raw(&mut self, addr: usize, value: u32);

    /// Burn at least `loops` busy-wait iterations.
    fn settle(&mut self, loops: u32);

    fn get<R: RegisterLongName>(&mut self, reg: Reg<R>) -> LocalRegisterCopy<u32, R> {
        LocalRegisterCopy::new(self.read_raw(reg.addr()))
    }

    fn read<R: RegisterLongName>(&mut self, reg: Reg<R>, field: Field<u32, R>) -> u32 {
        self.get(reg).read(field)
    }

    fn is_set<R: RegisterLongName>(&mut self, reg: Reg<R>, field: Field<u32, R>) -> bool {
        self.get(reg).is_set(field)
    }

    /// Write `value`; every bit outside its fields is written as zero.
    fn write<R: RegisterLongName>(&mut self, reg: Reg<R>, value: FieldValue<u32, R>) {
        self.write_raw(reg.addr(), value.value);
    }

    fn set<R: RegisterLongName>(&mut self, reg: Reg<R>, raw: u32) {
        self.write_raw(reg.addr(), raw);
    }

    /// Read-modify-write of the fields named in `value`.
    fn modify<R: RegisterLongName>(&mut self, reg: Reg<R>, value: FieldValue<u32, R>) {
        let current = self.read_raw(reg.addr());
        self.write_raw(reg.addr(), value.modify(current));
    }
}

/// The real thing: volatile accesses to the physical register blocks.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// The caller must be the only code touching the SoC register blocks
    /// for as long as the returned bank is alive.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBank for Mmio {
    fn read_raw(&mut self, addr: usize) -> u32 {
        unsafe { readl(addr) }
    }

    fn write_raw(&mut self, addr: usize, value: u32) {
        unsafe { writel(value, addr) }
    }

    fn settle(&mut self, loops: u32) {
        util::delay::spin(loops);
    }

    fn modify<R: RegisterLongName>(&mut self, reg: Reg<R>, value: FieldValue<u32, R>) {
        unsafe { clrsetbits_le32(reg.addr(), value.mask(), value.value) }
    }
}
