//! Interrupt controller, pin-mux and the single-shot peripheral setup that
//! closes out bring-up.

use log::{debug, trace};
use util::PollPolicy;

use super::error::Error;
use super::psc::{Module, ModuleState, PowerDomain, Psc};
use super::regs::{aemif, aintc, gpio, i2c0, system, timer0, uart0, ICMDR};
use crate::bank::RegisterBank;

/// Peripheral kinds with indexed leaf initialisers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Peripheral {
    AsyncMem,
    Uart,
    Spi,
    SdMmc,
}

pub const PINMUX_COUNT: usize = 5;

/// Fixed pin-mux image: video in/out, EMIFA, SPI/UART1/I2C/SD/McBSP and
/// MMC/SD0 in place of MemoryStick.
pub const BOOT_PINMUX: [u32; PINMUX_COUNT] = [
    0x00fd_0000,
    0x0014_5555,
    0x0000_00da,
    0x0018_0000,
    0x5555_5555,
];

const EMIF_PINMUX_MASK: u32 = 0x0000_00ff;
const SPI0_PINMUX_MASK: u32 = 0xff00_0000;
const SPI0_PINMUX: u32 = 0x3600_0000;

/// GPIO bank 2 line 24, driven low at boot.
const GPIO_BOOT_LINE: u32 = 1 << 24;

/// 115200 8N1 from the 24 MHz UART reference.
const UART_DIVISOR: u32 = 13;
/// TX/RX enabled, free-running under emulation
const UART_PWREMU_RUN: u32 = 0xe001;

/// Five seconds at 24 MHz.
pub const TIMER0_PERIOD: u32 = 0x0727_0e00;

pub struct Peripherals<'a, B: RegisterBank> {
    bank: &'a mut B,
    poll: PollPolicy,
}

impl<'a, B: RegisterBank> Peripherals<'a, B> {
    pub fn new(bank: &'a mut B, poll: PollPolicy) -> Self {
        Self { bank, poll }
    }

    fn enable(&mut self, module: Module) -> Result<(), Error> {
        Psc::new(self.bank, self.poll).transition(
            module,
            PowerDomain::ALWAYS_ON,
            ModuleState::Enable,
        )
    }

    /// Mask every AINTC source, then clear anything already pending.
    pub fn mask_interrupts(&mut self) {
        trace!("aintc: mask and clear");
        self.bank.set(aintc::INTCTL, 0x4);
        self.bank.set(aintc::EABASE, 0);
        self.bank.set(aintc::EINT0, 0);
        self.bank.set(aintc::EINT1, 0);

        for r in [aintc::FIQ0, aintc::FIQ1, aintc::IRQ0, aintc::IRQ1] {
            self.bank.set(r, 0xffff_ffff);
        }
    }

    /// Replace the bits selected by `mask` in PINMUX`register`.
    pub fn pinmux_control(&mut self, register: usize, mask: u32, value: u32) -> Result<(), Error> {
        if register >= PINMUX_COUNT {
            return Err(Error::InvalidPinmux { register });
        }
        let reg = system::pinmux(register);
        let current = self.bank.get(reg).get();
        self.bank.set(reg, (current & !mask) | (value & mask));
        Ok(())
    }

    pub fn boot_pinmux(&mut self) -> Result<(), Error> {
        for (i, v) in BOOT_PINMUX.iter().enumerate() {
            self.pinmux_control(i, 0xffff_ffff, *v)?;
        }
        let dir = self.bank.get(gpio::DIR23).get();
        self.bank.set(gpio::DIR23, dir & !GPIO_BOOT_LINE);
        self.bank.set(gpio::CLR_DATA23, GPIO_BOOT_LINE);
        Ok(())
    }

    pub fn async_mem_init(&mut self, index: u8) -> Result<(), Error> {
        if index != 0 {
            return Err(Error::InvalidPeripheral {
                peripheral: Peripheral::AsyncMem,
                index,
            });
        }
        self.enable(Module::AEMIF)?;
        self.pinmux_control(2, EMIF_PINMUX_MASK, BOOT_PINMUX[2])
    }

    /// UART0 is brought up at 115200 8N1. UART1 and UART2 have nothing to
    /// set up at this stage.
    pub fn uart_init(&mut self, index: u8) -> Result<(), Error> {
        match index {
            0 => {}
            1 | 2 => return Ok(()),
            _ => {
                return Err(Error::InvalidPeripheral {
                    peripheral: Peripheral::Uart,
                    index,
                })
            }
        }
        let mut psc = Psc::new(self.bank, self.poll);
        psc.transition(Module::UART0, PowerDomain::ALWAYS_ON, ModuleState::SyncReset)?;
        psc.transition(Module::UART0, PowerDomain::ALWAYS_ON, ModuleState::Enable)?;

        // hold TX and RX in reset while reprogramming
        self.bank.set(uart0::PWREMU_MGMT, 0);
        self.bank.settle(100);

        self.bank.set(uart0::MDR, 0);
        self.bank.set(uart0::DLL, UART_DIVISOR);
        self.bank.set(uart0::DLH, 0);
        self.bank.set(uart0::FCR, 0x7);
        self.bank.set(uart0::FCR, 0x0);
        self.bank.set(uart0::IER, 0x7);
        self.bank.set(uart0::LCR, 0x3);
        self.bank.set(uart0::MCR, 0);
        self.bank.set(uart0::PWREMU_MGMT, UART_PWREMU_RUN);
        debug!("uart0: up");
        Ok(())
    }

    pub fn spi_init(&mut self, index: u8) -> Result<(), Error> {
        if index != 0 {
            return Err(Error::InvalidPeripheral {
                peripheral: Peripheral::Spi,
                index,
            });
        }
        self.enable(Module::SPI0)?;
        self.pinmux_control(3, SPI0_PINMUX_MASK, SPI0_PINMUX)
    }

    /// SD/MMC0 shares the PINMUX3 setting used for SPI0.
    pub fn sdmmc_init(&mut self, index: u8) -> Result<(), Error> {
        if index != 0 {
            return Err(Error::InvalidPeripheral {
                peripheral: Peripheral::SdMmc,
                index,
            });
        }
        self.enable(Module::SDMMC0)?;
        self.pinmux_control(3, SPI0_PINMUX_MASK, SPI0_PINMUX)
    }

    /// AEMIF timings for NAND on chip select 2.
    pub fn emif_init(&mut self) {
        self.bank.set(aemif::AWCCR, 0xff);
        self.bank.set(aemif::A1CR, 0x0040_0204);
        let nandfcr = self.bank.get(aemif::NANDFCR).get();
        self.bank.set(aemif::NANDFCR, nandfcr | 1);
        self.bank.set(aemif::A2CR, 0x00a0_0505);
    }

    /// 64-bit general purpose mode, stopped, period loaded.
    pub fn timer0_init(&mut self) {
        self.bank.set(timer0::EMUMGT_CLKSPD, 0x3);
        self.bank.set(timer0::TCR, 0);
        self.bank.set(timer0::INTCTL_STAT, 0x1);
        self.bank.set(timer0::TGCR, 0x3);
        self.bank.set(timer0::TIM12, 0);
        self.bank.set(timer0::TIM34, 0);
        self.bank.set(timer0::PRD34, 0);
        self.bank.set(timer0::PRD12, TIMER0_PERIOD);
    }

    /// One-shot run of TIMER12.
    pub fn timer0_start(&mut self) {
        let irq1 = self.bank.get(aintc::IRQ1).get();
        self.bank.set(aintc::IRQ1, irq1 | 1);
        self.bank.set(timer0::TGCR, 0);
        self.bank.set(timer0::TIM12, 0);
        self.bank.set(timer0::TCR, 0x40);
        self.bank.set(timer0::TGCR, 0x5);
    }

    pub fn timer0_stop(&mut self) {
        let irq1 = self.bank.get(aintc::IRQ1).get();
        self.bank.set(aintc::IRQ1, irq1 | 1);
        self.bank.set(timer0::TCR, 0);
        self.bank.set(timer0::TGCR, 0);
        self.bank.set(timer0::TIM12, 0);
    }

    /// TINT0 pending in the interrupt controller.
    pub fn timer0_expired(&mut self) -> bool {
        self.bank.get(aintc::IRQ1).get() & 1 != 0
    }

    /// 20 kHz bus clock from the 27 MHz I2C reference.
    pub fn i2c0_init(&mut self) {
        self.bank.set(i2c0::ICMDR, 0);
        self.bank.set(i2c0::ICPSC, 26);
        self.bank.set(i2c0::ICCLKL, 20);
        self.bank.set(i2c0::ICCLKH, 20);
        self.bank.modify(i2c0::ICMDR, ICMDR::IRS::SET);
    }
}
