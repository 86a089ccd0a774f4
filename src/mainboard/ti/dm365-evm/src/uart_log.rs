//! `log` backend on UART0, usable once the UART has been initialised.

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};
use oreboot_soc::bank::{Mmio, RegisterBank};
use oreboot_soc::ti::dm36x::regs::uart0;
use spin::Mutex;

struct Uart0 {
    bank: Mmio,
}

impl Uart0 {
    fn putc(&mut self, c: u8) {
        while self.bank.read_raw(uart0::LSR.addr()) & uart0::LSR_THRE == 0 {
            core::hint::spin_loop();
        }
        self.bank.set(uart0::THR, c as u32);
    }
}

impl Write for Uart0 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.bytes() {
            if c == b'\n' {
                self.putc(b'\r');
            }
            self.putc(c);
        }
        Ok(())
    }
}

struct Logger {
    uart: Mutex<Option<Uart0>>,
}

static LOGGER: Logger = Logger {
    uart: Mutex::new(None),
};

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(uart) = self.uart.lock().as_mut() {
            let _ = writeln!(uart, "[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// # Safety
///
/// UART0 must be powered and programmed, and nothing else may write to it
/// afterwards.
pub unsafe fn init(level: LevelFilter) {
    *LOGGER.uart.lock() = Some(Uart0 { bank: Mmio::new() });
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
