//! Host command dispatcher
//!
//! One session per wake byte:
//!
//! 1. read the wake byte (value ignored)
//! 2. assert the external reset line
//! 3. read the command byte and dispatch it
//! 4. release the external reset line
//!
//! Flash commands identify the part first and announce it with a banner.
//! An unidentifiable part is fatal: [`Dispatcher::serve`] reports it and
//! then blinks the fault indicator until the board is reset.

use core::fmt::Write as _;

use embedded_io::{Read, Write};

use crate::chip::{self, FlashDevice, JedecId};
use crate::config::Timing;
use crate::error::{Error, Result};
use crate::flash::{self, PageBuffer, ProgramStats};
use crate::fpga::{self, ConfigReport};
use crate::programmer::{ConfigPort, FaultIndicator};
use crate::protocol::host::{self, Banner, Command, FPGA_BANNER, PROMPT};
use crate::protocol::spi25;

/// Half period of the fault indicator blink
const FAULT_BLINK_HALF_PERIOD_US: u32 = 250_000;

/// What a completed session did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Flash erased, programmed and read back
    Programmed(ProgramStats),
    /// Whole flash sent to the host
    Read {
        /// Pages sent
        pages: u32,
    },
    /// FPGA configuration attempted
    Configured(ConfigReport),
    /// Command byte not recognised; nothing was done
    UnknownCommand(u8),
    /// Flash identification failed; the bridge must not continue
    Fault(JedecId),
}

/// Owns the bus controller and the host channel for the lifetime of the
/// firmware
pub struct Dispatcher<B, H> {
    bus: B,
    host: H,
    timing: Timing,
    page: PageBuffer,
    active: Option<&'static FlashDevice>,
}

impl<B, H> Dispatcher<B, H>
where
    B: ConfigPort,
    H: Read + Write,
{
    /// Create a dispatcher
    pub fn new(bus: B, host: H, timing: Timing) -> Self {
        Self {
            bus,
            host,
            timing,
            page: PageBuffer::new(),
            active: None,
        }
    }

    /// Device identified by the most recent flash session
    pub fn active_device(&self) -> Option<&'static FlashDevice> {
        self.active
    }

    /// Borrow the bus controller
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Borrow the host channel
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Take the bus controller and host channel back
    pub fn into_parts(self) -> (B, H) {
        (self.bus, self.host)
    }

    /// Identify the flash and record it as the active device
    pub fn identify(&mut self) -> Result<&'static FlashDevice> {
        let id = spi25::identify(&mut self.bus)?;
        match chip::lookup(id) {
            Some(device) => {
                log::info!("found {} ({} bytes), id {}", device.name, device.capacity, id);
                self.active = Some(device);
                Ok(device)
            }
            None => {
                log::error!("no supported flash matches id {}", id);
                Err(Error::UnknownDevice(id))
            }
        }
    }

    /// Serve one session, from wake byte to reset release
    pub fn run_session(&mut self) -> Result<SessionOutcome> {
        host::read_byte(&mut self.host)?;
        self.bus.set_reset(true)?;

        let byte = host::read_byte(&mut self.host)?;
        let Some(command) = Command::from_byte(byte) else {
            log::warn!("ignoring unknown command byte {:#04x}", byte);
            self.bus.set_reset(false)?;
            return Ok(SessionOutcome::UnknownCommand(byte));
        };
        log::debug!("command {:?}", command);

        let outcome = match command {
            Command::WriteFpga => {
                host::write_all(&mut self.host, FPGA_BANNER)?;
                let report = fpga::configure(&mut self.bus, &mut self.host, &self.timing, &mut self.page)?;
                SessionOutcome::Configured(report)
            }
            Command::WriteFlash | Command::ReadFlash => {
                let device = match self.identify() {
                    Ok(device) => device,
                    Err(Error::UnknownDevice(id)) => return Ok(SessionOutcome::Fault(id)),
                    Err(e) => return Err(e),
                };
                let banner = host::flash_banner(device)?;
                host::write_all(&mut self.host, banner.as_bytes())?;

                if command == Command::WriteFlash {
                    host::write_all(&mut self.host, PROMPT)?;
                    let page_count = host::read_page_count(&mut self.host)?;
                    let stats = flash::program(
                        &mut self.bus,
                        &mut self.host,
                        &self.timing,
                        page_count,
                        &mut self.page,
                    )?;
                    SessionOutcome::Programmed(stats)
                } else {
                    let pages =
                        flash::read(&mut self.bus, &mut self.host, device.capacity, &mut self.page)?;
                    SessionOutcome::Read { pages }
                }
            }
        };

        self.bus.set_reset(false)?;
        Ok(outcome)
    }

    /// Serve sessions forever
    ///
    /// Errors end the current session only. An identification failure ends
    /// service altogether: see [`Dispatcher::halt`].
    pub fn serve<F: FaultIndicator>(&mut self, indicator: &mut F) -> ! {
        loop {
            match self.run_session() {
                Ok(SessionOutcome::Fault(id)) => self.halt(id, indicator),
                Ok(outcome) => log::debug!("session finished: {:?}", outcome),
                Err(e) => {
                    log::warn!("session aborted: {}", e);
                    if self.bus.deselect().is_err() {
                        log::error!("could not release chip select");
                    }
                    if self.bus.set_reset(false).is_err() {
                        log::error!("could not release reset");
                    }
                }
            }
        }
    }

    /// Report an unknown device and blink the fault indicator forever
    pub fn halt<F: FaultIndicator>(&mut self, id: JedecId, indicator: &mut F) -> ! {
        let line = fault_diagnostic(id);
        log::error!("{}", line.trim_end());
        if host::write_all(&mut self.host, line.as_bytes()).is_err() {
            log::error!("could not send fault diagnostic");
        }

        let mut on = true;
        loop {
            indicator.set(on);
            self.bus.delay_us(FAULT_BLINK_HALF_PERIOD_US);
            on = !on;
        }
    }
}

/// Diagnostic line sent to the host when identification fails
pub fn fault_diagnostic(id: JedecId) -> Banner {
    let mut line = Banner::new();
    // "unknown flash device XX XX XX\n" always fits.
    let _ = writeln!(line, "unknown flash device {}", id);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_diagnostic() {
        let line = fault_diagnostic(JedecId::new(0xC2, 0x20, 0x17));
        assert_eq!(line.as_str(), "unknown flash device C2 20 17\n");
    }
}
