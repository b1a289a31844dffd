//! FPGA configuration loader
//!
//! Drives an FPGA's slave SPI configuration port: reset/chip-select entry
//! sequence, one wake byte, the bitstream in host-sized blocks, trailing
//! clocks, then a single sample of the done line.
//!
//! ```text
//! Idle -> ResetAsserted -> ResetReleasing -> Streaming -> Finishing -> Done
//!                                            ^       |
//!                                            +-------+  one step per block
//! ```

use embedded_io::{Read, Write};

use crate::config::Timing;
use crate::error::Result;
use crate::flash::PageBuffer;
use crate::programmer::ConfigPort;
use crate::protocol::host::{
    self, END_OF_STREAM, PROGRESS_MARKER, PROMPT, STATUS_DONE_HIGH, STATUS_DONE_LOW,
};

/// Outcome of a configuration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStatus {
    /// The done line was asserted
    Success,
    /// The done line stayed low
    Failure,
}

impl ConfigStatus {
    /// Status byte reported to the host
    pub const fn status_byte(self) -> u8 {
        match self {
            Self::Success => STATUS_DONE_HIGH,
            Self::Failure => STATUS_DONE_LOW,
        }
    }
}

/// Loader state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    /// Nothing done yet
    Idle,
    /// Chip select active with the FPGA held in reset
    ResetAsserted,
    /// Reset released, configuration memory being cleared
    ResetReleasing,
    /// Accepting bitstream blocks from the host
    Streaming,
    /// End of stream seen, trailing clocks pending
    Finishing,
    /// Status sampled and reported
    Done(ConfigStatus),
}

/// Counters from a completed configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigReport {
    /// Final status
    pub status: ConfigStatus,
    /// Data blocks forwarded
    pub blocks: u32,
    /// Bitstream bytes forwarded
    pub bytes: u32,
}

/// Step-wise configuration state machine
pub struct ConfigLoader<'a, P: ConfigPort + ?Sized> {
    port: &'a mut P,
    timing: Timing,
    state: ConfigState,
    blocks: u32,
    bytes: u32,
}

impl<'a, P: ConfigPort + ?Sized> ConfigLoader<'a, P> {
    /// Create a loader in the [`ConfigState::Idle`] state
    pub fn new(port: &'a mut P, timing: Timing) -> Self {
        Self {
            port,
            timing,
            state: ConfigState::Idle,
            blocks: 0,
            bytes: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> ConfigState {
        self.state
    }

    /// Advance by one state transition (or one block while streaming)
    ///
    /// On error chip select is released and the state is left unchanged.
    pub fn step<H: Read + Write + ?Sized>(
        &mut self,
        host: &mut H,
        buf: &mut PageBuffer,
    ) -> Result<ConfigState> {
        match self.advance(host, buf) {
            Ok(next) => {
                self.state = next;
                Ok(next)
            }
            Err(e) => {
                log::warn!("configuration aborted in {:?}: {}", self.state, e);
                if self.port.deselect().is_err() {
                    log::error!("could not release chip select");
                }
                Err(e)
            }
        }
    }

    fn advance<H: Read + Write + ?Sized>(
        &mut self,
        host: &mut H,
        buf: &mut PageBuffer,
    ) -> Result<ConfigState> {
        let next = match self.state {
            ConfigState::Idle => {
                // The FPGA samples chip select on the rising edge of reset
                // to pick slave mode, so select must come first.
                self.port.set_reset(true)?;
                self.port.select()?;
                self.port.delay_us(self.timing.select_hold_us);
                ConfigState::ResetAsserted
            }
            ConfigState::ResetAsserted => {
                self.port.set_reset(false)?;
                self.port.delay_us(self.timing.reset_settle_us);
                ConfigState::ResetReleasing
            }
            ConfigState::ResetReleasing => {
                self.port.deselect()?;
                self.port.write_raw(&[0])?;
                self.port.select()?;
                host::write_all(host, PROMPT)?;
                ConfigState::Streaming
            }
            ConfigState::Streaming => self.stream_block(host, buf)?,
            ConfigState::Finishing => {
                self.port.delay_us(self.timing.finish_wait_us);
                self.port.deselect()?;
                for _ in 0..self.timing.trailing_clock_bytes {
                    self.port.write_raw(&[0])?;
                }
                let status = if self.port.done()? {
                    ConfigStatus::Success
                } else {
                    ConfigStatus::Failure
                };
                host::write_all(host, &[status.status_byte()])?;
                log::info!(
                    "configuration finished: {:?} ({} blocks, {} bytes)",
                    status,
                    self.blocks,
                    self.bytes
                );
                ConfigState::Done(status)
            }
            done @ ConfigState::Done(_) => done,
        };
        Ok(next)
    }

    fn stream_block<H: Read + Write + ?Sized>(
        &mut self,
        host: &mut H,
        buf: &mut PageBuffer,
    ) -> Result<ConfigState> {
        let len = host::read_byte(host)?;
        if len == END_OF_STREAM {
            return Ok(ConfigState::Finishing);
        }

        let block = &mut buf.as_mut_slice()[..len as usize];
        host::read_exact(host, block)?;
        self.port.write_raw(block)?;
        host::write_all(host, &[PROGRESS_MARKER])?;

        self.blocks = self.blocks.saturating_add(1);
        self.bytes = self.bytes.saturating_add(len as u32);
        log::trace!("block {} ({} bytes)", self.blocks, len);
        Ok(ConfigState::Streaming)
    }

    /// Run to completion
    pub fn run<H: Read + Write + ?Sized>(
        mut self,
        host: &mut H,
        buf: &mut PageBuffer,
    ) -> Result<ConfigReport> {
        loop {
            if let ConfigState::Done(status) = self.step(host, buf)? {
                return Ok(ConfigReport {
                    status,
                    blocks: self.blocks,
                    bytes: self.bytes,
                });
            }
        }
    }
}

/// Configure the FPGA from the host's block stream
pub fn configure<P, H>(
    port: &mut P,
    host: &mut H,
    timing: &Timing,
    buf: &mut PageBuffer,
) -> Result<ConfigReport>
where
    P: ConfigPort + ?Sized,
    H: Read + Write + ?Sized,
{
    log::info!("entering FPGA configuration");
    ConfigLoader::new(port, *timing).run(host, buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::programmer::{ResetControl, SpiMaster};
    use crate::spi::SpiCommand;
    use core::convert::Infallible;
    use std::vec::Vec;

    /// Configuration port that only tracks chip select
    #[derive(Default)]
    struct Port {
        selected: bool,
        fail_raw: bool,
    }

    impl SpiMaster for Port {
        fn execute(&mut self, _cmd: &mut SpiCommand<'_>) -> Result<()> {
            Ok(())
        }

        fn delay_us(&mut self, _us: u32) {}
    }

    impl ResetControl for Port {
        fn set_reset(&mut self, _asserted: bool) -> Result<()> {
            Ok(())
        }
    }

    impl ConfigPort for Port {
        fn select(&mut self) -> Result<()> {
            self.selected = true;
            Ok(())
        }

        fn deselect(&mut self) -> Result<()> {
            self.selected = false;
            Ok(())
        }

        fn write_raw(&mut self, _data: &[u8]) -> Result<()> {
            if self.fail_raw && self.selected {
                Err(Error::SpiTransferFailed)
            } else {
                Ok(())
            }
        }

        fn done(&mut self) -> Result<bool> {
            Ok(true)
        }
    }

    struct Host<'a> {
        input: &'a [u8],
        output: Vec<u8>,
    }

    impl embedded_io::ErrorType for Host<'_> {
        type Error = Infallible;
    }

    impl embedded_io::Read for Host<'_> {
        fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, Infallible> {
            self.input.read(buf)
        }
    }

    impl embedded_io::Write for Host<'_> {
        fn write(&mut self, buf: &[u8]) -> core::result::Result<usize, Infallible> {
            self.output.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> core::result::Result<(), Infallible> {
            Ok(())
        }
    }

    fn streaming<'a>(port: &'a mut Port, host: &mut Host<'_>) -> ConfigLoader<'a, Port> {
        let mut buf = PageBuffer::new();
        let mut loader = ConfigLoader::new(port, Timing::default());
        for _ in 0..3 {
            loader.step(host, &mut buf).unwrap();
        }
        assert_eq!(loader.state(), ConfigState::Streaming);
        loader
    }

    #[test]
    fn test_status_bytes() {
        assert_eq!(ConfigStatus::Success.status_byte(), b'H');
        assert_eq!(ConfigStatus::Failure.status_byte(), b'L');
    }

    #[test]
    fn test_failed_block_write_releases_select() {
        let mut port = Port {
            fail_raw: true,
            ..Port::default()
        };
        let mut host = Host {
            input: &[1, 0xAA],
            output: Vec::new(),
        };
        let mut loader = streaming(&mut port, &mut host);

        let mut buf = PageBuffer::new();
        assert_eq!(loader.step(&mut host, &mut buf), Err(Error::SpiTransferFailed));
        assert_eq!(loader.state(), ConfigState::Streaming);
        drop(loader);
        assert!(!port.selected);
        assert_eq!(host.output, b"+++\n");
    }

    #[test]
    fn test_block_counters_saturate() {
        let mut port = Port::default();
        let mut host = Host {
            input: &[2, 0x01, 0x02],
            output: Vec::new(),
        };
        let mut loader = streaming(&mut port, &mut host);
        loader.blocks = u32::MAX;
        loader.bytes = u32::MAX - 1;

        let mut buf = PageBuffer::new();
        assert_eq!(loader.step(&mut host, &mut buf), Ok(ConfigState::Streaming));
        assert_eq!(loader.blocks, u32::MAX);
        assert_eq!(loader.bytes, u32::MAX);
    }
}
