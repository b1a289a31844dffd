//! Transport layer abstraction for the host link
//!
//! The bridge enumerates as a plain serial device; any byte stream works
//! for testing.

use std::io::{Read, Write};

use crate::error::{ClientError, Result};

/// Transport trait for reading and writing bytes
pub trait Transport {
    /// Write bytes to the transport
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read bytes from the transport
    ///
    /// Reads exactly `buf.len()` bytes into the buffer.
    /// Returns [`ClientError::Closed`] if the link ends first.
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<()>;
}

fn read_error(e: std::io::Error) -> ClientError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ClientError::Closed
    } else {
        ClientError::Io(e)
    }
}

/// Transport over any `std::io` byte stream
pub struct IoTransport<S> {
    stream: S,
}

impl<S> IoTransport<S> {
    /// Wrap a stream
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Unwrap the stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> Transport for IoTransport<S> {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.stream.write_all(data)?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.stream.read_exact(buf).map_err(read_error)
    }

    fn flush(&mut self) -> Result<()> {
        self.stream.flush()?;
        Ok(())
    }
}

#[cfg(feature = "serial")]
pub mod serial {
    //! Serial port transport implementation

    use super::*;
    use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
    use std::time::Duration;

    /// Default baud rate; ignored by USB CDC-ACM bridges
    pub const DEFAULT_BAUD: u32 = 115_200;

    /// Serial port transport
    pub struct SerialTransport {
        port: Box<dyn SerialPort>,
    }

    impl SerialTransport {
        /// Open a serial port
        ///
        /// `timeout` bounds every read; a bulk erase on the largest parts
        /// takes minutes before the first progress marker arrives.
        pub fn open(device: &str, baud: u32, timeout: Duration) -> Result<Self> {
            let port = serialport::new(device, baud)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(timeout)
                .open()?;

            log::info!("Opened serial port {} at {} baud", device, baud);

            Ok(Self { port })
        }

        /// Set the read timeout
        pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
            self.port.set_timeout(timeout)?;
            Ok(())
        }
    }

    impl Transport for SerialTransport {
        fn write(&mut self, data: &[u8]) -> Result<()> {
            self.port.write_all(data)?;
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<()> {
            self.port.read_exact(buf).map_err(read_error)
        }

        fn flush(&mut self) -> Result<()> {
            self.port.flush()?;
            Ok(())
        }
    }
}
