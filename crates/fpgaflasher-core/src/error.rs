//! Error types for fpgaflasher-core
//!
//! A single `no_std` compatible error enum shared by the codec, the
//! engines and the dispatcher.

use core::fmt;

use crate::chip::JedecId;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // SPI / pin errors
    /// SPI transfer failed
    SpiTransferFailed,
    /// Driving or sampling a digital line failed
    PinError,

    // Host channel errors
    /// Reading from or writing to the host channel failed
    HostIo,
    /// The host channel reached end of stream mid-transfer
    HostClosed,

    // Device errors
    /// The identification triple matches no registry entry
    UnknownDevice(JedecId),
    /// A bounded busy poll ran out of attempts
    Timeout,

    // Buffer / address errors
    /// Provided buffer is too small for the operation
    BufferTooSmall,
    /// Program or erase issued without the write enable latch set
    WriteProtected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpiTransferFailed => write!(f, "SPI transfer failed"),
            Self::PinError => write!(f, "digital line access failed"),
            Self::HostIo => write!(f, "host channel I/O error"),
            Self::HostClosed => write!(f, "host channel closed"),
            Self::UnknownDevice(id) => write!(f, "unknown flash device {}", id),
            Self::Timeout => write!(f, "operation timed out"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::WriteProtected => write!(f, "write enable latch not set"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl<E: embedded_io::Error> From<embedded_io::ReadExactError<E>> for Error {
    fn from(e: embedded_io::ReadExactError<E>) -> Self {
        match e {
            embedded_io::ReadExactError::UnexpectedEof => Error::HostClosed,
            embedded_io::ReadExactError::Other(_) => Error::HostIo,
        }
    }
}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
