//! Error types for the host client

use thiserror::Error;

/// Host client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error on the link
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port error
    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// The bridge closed the link mid-exchange
    #[error("Link closed by the bridge")]
    Closed,

    /// Banner line could not be parsed
    #[error("Could not parse banner: {0:?}")]
    BadBanner(String),

    /// The bridge could not identify its flash
    #[error("Bridge reported: {0}")]
    UnknownDevice(String),

    /// Expected the `+++` prompt
    #[error("Expected prompt, got {0:?}")]
    MissingPrompt(String),

    /// Expected a progress marker, got the start of a line instead
    #[error("Got an error writing: {0:?}")]
    UnexpectedMarker(String),

    /// Read-back differs from the image
    #[error("Validation failed on {pages} pages")]
    VerifyFailed {
        /// Number of mismatching pages
        pages: usize,
    },

    /// The image does not fit the identified flash
    #[error("Image of {image} bytes does not fit {capacity} byte flash")]
    ImageTooLarge {
        /// Image size after padding
        image: usize,
        /// Flash capacity
        capacity: u32,
    },

    /// The FPGA done line stayed low
    #[error("FPGA configuration failed (CDONE low)")]
    ConfigurationFailed,
}

/// Result type for client operations
pub type Result<T> = core::result::Result<T, ClientError>;
