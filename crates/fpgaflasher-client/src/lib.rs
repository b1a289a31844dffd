//! fpgaflasher-client - Host side of the fpgaflasher bridge protocol
//!
//! Talks to a bridge over a [`Transport`] (normally its serial port):
//! writes flash images with read-back verification, dumps the flash and
//! streams bitstreams straight into the FPGA.
//!
//! # Example
//!
//! ```no_run
//! use fpgaflasher_client::{Client, IoTransport, NoProgress};
//! use std::net::TcpStream;
//!
//! // Any byte stream works; `SerialTransport` is the usual choice.
//! let stream = TcpStream::connect("127.0.0.1:2000")?;
//! let mut client = Client::new(IoTransport::new(stream));
//! let (info, data) = client.read_flash(&mut NoProgress)?;
//! println!("{}: {} bytes", info.name, data.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
pub mod error;
mod progress;
pub mod transport;

pub use client::{pad_to_pages, Client, FlashInfo, MAX_BLOCK, WAKE_BYTE};
pub use error::{ClientError, Result};
pub use progress::{NoProgress, Progress};
pub use transport::{IoTransport, Transport};

#[cfg(feature = "serial")]
pub use transport::serial::{SerialTransport, DEFAULT_BAUD};
