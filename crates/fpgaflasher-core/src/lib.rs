//! fpgaflasher-core - In-system reprogramming bridge for an FPGA and its
//! SPI NOR configuration flash
//!
//! This crate contains everything the bridge firmware does, independent of
//! the microcontroller it runs on. It is `no_std` and fully synchronous:
//! every host read and every SPI exchange blocks until it completes.
//!
//! # Layers
//!
//! - [`spi`] - SPI command model and the JEDEC opcodes the bridge uses
//! - [`protocol::spi25`] - flash command codec (identify, status, erase,
//!   program, fast read)
//! - [`chip`] - static registry of supported flash parts
//! - [`programmer`] - the bus traits and the embedded-hal backed bridge
//! - [`flash`] - erase/program/read-back engine
//! - [`fpga`] - FPGA slave SPI configuration loader
//! - [`dispatch`] - host command session loop
//!
//! # Features
//!
//! - `std` - implement `std::error::Error` for [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use fpgaflasher_core::config::Timing;
//! use fpgaflasher_core::dispatch::Dispatcher;
//! use fpgaflasher_core::programmer::SpiBridge;
//!
//! let bridge = SpiBridge::new(spi, cs, reset, done, delay);
//! let mut dispatcher = Dispatcher::new(bridge, uart, Timing::default());
//! dispatcher.serve(&mut led)
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod chip;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod flash;
pub mod fpga;
pub mod programmer;
pub mod protocol;
pub mod spi;

pub use error::{Error, Result};
