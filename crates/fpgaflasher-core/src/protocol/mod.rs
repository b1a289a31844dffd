//! Wire protocols spoken by the bridge
//!
//! - [`spi25`] - JEDEC SPI flash command sequences
//! - [`host`] - the byte protocol on the host channel

pub mod host;
pub mod spi25;

pub use spi25::*;
