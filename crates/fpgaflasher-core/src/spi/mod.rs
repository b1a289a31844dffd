//! SPI types and command structures
//!
//! This module provides the transaction model used by the flash command
//! codec and the JEDEC opcodes the bridge issues.

mod address;
mod command;
pub mod opcodes;

pub use address::{encode_address, ADDRESS_BYTES, MAX_ADDRESS};
pub use command::SpiCommand;
pub use opcodes::*;
