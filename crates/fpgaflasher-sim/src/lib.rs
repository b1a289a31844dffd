//! fpgaflasher-sim - In-memory bridge hardware for testing
//!
//! This crate emulates everything behind the bridge's bus controller: a
//! SPI NOR flash answering the JEDEC command set, an FPGA slave
//! configuration port, the external reset output and the done input. A
//! scripted host channel stands in for the serial link.
//!
//! [`SimBridge`] implements the same traits as the hardware
//! `SpiBridge`, so the engines and the dispatcher run unchanged.

mod bridge;
mod flash;
mod fpga;
mod host;

pub use bridge::{BusEvent, SimBridge};
pub use flash::{SimFlash, SimFlashConfig};
pub use fpga::SimFpga;
pub use host::HostPipe;
