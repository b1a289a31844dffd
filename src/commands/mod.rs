//! CLI command implementations
//!
//! Each command opens one session with the bridge through
//! `fpgaflasher_client::Client`; progress is drawn with indicatif.

mod list;
mod progress;
mod read;
mod write;

pub use list::list_chips;
pub use read::run_read_flash;
pub use write::{run_write_flash, run_write_fpga};
