//! Flash device registry
//!
//! The bridge only knows the parts listed in [`database::FLASH_DEVICES`].
//! A device is matched by the three bytes returned from the JEDEC
//! identify command; geometry is fixed (256-byte pages, whole-chip erase).

pub mod database;
mod types;

pub use database::{lookup, FLASH_DEVICES};
pub use types::{FlashDevice, JedecId, PAGE_SIZE, SECTOR_SIZE};
