//! Flash device type definitions

use core::fmt;

/// Program page size in bytes; also the unit of the host transfer protocol
pub const PAGE_SIZE: usize = 256;

/// Smallest erase unit of the supported parts
///
/// Not used by the bridge, which only ever erases the whole chip.
pub const SECTOR_SIZE: usize = 4096;

/// The three bytes returned by the JEDEC identify command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JedecId(pub [u8; 3]);

impl JedecId {
    /// Create an identification triple
    pub const fn new(manufacturer: u8, memory_type: u8, capacity: u8) -> Self {
        Self([manufacturer, memory_type, capacity])
    }

    /// Manufacturer byte
    pub const fn manufacturer(&self) -> u8 {
        self.0[0]
    }

    /// Memory type byte
    pub const fn memory_type(&self) -> u8 {
        self.0[1]
    }

    /// Capacity code byte
    pub const fn capacity_code(&self) -> u8 {
        self.0[2]
    }
}

impl fmt::Display for JedecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X} {:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// A supported flash part
///
/// Statically allocated; the registry hands out `&'static` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashDevice {
    /// Identification triple
    pub id: JedecId,
    /// Part name, sent to the host in the banner
    pub name: &'static str,
    /// Capacity in bytes
    pub capacity: u32,
}

impl FlashDevice {
    /// Create a registry entry
    pub const fn new(id: JedecId, name: &'static str, capacity: u32) -> Self {
        Self { id, name, capacity }
    }

    /// Number of 256-byte pages covering the whole device
    pub const fn page_count(&self) -> u32 {
        self.capacity / PAGE_SIZE as u32
    }
}
