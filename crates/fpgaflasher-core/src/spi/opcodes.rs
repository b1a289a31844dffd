//! JEDEC SPI flash opcodes used by the bridge
//!
//! Only the single I/O, 3-byte address subset is needed: the supported
//! parts are all at most 16 MiB.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before any write/erase operation
pub const WREN: u8 = 0x06;

// ============================================================================
// Status register operations
// ============================================================================

/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Write Status Register
pub const WRSR: u8 = 0x01;

// ============================================================================
// Identification
// ============================================================================

/// Read JEDEC ID (manufacturer, memory type, capacity)
pub const RDID: u8 = 0x9F;

// ============================================================================
// Read / program / erase
// ============================================================================

/// Fast Read (one dummy byte after the address)
pub const FAST_READ: u8 = 0x0B;
/// Page Program with 3-byte address
pub const PP: u8 = 0x02;
/// Chip (bulk) erase
pub const CE_C7: u8 = 0xC7;

// ============================================================================
// Status register bits
// ============================================================================

/// Write In Progress
pub const SR1_WIP: u8 = 0x01;
/// Write Enable Latch
pub const SR1_WEL: u8 = 0x02;
/// Block Protect bit 0
pub const SR1_BP0: u8 = 0x04;
/// Block Protect bit 1
pub const SR1_BP1: u8 = 0x08;
/// Block Protect bit 2
pub const SR1_BP2: u8 = 0x10;
/// Status Register Protect
pub const SR1_SRWD: u8 = 0x80;
