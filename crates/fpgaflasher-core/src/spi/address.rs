//! 24-bit address encoding

/// Number of address bytes sent after an addressed opcode
pub const ADDRESS_BYTES: usize = 3;

/// Highest address representable in a 3-byte address
pub const MAX_ADDRESS: u32 = 0x00FF_FFFF;

/// Encode an address as three big-endian bytes
///
/// Bits above 23 are discarded, the same way the flash sees only the low
/// 24 bits of whatever is clocked in.
pub const fn encode_address(address: u32) -> [u8; ADDRESS_BYTES] {
    [
        (address >> 16) as u8,
        (address >> 8) as u8,
        address as u8,
    ]
}
