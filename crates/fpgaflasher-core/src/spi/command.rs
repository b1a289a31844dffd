//! SPI command structure

use super::address::{encode_address, ADDRESS_BYTES};

/// A single SPI transaction
///
/// Designed to avoid allocation - uses slices for data. Chip select is
/// asserted for the whole transaction: opcode, optional address, dummy
/// bytes, write phase, then read phase.
pub struct SpiCommand<'a> {
    /// The opcode byte
    pub opcode: u8,

    /// 3-byte address (if any)
    pub address: Option<u32>,

    /// Number of dummy bytes clocked after the address
    pub dummy_bytes: u8,

    /// Data to write after opcode/address/dummy
    pub write_data: &'a [u8],

    /// Buffer to read into (mutable)
    pub read_buf: &'a mut [u8],
}

impl<'a> SpiCommand<'a> {
    /// Create a simple command with no address or data (e.g., WREN, CE)
    pub fn simple(opcode: u8) -> Self {
        Self {
            opcode,
            address: None,
            dummy_bytes: 0,
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Create a read register command with no address (e.g., RDSR, RDID)
    pub fn read_reg(opcode: u8, buf: &'a mut [u8]) -> Self {
        Self {
            opcode,
            address: None,
            dummy_bytes: 0,
            write_data: &[],
            read_buf: buf,
        }
    }

    /// Create a write register command with no address (e.g., WRSR)
    pub fn write_reg(opcode: u8, data: &'a [u8]) -> Self {
        Self {
            opcode,
            address: None,
            dummy_bytes: 0,
            write_data: data,
            read_buf: &mut [],
        }
    }

    /// Create a read command with 3-byte address
    pub fn read_3b(opcode: u8, addr: u32, buf: &'a mut [u8]) -> Self {
        Self {
            opcode,
            address: Some(addr),
            dummy_bytes: 0,
            write_data: &[],
            read_buf: buf,
        }
    }

    /// Create a write command with 3-byte address (e.g., PP)
    pub fn write_3b(opcode: u8, addr: u32, data: &'a [u8]) -> Self {
        Self {
            opcode,
            address: Some(addr),
            dummy_bytes: 0,
            write_data: data,
            read_buf: &mut [],
        }
    }

    /// Set the number of dummy bytes
    pub fn with_dummy_bytes(mut self, bytes: u8) -> Self {
        self.dummy_bytes = bytes;
        self
    }

    /// Returns true if this command has an address phase
    pub fn has_address(&self) -> bool {
        self.address.is_some()
    }

    /// Number of bytes before the data phases (opcode, address, dummy)
    pub fn header_len(&self) -> usize {
        let addr_len = if self.has_address() { ADDRESS_BYTES } else { 0 };
        1 + addr_len + self.dummy_bytes as usize
    }

    /// Encode opcode, address and dummy bytes into `buf`
    ///
    /// Returns the number of bytes written. Dummy bytes are sent as zero.
    pub fn encode_header(&self, buf: &mut [u8]) -> usize {
        let len = self.header_len();
        buf[0] = self.opcode;
        let mut pos = 1;
        if let Some(addr) = self.address {
            buf[pos..pos + ADDRESS_BYTES].copy_from_slice(&encode_address(addr));
            pos += ADDRESS_BYTES;
        }
        buf[pos..len].fill(0);
        len
    }

    /// Calculate the total number of bytes clocked for this command
    pub fn total_bytes(&self) -> usize {
        self.header_len() + self.write_data.len() + self.read_buf.len()
    }
}
