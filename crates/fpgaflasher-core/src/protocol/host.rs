//! Host channel protocol
//!
//! The host protocol has no framing beyond the fields below; every count
//! and length the host sends is trusted as is.
//!
//! | Direction | Bytes |
//! |-----------|-------|
//! | host → bridge | one wake byte (any value) |
//! | host → bridge | command byte `w`, `r` or `f` |
//! | bridge → host | banner line: `"<name> <capacity>\n"` or `"FPGA write mode\n"` |
//! | bridge → host | `"+++\n"` before a write or FPGA stream |
//! | host → bridge | page count (u32, little endian) + pages, or length-prefixed blocks |
//! | bridge → host | `#` per page / block, then read-back data or the done status |

use core::fmt::Write as _;

use embedded_io::{Read, Write};

use crate::chip::FlashDevice;
use crate::error::{Error, Result};

/// Prompt sent before the bridge accepts a data stream
pub const PROMPT: &[u8] = b"+++\n";

/// Progress marker sent after each page or block
pub const PROGRESS_MARKER: u8 = b'#';

/// Banner sent before FPGA configuration
pub const FPGA_BANNER: &[u8] = b"FPGA write mode\n";

/// Status byte: done line asserted after configuration
pub const STATUS_DONE_HIGH: u8 = b'H';

/// Status byte: done line not asserted after configuration
pub const STATUS_DONE_LOW: u8 = b'L';

/// Length prefix terminating an FPGA block stream
pub const END_OF_STREAM: u8 = 0;

/// Longest banner line the bridge produces
pub const BANNER_MAX: usize = 48;

/// Banner line buffer
pub type Banner = heapless::String<BANNER_MAX>;

/// Host commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Erase, program and read back the flash
    WriteFlash,
    /// Read the whole flash
    ReadFlash,
    /// Stream a bitstream straight into the FPGA
    WriteFpga,
}

impl Command {
    /// Decode a command byte
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'w' => Some(Self::WriteFlash),
            b'r' => Some(Self::ReadFlash),
            b'f' => Some(Self::WriteFpga),
            _ => None,
        }
    }

    /// Encode as a command byte
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::WriteFlash => b'w',
            Self::ReadFlash => b'r',
            Self::WriteFpga => b'f',
        }
    }
}

/// Format the flash banner: `"<name> <capacity>\n"`
pub fn flash_banner(device: &FlashDevice) -> Result<Banner> {
    let mut banner = Banner::new();
    writeln!(banner, "{} {}", device.name, device.capacity).map_err(|_| Error::BufferTooSmall)?;
    Ok(banner)
}

/// Parse a flash banner line (without the trailing newline)
///
/// Returns the part name and capacity in bytes.
pub fn parse_flash_banner(line: &str) -> Option<(&str, u32)> {
    let mut fields = line.trim_end().split_whitespace();
    let name = fields.next()?;
    let capacity = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((name, capacity))
}

/// Read exactly one byte from the host
pub fn read_byte<H: Read + ?Sized>(host: &mut H) -> Result<u8> {
    let mut byte = [0u8; 1];
    host.read_exact(&mut byte)?;
    Ok(byte[0])
}

/// Fill `buf` from the host
pub fn read_exact<H: Read + ?Sized>(host: &mut H, buf: &mut [u8]) -> Result<()> {
    host.read_exact(buf)?;
    Ok(())
}

/// Read the little-endian page count that precedes a flash image
pub fn read_page_count<H: Read + ?Sized>(host: &mut H) -> Result<u32> {
    let mut raw = [0u8; 4];
    host.read_exact(&mut raw)?;
    Ok(u32::from_le_bytes(raw))
}

/// Write all of `data` to the host
pub fn write_all<H: Write + ?Sized>(host: &mut H, data: &[u8]) -> Result<()> {
    host.write_all(data).map_err(|_| Error::HostIo)?;
    host.flush().map_err(|_| Error::HostIo)
}
