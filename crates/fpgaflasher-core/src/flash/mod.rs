//! Flash programming engine
//!
//! Whole-image operations on the identified part: bulk erase followed by
//! page programming with read-back, and full-device read.

mod operations;

pub use operations::{busy_wait, program, read, ProgramStats};

use crate::chip::PAGE_SIZE;

/// Scratch buffer for one page
///
/// A single buffer is reused for every page of a session; whichever engine
/// runs borrows it exclusively.
pub struct PageBuffer([u8; PAGE_SIZE]);

impl PageBuffer {
    /// Create a zeroed page buffer
    pub const fn new() -> Self {
        Self([0u8; PAGE_SIZE])
    }

    /// Page contents
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Page contents, mutable
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}
