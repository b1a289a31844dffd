//! Timing and line configuration
//!
//! Every delay the bridge inserts lives here so that tests and boards with
//! different parts can adjust them without touching the engines.

/// Protocol timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Settle time after clearing the status register, in microseconds
    pub status_settle_us: u32,
    /// Delay between status polls while a bulk erase runs
    pub erase_poll_us: u32,
    /// Delay between status polls after a page program (0 = back to back)
    pub program_poll_us: u32,
    /// Upper bound on status polls per wait; `None` waits forever
    pub poll_limit: Option<u32>,
    /// Time chip select is held asserted with the FPGA in reset
    pub select_hold_us: u32,
    /// Time the FPGA needs after reset release to clear configuration memory
    pub reset_settle_us: u32,
    /// Wait after the last block before chip select is released
    pub finish_wait_us: u32,
    /// Dummy bytes clocked after the bitstream (8 clock edges each)
    pub trailing_clock_bytes: u8,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            status_settle_us: 200_000,
            erase_poll_us: 100_000,
            program_poll_us: 0,
            poll_limit: None,
            select_hold_us: 1,
            reset_settle_us: 1_200,
            finish_wait_us: 1,
            trailing_clock_bytes: 7,
        }
    }
}

impl Timing {
    /// Bound every busy poll to `limit` status reads
    pub fn with_poll_limit(mut self, limit: u32) -> Self {
        self.poll_limit = Some(limit);
        self
    }
}

/// Electrical sense of the external reset line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolarity {
    /// Line is driven low to hold the downstream device in reset
    #[default]
    ActiveLow,
    /// Line is driven high to hold the downstream device in reset
    ActiveHigh,
}

impl ResetPolarity {
    /// Logic level that corresponds to `asserted`
    pub const fn level(self, asserted: bool) -> bool {
        match self {
            Self::ActiveLow => !asserted,
            Self::ActiveHigh => asserted,
        }
    }
}
