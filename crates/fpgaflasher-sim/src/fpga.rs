//! Emulated FPGA slave configuration port

/// Emulated FPGA
///
/// Bytes clocked with chip select active after the reset sequence are
/// collected as the bitstream; bytes clocked with chip select inactive only
/// count as idle clocks.
#[derive(Debug, Default)]
pub struct SimFpga {
    bitstream: Vec<u8>,
    idle_bytes: usize,
    in_reset: bool,
    slave_mode: bool,
    done: bool,
}

impl SimFpga {
    /// Create an FPGA whose done line reads `done` after configuration
    pub fn new(done: bool) -> Self {
        Self {
            done,
            ..Self::default()
        }
    }

    /// Set the level the done line reports
    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Bitstream bytes received
    pub fn bitstream(&self) -> &[u8] {
        &self.bitstream
    }

    /// Bytes clocked while chip select was inactive
    pub fn idle_bytes(&self) -> usize {
        self.idle_bytes
    }

    /// Whether the last reset release saw chip select active
    pub fn slave_mode(&self) -> bool {
        self.slave_mode
    }

    /// Whether the FPGA is held in reset
    pub fn in_reset(&self) -> bool {
        self.in_reset
    }

    /// Done line level; low while held in reset
    pub fn done(&self) -> bool {
        self.done && !self.in_reset
    }

    pub(crate) fn reset(&mut self, asserted: bool, selected: bool) {
        if self.in_reset && !asserted {
            // Rising edge of reset: chip select picks the configuration mode.
            self.slave_mode = selected;
            self.bitstream.clear();
            self.idle_bytes = 0;
        }
        self.in_reset = asserted;
    }

    pub(crate) fn clock(&mut self, data: &[u8], selected: bool) {
        if selected && self.slave_mode && !self.in_reset {
            self.bitstream.extend_from_slice(data);
        } else {
            self.idle_bytes += data.len();
        }
    }
}
