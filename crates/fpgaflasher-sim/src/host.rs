//! Scripted host channel

use std::collections::VecDeque;
use std::convert::Infallible;

/// Host channel fed from a script
///
/// Reads drain the queued input and return end of stream once it is
/// exhausted; writes are captured for inspection.
#[derive(Debug, Default)]
pub struct HostPipe {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl HostPipe {
    /// Create a pipe with `input` queued
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    /// Everything written so far
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Bytes of input not yet consumed
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl embedded_io::ErrorType for HostPipe {
    type Error = Infallible;
}

impl embedded_io::Read for HostPipe {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        let n = buf.len().min(self.input.len());
        for (dst, src) in buf.iter_mut().zip(self.input.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }
}

impl embedded_io::Write for HostPipe {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
