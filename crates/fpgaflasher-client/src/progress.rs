//! Progress reporting

/// Progress reporter for client operations
///
/// Counts are in pages for flash writes and in bytes everywhere else.
pub trait Progress {
    /// Page count sent; the bridge is erasing the whole flash
    fn erasing(&mut self, total_pages: usize);

    /// First page accepted, programming is under way
    fn programming(&mut self, total_pages: usize);

    /// Called after each page is acknowledged
    fn program_progress(&mut self, pages_done: usize);

    /// Starting to check the read-back
    fn verifying(&mut self, total_pages: usize);

    /// Called after each read-back page is compared
    fn verify_progress(&mut self, pages_done: usize);

    /// Starting a full flash read
    fn reading(&mut self, total_bytes: usize);

    /// Called after each page read
    fn read_progress(&mut self, bytes_read: usize);

    /// Starting to stream a bitstream
    fn configuring(&mut self, total_bytes: usize);

    /// Called after each block is acknowledged
    fn configure_progress(&mut self, bytes_sent: usize);

    /// Called when the operation finished, successfully or not
    fn complete(&mut self);
}

/// A no-op progress reporter
pub struct NoProgress;

impl Progress for NoProgress {
    fn erasing(&mut self, _total_pages: usize) {}
    fn programming(&mut self, _total_pages: usize) {}
    fn program_progress(&mut self, _pages_done: usize) {}
    fn verifying(&mut self, _total_pages: usize) {}
    fn verify_progress(&mut self, _pages_done: usize) {}
    fn reading(&mut self, _total_bytes: usize) {}
    fn read_progress(&mut self, _bytes_read: usize) {}
    fn configuring(&mut self, _total_bytes: usize) {}
    fn configure_progress(&mut self, _bytes_sent: usize) {}
    fn complete(&mut self) {}
}
