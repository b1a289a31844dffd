//! Erase / program / read-back sequences

use embedded_io::{Read, Write};

use super::PageBuffer;
use crate::chip::PAGE_SIZE;
use crate::config::Timing;
use crate::error::Result;
use crate::programmer::{ResetControl, SpiMaster};
use crate::protocol::host::{self, PROGRESS_MARKER};
use crate::protocol::spi25;

/// Counters from a completed [`program`] run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramStats {
    /// Pages written and read back
    pub pages: u32,
    /// Status reads spent waiting for the bulk erase
    pub erase_polls: u32,
    /// Status reads spent waiting for page programs, summed
    pub program_polls: u32,
}

/// Wait until the flash reports neither busy nor write-enabled
///
/// `slow` selects the erase poll interval; otherwise the status register is
/// read back to back.
pub fn busy_wait<M: SpiMaster + ?Sized>(master: &mut M, timing: &Timing, slow: bool) -> Result<u32> {
    let delay = if slow {
        timing.erase_poll_us
    } else {
        timing.program_poll_us
    };
    spi25::wait_ready(master, delay, timing.poll_limit)
}

/// Address of page `index`
///
/// Wraps instead of panicking; the page count comes from the host and is
/// not checked against the device size.
fn page_address(index: u32) -> u32 {
    index.wrapping_mul(PAGE_SIZE as u32)
}

/// Erase the device, program `page_count` pages from the host and send
/// every programmed page back
///
/// The read-back is not compared here; the host verifies it. The external
/// reset line is released at the end so the downstream device can boot the
/// new image.
pub fn program<B, H>(
    bus: &mut B,
    host: &mut H,
    timing: &Timing,
    page_count: u32,
    page: &mut PageBuffer,
) -> Result<ProgramStats>
where
    B: SpiMaster + ResetControl + ?Sized,
    H: Read + Write + ?Sized,
{
    let mut stats = ProgramStats::default();

    log::info!("clearing block protection");
    spi25::write_status(bus, 0)?;
    bus.delay_us(timing.status_settle_us);

    log::info!("bulk erase");
    spi25::bulk_erase(bus)?;
    stats.erase_polls = busy_wait(bus, timing, true)?;
    log::debug!("erase complete after {} polls", stats.erase_polls);

    log::info!("programming {} pages", page_count);
    for index in 0..page_count {
        host::read_exact(host, page.as_mut_slice())?;
        spi25::page_program(bus, page_address(index), page.as_slice())?;
        stats.program_polls = stats
            .program_polls
            .saturating_add(busy_wait(bus, timing, false)?);
        host::write_all(host, &[PROGRESS_MARKER])?;
    }

    log::info!("reading back {} pages", page_count);
    for index in 0..page_count {
        spi25::fast_read(bus, page_address(index), page.as_mut_slice())?;
        host::write_all(host, page.as_slice())?;
        stats.pages += 1;
    }

    bus.set_reset(false)?;
    Ok(stats)
}

/// Send the whole device, page by page in address order
pub fn read<B, H>(bus: &mut B, host: &mut H, capacity: u32, page: &mut PageBuffer) -> Result<u32>
where
    B: SpiMaster + ResetControl + ?Sized,
    H: Write + ?Sized,
{
    let pages = capacity / PAGE_SIZE as u32;
    log::info!("reading {} pages", pages);

    for index in 0..pages {
        spi25::fast_read(bus, page_address(index), page.as_mut_slice())?;
        host::write_all(host, page.as_slice())?;
    }

    bus.set_reset(false)?;
    Ok(pages)
}
