//! Host side of the bridge protocol

use fpgaflasher_core::chip::PAGE_SIZE;
use fpgaflasher_core::protocol::host::{
    parse_flash_banner, Command, END_OF_STREAM, FPGA_BANNER, PROGRESS_MARKER, PROMPT,
    STATUS_DONE_HIGH, STATUS_DONE_LOW,
};

use crate::error::{ClientError, Result};
use crate::progress::Progress;
use crate::transport::Transport;

/// Byte sent to start a session; the bridge ignores its value
pub const WAKE_BYTE: u8 = b' ';

/// Largest FPGA block the length prefix can describe
pub const MAX_BLOCK: usize = 255;

/// Longest line accepted from the bridge
const LINE_MAX: usize = 256;

/// Prefix of the line the bridge sends when it cannot identify its flash
const UNKNOWN_DEVICE_PREFIX: &str = "unknown flash device";

/// Flash part announced by the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashInfo {
    /// Part name
    pub name: String,
    /// Capacity in bytes
    pub capacity: u32,
}

impl FlashInfo {
    /// Number of pages in the part
    pub fn page_count(&self) -> u32 {
        self.capacity / PAGE_SIZE as u32
    }
}

/// Pad `image` with zeros to a whole number of pages
pub fn pad_to_pages(image: &[u8]) -> Vec<u8> {
    let mut padded = image.to_vec();
    let rem = padded.len() % PAGE_SIZE;
    if rem != 0 {
        padded.resize(padded.len() + PAGE_SIZE - rem, 0);
    }
    padded
}

/// Client for one bridge
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Create a client over `transport`
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Unwrap the transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    fn start(&mut self, command: Command) -> Result<()> {
        log::debug!("starting session {:?}", command);
        self.transport.write(&[WAKE_BYTE, command.as_byte()])?;
        self.transport.flush()
    }

    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.transport.write(data)?;
        self.transport.flush()
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.transport.read(&mut byte)?;
        Ok(byte[0])
    }

    /// Read one line, without the newline
    fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();
        loop {
            match self.read_byte()? {
                b'\n' => break,
                byte => line.push(byte),
            }
            if line.len() > LINE_MAX {
                return Err(ClientError::BadBanner(String::from_utf8_lossy(&line).into_owned()));
            }
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    fn read_flash_banner(&mut self) -> Result<FlashInfo> {
        let line = self.read_line()?;
        if line.starts_with(UNKNOWN_DEVICE_PREFIX) {
            return Err(ClientError::UnknownDevice(line));
        }
        let (name, capacity) =
            parse_flash_banner(&line).ok_or_else(|| ClientError::BadBanner(line.clone()))?;
        log::info!("Device: {} Capacity: {}", name, capacity);
        Ok(FlashInfo {
            name: name.to_string(),
            capacity,
        })
    }

    fn expect_line(&mut self, expected: &[u8]) -> Result<String> {
        let line = self.read_line()?;
        let expected = String::from_utf8_lossy(expected);
        if line.as_str() == expected.trim_end_matches('\n') {
            Ok(line)
        } else {
            Err(ClientError::MissingPrompt(line))
        }
    }

    /// Wait for the per-page/per-block acknowledgement
    ///
    /// Anything other than the marker starts a diagnostic line.
    fn expect_marker(&mut self) -> Result<()> {
        let byte = self.read_byte()?;
        if byte == PROGRESS_MARKER {
            return Ok(());
        }
        let mut message = String::from(byte as char);
        message.push_str(&self.read_line()?);
        Err(ClientError::UnexpectedMarker(message))
    }

    /// Erase the flash, write `image` and verify the read-back
    ///
    /// The image is padded with zeros to a page multiple. If it is larger
    /// than the announced part nothing is sent after the banner and the
    /// bridge stays waiting for a page count until it is reset.
    pub fn write_flash<P: Progress + ?Sized>(
        &mut self,
        image: &[u8],
        progress: &mut P,
    ) -> Result<FlashInfo> {
        self.start(Command::WriteFlash)?;
        let info = self.read_flash_banner()?;

        let padded = pad_to_pages(image);
        if padded.len() > info.capacity as usize {
            return Err(ClientError::ImageTooLarge {
                image: padded.len(),
                capacity: info.capacity,
            });
        }
        let pages = padded.len() / PAGE_SIZE;
        log::info!("File is {} bytes ({} pages)", image.len(), pages);

        self.expect_line(PROMPT)?;
        self.send(&(pages as u32).to_le_bytes())?;
        progress.erasing(pages);

        for (index, page) in padded.chunks(PAGE_SIZE).enumerate() {
            self.send(page)?;
            self.expect_marker()?;
            if index == 0 {
                progress.programming(pages);
            }
            progress.program_progress(index + 1);
        }

        progress.verifying(pages);
        let mut readback = [0u8; PAGE_SIZE];
        let mut mismatches = 0;
        for (index, page) in padded.chunks(PAGE_SIZE).enumerate() {
            self.transport.read(&mut readback)?;
            if readback[..] != *page {
                log::warn!("Bad data in page {} (address {:#08x})", index, index * PAGE_SIZE);
                mismatches += 1;
            }
            progress.verify_progress(index + 1);
        }
        progress.complete();

        if mismatches > 0 {
            return Err(ClientError::VerifyFailed { pages: mismatches });
        }
        Ok(info)
    }

    /// Read the whole flash
    pub fn read_flash<P: Progress + ?Sized>(
        &mut self,
        progress: &mut P,
    ) -> Result<(FlashInfo, Vec<u8>)> {
        self.start(Command::ReadFlash)?;
        let info = self.read_flash_banner()?;

        let capacity = info.capacity as usize;
        let mut data = vec![0u8; capacity];
        progress.reading(capacity);
        let mut offset = 0;
        while offset < capacity {
            let end = usize::min(offset + PAGE_SIZE, capacity);
            self.transport.read(&mut data[offset..end])?;
            offset = end;
            progress.read_progress(offset);
        }
        progress.complete();

        Ok((info, data))
    }

    /// Stream a bitstream into the FPGA's configuration port
    pub fn write_fpga<P: Progress + ?Sized>(
        &mut self,
        bitstream: &[u8],
        progress: &mut P,
    ) -> Result<()> {
        self.start(Command::WriteFpga)?;
        let banner = self.read_line()?;
        if banner.as_bytes() != FPGA_BANNER.strip_suffix(b"\n").unwrap_or(FPGA_BANNER) {
            return Err(ClientError::BadBanner(banner));
        }
        log::info!("Got FPGA write banner: {}", banner);

        self.expect_line(PROMPT)?;
        progress.configuring(bitstream.len());
        let mut sent = 0;
        for block in bitstream.chunks(MAX_BLOCK) {
            self.transport.write(&[block.len() as u8])?;
            self.send(block)?;
            self.expect_marker()?;
            sent += block.len();
            progress.configure_progress(sent);
        }
        self.send(&[END_OF_STREAM])?;

        let status = self.read_byte()?;
        progress.complete();
        match status {
            STATUS_DONE_HIGH => {
                log::info!("Got a HIGH on CDONE");
                Ok(())
            }
            STATUS_DONE_LOW => {
                log::warn!("Got a LOW on CDONE");
                Err(ClientError::ConfigurationFailed)
            }
            other => Err(ClientError::UnexpectedMarker(format!("{:#04x}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use crate::transport::IoTransport;
    use std::io::{Cursor, Read, Write};

    /// Replays a canned bridge response and records what the client sends
    struct Scripted {
        response: Cursor<Vec<u8>>,
        sent: Vec<u8>,
    }

    impl Scripted {
        fn new(response: &[u8]) -> Self {
            Self {
                response: Cursor::new(response.to_vec()),
                sent: Vec::new(),
            }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.response.read(buf)
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.sent.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn client(response: &[u8]) -> Client<IoTransport<Scripted>> {
        Client::new(IoTransport::new(Scripted::new(response)))
    }

    #[test]
    fn test_pad_to_pages() {
        assert_eq!(pad_to_pages(&[]).len(), 0);
        assert_eq!(pad_to_pages(&[1]).len(), 256);
        assert_eq!(pad_to_pages(&[1; 256]).len(), 256);
        let padded = pad_to_pages(&[1; 300]);
        assert_eq!(padded.len(), 512);
        assert!(padded[300..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_flash_wire_format() {
        let mut response = b"EPCQ4A 524288\n+++\n#".to_vec();
        let mut page = vec![0x42; 10];
        page.resize(256, 0);
        response.extend_from_slice(&page);

        let mut c = client(&response);
        let info = c.write_flash(&[0x42; 10], &mut NoProgress).unwrap();
        assert_eq!(info.name, "EPCQ4A");
        assert_eq!(info.page_count(), 2048);

        let sent = c.into_inner().into_inner().sent;
        assert_eq!(&sent[..6], b" w\x01\x00\x00\x00");
        assert_eq!(&sent[6..], page.as_slice());
    }

    #[test]
    fn test_write_flash_reports_mismatches() {
        let mut response = b"EPCQ4A 524288\n+++\n##".to_vec();
        response.extend_from_slice(&[0xFF; 512]);

        let mut c = client(&response);
        let err = c.write_flash(&[0x00; 512], &mut NoProgress).unwrap_err();
        assert!(matches!(err, ClientError::VerifyFailed { pages: 2 }));
    }

    #[test]
    fn test_write_flash_marker_error_line() {
        let mut c = client(b"EPCQ4A 524288\n+++\nbad page\n");
        let err = c.write_flash(&[0x00; 256], &mut NoProgress).unwrap_err();
        match err {
            ClientError::UnexpectedMarker(line) => assert_eq!(line, "bad page"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_write_flash_rejects_oversized_image() {
        let mut c = client(b"EPCQ4A 524288\n+++\n");
        let err = c.write_flash(&vec![0u8; 524_289], &mut NoProgress).unwrap_err();
        assert!(matches!(
            err,
            ClientError::ImageTooLarge {
                image: 524_544,
                capacity: 524_288
            }
        ));
        assert_eq!(c.into_inner().into_inner().sent, b" w");
    }

    #[test]
    fn test_unknown_device_line() {
        let mut c = client(b"unknown flash device C2 20 17\n");
        let err = c.read_flash(&mut NoProgress).unwrap_err();
        assert!(matches!(err, ClientError::UnknownDevice(line) if line.ends_with("C2 20 17")));
    }

    #[test]
    fn test_bad_banner() {
        let mut c = client(b"hello\n");
        assert!(matches!(c.read_flash(&mut NoProgress), Err(ClientError::BadBanner(_))));
    }

    #[test]
    fn test_write_fpga_blocks() {
        let mut c = client(b"FPGA write mode\n+++\n##H");
        let bitstream: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        c.write_fpga(&bitstream, &mut NoProgress).unwrap();

        let sent = c.into_inner().into_inner().sent;
        assert_eq!(&sent[..2], b" f");
        assert_eq!(sent[2], 255);
        assert_eq!(&sent[3..258], &bitstream[..255]);
        assert_eq!(sent[258], 45);
        assert_eq!(&sent[259..304], &bitstream[255..]);
        assert_eq!(&sent[304..], &[0]);
    }

    #[test]
    fn test_write_fpga_done_low() {
        let mut c = client(b"FPGA write mode\n+++\nL");
        assert!(matches!(
            c.write_fpga(&[], &mut NoProgress),
            Err(ClientError::ConfigurationFailed)
        ));
    }

    #[test]
    fn test_missing_prompt() {
        let mut c = client(b"FPGA write mode\n---\n");
        assert!(matches!(
            c.write_fpga(&[1], &mut NoProgress),
            Err(ClientError::MissingPrompt(line)) if line == "---"
        ));
    }
}
