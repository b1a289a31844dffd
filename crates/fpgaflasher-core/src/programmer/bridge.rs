//! embedded-hal backed bus controller
//!
//! `SpiBridge` owns every shared hardware resource of the bridge: the SPI
//! bus, the chip select line, the external reset output and the done
//! input. It is the one handle passed to each engine.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};
use embedded_hal::spi::SpiBus;

use super::traits::{ConfigPort, FaultIndicator, ResetControl, SpiMaster};
use crate::config::ResetPolarity;
use crate::error::{Error, Result};
use crate::spi::SpiCommand;

/// Longest opcode + address + dummy header the bridge will send
const MAX_HEADER_LEN: usize = 8;

/// Bus controller over embedded-hal peripherals
pub struct SpiBridge<SPI, CS, RST, DONE, D> {
    spi: SPI,
    cs: CS,
    reset: RST,
    done: DONE,
    delay: D,
    polarity: ResetPolarity,
}

impl<SPI, CS, RST, DONE, D> SpiBridge<SPI, CS, RST, DONE, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    RST: OutputPin,
    DONE: InputPin,
    D: DelayNs,
{
    /// Create a bridge with an active-low reset line
    ///
    /// Chip select is expected to already be driven high (inactive).
    pub fn new(spi: SPI, cs: CS, reset: RST, done: DONE, delay: D) -> Self {
        Self {
            spi,
            cs,
            reset,
            done,
            delay,
            polarity: ResetPolarity::default(),
        }
    }

    /// Override the reset line polarity
    pub fn with_reset_polarity(mut self, polarity: ResetPolarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Give the peripherals back
    pub fn release(self) -> (SPI, CS, RST, DONE, D) {
        (self.spi, self.cs, self.reset, self.done, self.delay)
    }

    /// Run `f` with chip select asserted; chip select is released on every path
    fn transact<R>(&mut self, f: impl FnOnce(&mut SPI) -> Result<R>) -> Result<R> {
        self.cs.set_low().map_err(|_| Error::PinError)?;
        let result = f(&mut self.spi).and_then(|r| {
            self.spi.flush().map_err(|_| Error::SpiTransferFailed)?;
            Ok(r)
        });
        let released = self.cs.set_high().map_err(|_| Error::PinError);
        let value = result?;
        released?;
        Ok(value)
    }
}

impl<SPI, CS, RST, DONE, D> SpiMaster for SpiBridge<SPI, CS, RST, DONE, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    RST: OutputPin,
    DONE: InputPin,
    D: DelayNs,
{
    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()> {
        let mut header = [0u8; MAX_HEADER_LEN];
        if cmd.header_len() > MAX_HEADER_LEN {
            return Err(Error::BufferTooSmall);
        }
        let header_len = cmd.encode_header(&mut header);

        self.transact(|spi| {
            spi.write(&header[..header_len])
                .map_err(|_| Error::SpiTransferFailed)?;
            if !cmd.write_data.is_empty() {
                spi.write(cmd.write_data)
                    .map_err(|_| Error::SpiTransferFailed)?;
            }
            if !cmd.read_buf.is_empty() {
                spi.read(cmd.read_buf)
                    .map_err(|_| Error::SpiTransferFailed)?;
            }
            Ok(())
        })
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

impl<SPI, CS, RST, DONE, D> ResetControl for SpiBridge<SPI, CS, RST, DONE, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    RST: OutputPin,
    DONE: InputPin,
    D: DelayNs,
{
    fn set_reset(&mut self, asserted: bool) -> Result<()> {
        let state = PinState::from(self.polarity.level(asserted));
        self.reset.set_state(state).map_err(|_| Error::PinError)
    }
}

impl<SPI, CS, RST, DONE, D> ConfigPort for SpiBridge<SPI, CS, RST, DONE, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    RST: OutputPin,
    DONE: InputPin,
    D: DelayNs,
{
    fn select(&mut self) -> Result<()> {
        self.cs.set_low().map_err(|_| Error::PinError)
    }

    fn deselect(&mut self) -> Result<()> {
        self.spi.flush().map_err(|_| Error::SpiTransferFailed)?;
        self.cs.set_high().map_err(|_| Error::PinError)
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.spi.write(data).map_err(|_| Error::SpiTransferFailed)?;
        self.spi.flush().map_err(|_| Error::SpiTransferFailed)
    }

    fn done(&mut self) -> Result<bool> {
        self.done.is_high().map_err(|_| Error::PinError)
    }
}

/// Fault indicator driving a plain output pin (typically an LED)
pub struct PinIndicator<P>(pub P);

impl<P: OutputPin> FaultIndicator for PinIndicator<P> {
    fn set(&mut self, on: bool) {
        // Nothing useful can be done if the LED itself fails.
        let _ = self.0.set_state(PinState::from(on));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::spi25;
    use crate::spi::opcodes;
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Cs(bool),
        Reset(bool),
        Write(Vec<u8>),
        Read(usize),
        Delay(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct FakeSpi {
        log: Log,
        miso: Vec<u8>,
        fail_writes: bool,
    }

    #[derive(Debug)]
    struct FakeError;

    impl embedded_hal::spi::Error for FakeError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::ErrorType for FakeSpi {
        type Error = FakeError;
    }

    impl SpiBus for FakeSpi {
        fn read(&mut self, words: &mut [u8]) -> core::result::Result<(), FakeError> {
            self.log.borrow_mut().push(Event::Read(words.len()));
            for w in words.iter_mut() {
                *w = if self.miso.is_empty() { 0 } else { self.miso.remove(0) };
            }
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> core::result::Result<(), FakeError> {
            if self.fail_writes {
                return Err(FakeError);
            }
            self.log.borrow_mut().push(Event::Write(words.to_vec()));
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> core::result::Result<(), FakeError> {
            self.write(write)?;
            self.read(read)
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> core::result::Result<(), FakeError> {
            let out = words.to_vec();
            self.write(&out)?;
            self.read(words)
        }

        fn flush(&mut self) -> core::result::Result<(), FakeError> {
            Ok(())
        }
    }

    struct FakePin {
        log: Log,
        reset: bool,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> core::result::Result<(), Infallible> {
            let ev = if self.reset { Event::Reset(false) } else { Event::Cs(false) };
            self.log.borrow_mut().push(ev);
            Ok(())
        }

        fn set_high(&mut self) -> core::result::Result<(), Infallible> {
            let ev = if self.reset { Event::Reset(true) } else { Event::Cs(true) };
            self.log.borrow_mut().push(ev);
            Ok(())
        }
    }

    struct FakeDone(bool);

    impl embedded_hal::digital::ErrorType for FakeDone {
        type Error = Infallible;
    }

    impl InputPin for FakeDone {
        fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    struct FakeDelay(Log);

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Event::Delay(ns / 1000));
        }
    }

    fn bridge(
        miso: Vec<u8>,
        done: bool,
    ) -> (SpiBridge<FakeSpi, FakePin, FakePin, FakeDone, FakeDelay>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let spi = FakeSpi {
            log: log.clone(),
            miso,
            fail_writes: false,
        };
        let cs = FakePin {
            log: log.clone(),
            reset: false,
        };
        let reset = FakePin {
            log: log.clone(),
            reset: true,
        };
        let delay = FakeDelay(log.clone());
        (SpiBridge::new(spi, cs, reset, FakeDone(done), delay), log)
    }

    #[test]
    fn test_identify_framing() {
        let (mut b, log) = bridge(vec![0xEF, 0x40, 0x13], false);
        let id = spi25::identify(&mut b).unwrap();
        assert_eq!(id.0, [0xEF, 0x40, 0x13]);
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Cs(false),
                Event::Write(vec![opcodes::RDID]),
                Event::Read(3),
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_fast_read_framing() {
        let (mut b, log) = bridge(vec![1, 2, 3, 4], false);
        let mut buf = [0u8; 4];
        spi25::fast_read(&mut b, 0x00_0100, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Cs(false),
                Event::Write(vec![opcodes::FAST_READ, 0x00, 0x01, 0x00, 0x00]),
                Event::Read(4),
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_chip_select_released_on_error() {
        let (mut b, log) = bridge(Vec::new(), false);
        b.spi.fail_writes = true;
        assert_eq!(spi25::write_enable(&mut b), Err(Error::SpiTransferFailed));
        assert_eq!(*log.borrow(), vec![Event::Cs(false), Event::Cs(true)]);
    }

    #[test]
    fn test_reset_polarity() {
        let (mut b, log) = bridge(Vec::new(), false);
        b.set_reset(true).unwrap();
        b.set_reset(false).unwrap();
        let mut b = b.with_reset_polarity(ResetPolarity::ActiveHigh);
        b.set_reset(true).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![Event::Reset(false), Event::Reset(true), Event::Reset(true)]
        );
    }

    #[test]
    fn test_raw_port_leaves_chip_select_alone() {
        let (mut b, log) = bridge(Vec::new(), true);
        b.write_raw(&[0x00]).unwrap();
        assert!(b.done().unwrap());
        assert_eq!(*log.borrow(), vec![Event::Write(vec![0x00])]);
    }
}
