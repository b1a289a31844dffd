//! FPGA configuration loader against the emulated configuration port

use fpgaflasher_core::config::Timing;
use fpgaflasher_core::flash::PageBuffer;
use fpgaflasher_core::fpga::{self, ConfigLoader, ConfigState, ConfigStatus};
use fpgaflasher_core::Error;
use fpgaflasher_sim::{BusEvent, HostPipe, SimBridge};

fn block_stream(blocks: &[&[u8]]) -> Vec<u8> {
    let mut stream = Vec::new();
    for block in blocks {
        stream.push(block.len() as u8);
        stream.extend_from_slice(block);
    }
    stream.push(0);
    stream
}

#[test]
fn test_single_block() {
    let mut bridge = SimBridge::new_default();
    let mut host = HostPipe::new(&[2, 0x01, 0x02, 0]);
    let mut buf = PageBuffer::new();

    let report = fpga::configure(&mut bridge, &mut host, &Timing::default(), &mut buf).unwrap();

    assert_eq!(host.output(), b"+++\n#H");
    assert_eq!(report.status, ConfigStatus::Success);
    assert_eq!(report.blocks, 1);
    assert_eq!(report.bytes, 2);
    assert_eq!(bridge.fpga().bitstream(), &[0x01, 0x02]);
    assert!(bridge.fpga().slave_mode());
    // One wake byte before the bitstream, seven trailing bytes after.
    assert_eq!(bridge.fpga().idle_bytes(), 8);
}

#[test]
fn test_many_blocks() {
    let big: Vec<u8> = (0..255u32).map(|i| i as u8).collect();
    let blocks: [&[u8]; 4] = [&big, &[0xA5], &big[..17], &big[100..]];
    let mut bridge = SimBridge::new_default();
    let mut host = HostPipe::new(&block_stream(&blocks));
    let mut buf = PageBuffer::new();

    let report = fpga::configure(&mut bridge, &mut host, &Timing::default(), &mut buf).unwrap();

    assert_eq!(host.output(), b"+++\n####H");
    assert_eq!(report.blocks, 4);
    assert_eq!(report.bytes, 255 + 1 + 17 + 155);
    assert_eq!(bridge.fpga().bitstream(), blocks.concat().as_slice());
    assert_eq!(host.remaining(), 0);
}

#[test]
fn test_empty_stream() {
    let mut bridge = SimBridge::new_default();
    let mut host = HostPipe::new(&[0]);
    let mut buf = PageBuffer::new();

    let report = fpga::configure(&mut bridge, &mut host, &Timing::default(), &mut buf).unwrap();

    assert_eq!(host.output(), b"+++\nH");
    assert_eq!(report.blocks, 0);
    assert!(bridge.fpga().bitstream().is_empty());
}

#[test]
fn test_done_low_reports_failure() {
    let mut bridge = SimBridge::new_default();
    bridge.fpga_mut().set_done(false);
    let mut host = HostPipe::new(&[2, 0x01, 0x02, 0]);
    let mut buf = PageBuffer::new();

    let report = fpga::configure(&mut bridge, &mut host, &Timing::default(), &mut buf).unwrap();

    assert_eq!(report.status, ConfigStatus::Failure);
    assert_eq!(host.output(), b"+++\n#L");
    assert_eq!(bridge.events().last(), Some(&BusEvent::SampleDone(false)));
}

#[test]
fn test_step_sequence() {
    let mut bridge = SimBridge::new_default();
    let mut host = HostPipe::new(&[3, 9, 8, 7, 0]);
    let mut buf = PageBuffer::new();

    let mut loader = ConfigLoader::new(&mut bridge, Timing::default());
    assert_eq!(loader.state(), ConfigState::Idle);
    assert_eq!(loader.step(&mut host, &mut buf), Ok(ConfigState::ResetAsserted));
    assert_eq!(loader.step(&mut host, &mut buf), Ok(ConfigState::ResetReleasing));
    assert!(host.output().is_empty());
    assert_eq!(loader.step(&mut host, &mut buf), Ok(ConfigState::Streaming));
    assert_eq!(host.output(), b"+++\n");
    assert_eq!(loader.step(&mut host, &mut buf), Ok(ConfigState::Streaming));
    assert_eq!(loader.step(&mut host, &mut buf), Ok(ConfigState::Finishing));
    assert_eq!(host.output(), b"+++\n#");
    let done = ConfigState::Done(ConfigStatus::Success);
    assert_eq!(loader.step(&mut host, &mut buf), Ok(done));
    // Done is terminal.
    assert_eq!(loader.step(&mut host, &mut buf), Ok(done));
    assert_eq!(host.output(), b"+++\n#H");

    let mut expected = vec![
        BusEvent::Reset(true),
        BusEvent::Select,
        BusEvent::Delay(1),
        BusEvent::Reset(false),
        BusEvent::Delay(1_200),
        BusEvent::Deselect,
        BusEvent::Raw(vec![0]),
        BusEvent::Select,
        BusEvent::Raw(vec![9, 8, 7]),
        BusEvent::Delay(1),
        BusEvent::Deselect,
    ];
    expected.extend(std::iter::repeat(BusEvent::Raw(vec![0])).take(7));
    expected.push(BusEvent::SampleDone(true));
    assert_eq!(bridge.events(), expected.as_slice());
    assert!(!bridge.is_selected());
}

#[test]
fn test_select_precedes_reset_release() {
    let mut bridge = SimBridge::new_default();
    let mut host = HostPipe::new(&[0]);
    let mut buf = PageBuffer::new();
    fpga::configure(&mut bridge, &mut host, &Timing::default(), &mut buf).unwrap();

    let events = bridge.events();
    let select = events.iter().position(|e| *e == BusEvent::Select).unwrap();
    let release = events.iter().position(|e| *e == BusEvent::Reset(false)).unwrap();
    assert!(select < release);
    assert!(bridge.fpga().slave_mode());
}

#[test]
fn test_truncated_block() {
    let mut bridge = SimBridge::new_default();
    let mut host = HostPipe::new(&[4, 1, 2]);
    let mut buf = PageBuffer::new();

    let result = fpga::configure(&mut bridge, &mut host, &Timing::default(), &mut buf);

    assert_eq!(result, Err(Error::HostClosed));
    assert_eq!(host.output(), b"+++\n");
    assert!(bridge.fpga().bitstream().is_empty());
    assert!(!bridge.is_selected());
    assert_eq!(bridge.events().last(), Some(&BusEvent::Deselect));
}
