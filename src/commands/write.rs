//! Write command implementations

use super::progress::IndicatifProgress;
use fpgaflasher_client::{Client, ClientError, Transport};
use std::path::Path;

/// Run the write-flash command
pub fn run_write_flash<T: Transport>(
    client: &mut Client<T>,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = std::fs::read(input)?;
    println!("Read {} bytes from {:?}", image.len(), input);

    let mut progress = IndicatifProgress::new();
    match client.write_flash(&image, &mut progress) {
        Ok(info) => {
            println!("Wrote and verified {} ({} bytes)", info.name, info.capacity);
            Ok(())
        }
        Err(ClientError::VerifyFailed { pages }) => {
            Err(format!("Verification failed: {} pages differ", pages).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the write-fpga command
pub fn run_write_fpga<T: Transport>(
    client: &mut Client<T>,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let bitstream = std::fs::read(input)?;
    println!("Read {} bytes from {:?}", bitstream.len(), input);

    let mut progress = IndicatifProgress::new();
    client.write_fpga(&bitstream, &mut progress)?;

    println!("FPGA configured (CDONE high)");
    Ok(())
}
