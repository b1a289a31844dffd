//! Read command implementation

use super::progress::IndicatifProgress;
use fpgaflasher_client::{Client, Transport};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Run the read-flash command
pub fn run_read_flash<T: Transport>(
    client: &mut Client<T>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut progress = IndicatifProgress::new();
    let (info, data) = client.read_flash(&mut progress)?;

    println!("Found: {} ({} bytes)", info.name, info.capacity);

    let mut file = File::create(output)?;
    file.write_all(&data)?;

    println!("Wrote {} bytes to {:?}", data.len(), output);

    Ok(())
}
