//! List commands implementation

use fpgaflasher_core::chip::{self, FLASH_DEVICES};

/// List all supported chips
///
/// Parts sharing an identification code are listed, but the bridge always
/// reports the first of them.
pub fn list_chips() {
    println!("Supported flash chips:");
    println!();
    println!("{:<12} {:>10} {:>10}  {}", "Name", "Size", "JEDEC ID", "Note");
    println!("{}", "-".repeat(50));

    for device in FLASH_DEVICES {
        let note = match chip::lookup(device.id) {
            Some(first) if first.name != device.name => format!("reported as {}", first.name),
            _ => String::new(),
        };
        println!(
            "{:<12} {:>10} {:>10}  {}",
            device.name,
            format_size(device.capacity),
            device.id.to_string(),
            note
        );
    }
}

fn format_size(bytes: u32) -> String {
    if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}
