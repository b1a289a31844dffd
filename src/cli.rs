//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a duration given in whole seconds
fn parse_seconds(s: &str) -> Result<std::time::Duration, String> {
    s.parse::<u64>()
        .map(std::time::Duration::from_secs)
        .map_err(|e| format!("Invalid number of seconds: {}", e))
}

#[derive(Parser)]
#[command(name = "fpgaflasher")]
#[command(author, version, about = "SPI flash and FPGA loader for the fpgaflasher bridge", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Serial link options shared across commands
#[derive(Args, Debug, Clone)]
pub struct PortArgs {
    /// Serial device of the bridge
    #[arg(short, long, default_value = "/dev/ttyACM0")]
    pub port: String,

    /// Baud rate (ignored by USB CDC bridges)
    #[arg(long, default_value_t = fpgaflasher_client::DEFAULT_BAUD)]
    pub baud: u32,

    /// Read timeout in seconds; must cover a full bulk erase
    #[arg(long, default_value = "300", value_parser = parse_seconds)]
    pub timeout: std::time::Duration,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Erase the flash, write an image and verify it
    WriteFlash {
        #[command(flatten)]
        port: PortArgs,

        /// Image file (padded with zeros to a whole page)
        input: PathBuf,
    },

    /// Read the whole flash to a file
    ReadFlash {
        #[command(flatten)]
        port: PortArgs,

        /// Output file path
        output: PathBuf,
    },

    /// Load a bitstream straight into the FPGA
    WriteFpga {
        #[command(flatten)]
        port: PortArgs,

        /// Bitstream file
        input: PathBuf,
    },

    /// List supported flash chips
    ListChips,
}
