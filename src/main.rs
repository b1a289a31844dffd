//! fpgaflasher - Host tool for the fpgaflasher bridge
//!
//! The bridge sits between a serial link and an FPGA board: it programs the
//! board's configuration flash (erase, write, read back) or streams a
//! bitstream straight into the FPGA's slave configuration port.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, PortArgs};
use fpgaflasher_client::{Client, SerialTransport};

fn open(port: &PortArgs) -> Result<Client<SerialTransport>, Box<dyn std::error::Error>> {
    let transport = SerialTransport::open(&port.port, port.baud, port.timeout).map_err(|e| {
        format!(
            "Could not open {} ({}); power on the bridge and try again",
            port.port, e
        )
    })?;
    Ok(Client::new(transport))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::WriteFlash { port, input } => {
            let mut client = open(&port)?;
            commands::run_write_flash(&mut client, &input)
        }
        Commands::ReadFlash { port, output } => {
            let mut client = open(&port)?;
            commands::run_read_flash(&mut client, &output)
        }
        Commands::WriteFpga { port, input } => {
            let mut client = open(&port)?;
            commands::run_write_fpga(&mut client, &input)
        }
        Commands::ListChips => {
            commands::list_chips();
            Ok(())
        }
    }
}
