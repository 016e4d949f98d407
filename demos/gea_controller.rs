//! Drive the generator boards from levels typed on stdin.
//!
//! Usage:
//!   cargo run --example gea_controller -- /dev/ttyUSB0 4
//!   cargo run --example gea_controller -- /dev/ttyUSB0 5
//!
//! Each input line holds one level (0-19) per coil, e.g. `3 3 0 12`.
//! An empty line repeats the last levels. Set RUST_LOG=debug to see the frames.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serialport::{DataBits, Parity, StopBits};
use std::io::BufRead;

use gea_proto::{initialize, ControlLoop, ControllerConfig, Encoder, Personality, ThreadSleep};

fn parse_levels(line: &str, coils: usize) -> Result<Vec<u8>> {
    let levels = line
        .split_whitespace()
        .map(|s| s.parse::<u8>().context("Parse error"))
        .collect::<Result<Vec<_>>>()?;
    if levels.len() != coils {
        bail!("Expected {} levels, got {}", coils, levels.len());
    }
    Ok(levels)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let port = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let five_coil = match args.next().as_deref() {
        None | Some("4") => false,
        Some("5") => true,
        Some(other) => bail!("Unknown personality {}, use 4 or 5", other),
    };
    let config = ControllerConfig::new(Personality::from_input(five_coil)).with_port(port);

    let serial = serialport::new(&config.port, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .open()
        .with_context(|| format!("Failed to open serial port {}", config.port))?;
    info!("Opened {} at {} baud", config.port, config.baud_rate);

    let mut encoder = Encoder::new(serial);
    let report = initialize(&mut encoder, &config, &mut ThreadSleep);
    if !report.is_ok() {
        warn!("{} start-up steps failed", report.failed.len());
    }

    let coils = config.personality.coil_count();
    let mut control = ControlLoop::new(&config);
    let mut levels = vec![0u8; coils];
    println!("Enter {} levels per line, Ctrl-D to stop.", coils);
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match parse_levels(&line, coils) {
                Ok(new) => levels = new,
                Err(err) => {
                    println!("{:#}", err);
                    continue;
                }
            }
        }
        let mut source = |coil: usize| levels[coil];
        control.cycle(&mut encoder, &mut source)?;
    }

    // leave every coil off
    let mut off = |_coil: usize| 0u8;
    control.cycle(&mut encoder, &mut off)?;
    Ok(())
}
