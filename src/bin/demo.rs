//! MFM Modbus Demo
//!
//! Polls a set of common registers from one meter and prints the values
//! together with the link diagnostics.
//!
//! Usage: cargo run --features rtu --bin demo <port> [slave] [baud] [model]
//! Example: cargo run --features rtu --bin demo /dev/ttyUSB0 1 9600 ddm18sd
//!
//! `model` picks the register table: `mfm` (default) or `ddm18sd`.

use mfm_modbus::{registers, ErrorCode, LinkConfig, MeterClient, SerialConfig};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(port) = args.next() else {
        eprintln!("Usage: demo <port> [slave] [baud] [model]");
        std::process::exit(2);
    };
    let slave: u8 = match args.next() {
        Some(s) => s.parse()?,
        None => mfm_modbus::DEFAULT_SLAVE_ID,
    };
    let baud: u32 = match args.next() {
        Some(s) => s.parse()?,
        None => 9600,
    };
    let table = match args.next().as_deref() {
        None | Some("mfm") => registers::COMMON,
        Some("ddm18sd") => registers::DDM18SD,
        Some(other) => {
            eprintln!("Unknown model '{}', expected mfm or ddm18sd", other);
            std::process::exit(2);
        }
    };

    println!("{}", mfm_modbus::info());
    println!("=============================");
    println!("Port: {}  Slave: {}  Baud: {}\n", port, slave, baud);

    let trace = std::env::var_os("MFM_TRACE").is_some();
    let link = LinkConfig::new().with_packet_logging(trace);
    let config = SerialConfig::new(port).with_baud_rate(baud).with_link(link);
    let mut client = MeterClient::open_serial(&config)?;
    client.begin().await;

    // =========================================================================
    // Part 1: Measurements
    // =========================================================================
    println!("Part 1: Measurements");
    println!("--------------------");

    for reg in table {
        let reading = client.read(reg.address, slave).await;
        match (reading.value, reading.error) {
            (Some(v), ErrorCode::NoError) => println!(
                "  {:<14} 0x{:04X}  {:>12.3} {}",
                reg.name, reg.address, v, reg.unit
            ),
            (_, err) => println!(
                "  {:<14} 0x{:04X}  failed: {}",
                reg.name, reg.address, err
            ),
        }
        sleep(Duration::from_millis(50)).await;
    }

    // =========================================================================
    // Part 2: Diagnostics
    // =========================================================================
    println!("\nPart 2: Diagnostics");
    println!("-------------------");

    let diag = client.diagnostics();
    println!("  Successful reads: {}", diag.success_count);
    println!("  Failed reads:     {}", diag.error_count);
    println!("  Last error:       {}", diag.last_error);

    Ok(())
}
