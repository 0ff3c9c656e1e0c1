//! Converts an order export file into a JSON file.
//!
//! ```text
//! cargo run --example convert -- test_xml_files/orders.xml orders.json
//! RUST_LOG=trace cargo run --example convert -- test_xml_files/orders.xml
//! ```
//! Without an output path the JSON is printed to stdout.

use order_export_to_json::{xml_to_json, Config};
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: convert <export.xml> [output.json]");
            std::process::exit(2);
        }
    };

    let xml = std::fs::read(&input)?;
    let json = xml_to_json(&xml, &Config::new_with_custom_values("\t", true))?;

    match args.next() {
        Some(output) => std::fs::write(output, json)?,
        None => std::io::stdout().write_all(&json)?,
    }

    Ok(())
}
