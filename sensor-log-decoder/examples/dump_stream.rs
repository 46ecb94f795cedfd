//! Standalone sensor stream dump tool
//!
//! Loads a binary sensor stream and prints every record in priority order,
//! then the effect of a validation pass.
//!
//! Usage:
//!   dump_stream <sensors.dat> [--big-endian | --little-endian]

use sensor_log_decoder::{Decoder, DecoderConfig, SensorPayload, StreamByteOrder};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1).map(PathBuf::from) else {
        let program = args.first().map(String::as_str).unwrap_or("dump_stream");
        eprintln!("Usage: {} <sensors.dat> [--big-endian | --little-endian]", program);
        std::process::exit(1);
    };

    let byte_order = match args.get(2).map(String::as_str) {
        Some("--big-endian") => StreamByteOrder::Big,
        Some("--little-endian") => StreamByteOrder::Little,
        _ => StreamByteOrder::Native,
    };

    let decoder = Decoder::with_config(DecoderConfig::new().with_byte_order(byte_order));
    let mut store = match decoder.decode_file(&path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to decode {:?}: {}", path, e);
            std::process::exit(1);
        }
    };

    println!("=== {} sensors ===", store.len());
    for (index, entry) in store.iter().enumerate() {
        let ops: Vec<String> = entry.record().operations().iter().map(|op| op.to_string()).collect();
        match entry.record().payload() {
            SensorPayload::Tire(t) => println!(
                "[{:3}] tire  pressure={:.2} temperature={:.2} wear={}% ops=[{}]",
                index, t.pressure, t.temperature, t.wear_level, ops.join(",")
            ),
            SensorPayload::Pmu(p) => println!(
                "[{:3}] pmu   voltage={:.2} current={:.2} power={:.2} regen={}% storage={}% ops=[{}]",
                index, p.voltage, p.current, p.power_consumption, p.energy_regen, p.energy_storage, ops.join(",")
            ),
        }
    }

    let report = store.compact();
    println!("\n=== VALIDATION ===");
    println!("Valid sensors: {}", report.retained);
    println!("Invalid sensors: {}", report.removed());
}
