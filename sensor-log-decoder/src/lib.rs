//! Sensor Log Decoder Library
//!
//! A reusable library for loading vehicle sensor logs (tire sensors and power
//! management units) from their binary stream format and working with the
//! resulting records.
//!
//! # Architecture
//!
//! - Decodes the length-prefixed record stream into typed `SensorRecord`s
//! - Reorders records so power management units come before tire sensors
//! - Applies per-record operation lists through an eight-slot `OperationTable`
//! - Drops records whose readings fall outside their operating ranges
//!
//! The library does NOT:
//! - Parse operator commands
//! - Provide the concrete operations (the caller fills the table)
//! - Render records for display
//! - Write results back to disk
//!
//! Command handling and rendering live in the application layer (sensor-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use sensor_log_decoder::{Decoder, DecoderConfig, OperationIndex, OperationTable, PayloadMut};
//! use std::path::Path;
//!
//! let decoder = Decoder::with_config(DecoderConfig::new());
//! let mut store = decoder.decode_file(Path::new("sensors.dat")).unwrap();
//!
//! let table = OperationTable::new().with_operation(
//!     OperationIndex::PERFORMANCE_SCORE,
//!     |payload: PayloadMut<'_>| {
//!         if let PayloadMut::Tire(tire) = payload {
//!             tire.performance_score = 10;
//!         }
//!     },
//! );
//!
//! for index in 0..store.len() {
//!     store.analyze(index, &table).unwrap();
//! }
//!
//! let report = store.compact();
//! println!("{} of {} sensors are valid", report.retained, report.before);
//! ```

// Public modules
pub mod config;
pub mod decoder;
pub mod dispatch;
pub mod formats;
pub mod reorder;
pub mod store;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use config::{DecoderConfig, StreamByteOrder, UnsetOperationPolicy};
pub use decoder::Decoder;
pub use dispatch::{DispatchReport, Operation, OperationTable};
pub use store::{CompactionReport, RecordSnapshot, SensorStore, StoredRecord};
pub use types::{
    OperationIndex, PayloadMut, PmuData, Result, SensorError, SensorKind, SensorPayload,
    SensorRecord, TireData, OPERATION_SLOTS,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
