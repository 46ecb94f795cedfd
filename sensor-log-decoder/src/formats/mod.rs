//! Input stream formats
//!
//! This module contains the reader for the length-prefixed sensor record
//! stream. Readers materialize `SensorRecord` values and perform structural
//! validation only; range checks belong to `validation`.

pub mod sensor_stream;

// Re-export reader types
pub use sensor_stream::{decode_records, SensorStreamReader};
