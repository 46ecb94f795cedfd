//! Core types for the sensor log decoder library
//!
//! This module defines the record model produced by the decoder: the sensor
//! kind, the two payload layouts, the operation index list each record carries,
//! and the error type shared by every operation in the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder and store operations
pub type Result<T> = std::result::Result<T, SensorError>;

/// Number of slots in an operation table
pub const OPERATION_SLOTS: usize = 8;

/// Sensor class of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Tire sensor (pressure, temperature, wear)
    Tire,
    /// Power management unit (voltage, current, energy)
    PowerManagementUnit,
}

impl SensorKind {
    /// Wire tag for this kind
    pub fn tag(self) -> i32 {
        match self {
            SensorKind::Tire => 0,
            SensorKind::PowerManagementUnit => 1,
        }
    }

    /// Resolve a wire tag, `None` if the tag is not recognized
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(SensorKind::Tire),
            1 => Some(SensorKind::PowerManagementUnit),
            _ => None,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Tire => write!(f, "Tire Sensor"),
            SensorKind::PowerManagementUnit => write!(f, "Power Management Unit"),
        }
    }
}

/// Tire sensor readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TireData {
    /// Pressure in psi
    pub pressure: f32,
    /// Temperature in °C
    pub temperature: f32,
    /// Wear level in percent
    pub wear_level: i32,
    /// Performance score, only meaningful once computed by an operation
    pub performance_score: i32,
}

/// Power management unit readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PmuData {
    /// Voltage in volts
    pub voltage: f32,
    /// Current in amperes (negative while charging)
    pub current: f32,
    /// Power consumption in kW
    pub power_consumption: f32,
    /// Regenerated energy in percent
    pub energy_regen: i32,
    /// Stored energy in percent
    pub energy_storage: i32,
}

/// Payload owned by a sensor record
///
/// The variant doubles as the record's kind, so a payload can never disagree
/// with the tag it was decoded under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorPayload {
    /// Tire sensor payload
    Tire(TireData),
    /// Power management unit payload
    Pmu(PmuData),
}

impl SensorPayload {
    /// Kind of sensor this payload belongs to
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorPayload::Tire(_) => SensorKind::Tire,
            SensorPayload::Pmu(_) => SensorKind::PowerManagementUnit,
        }
    }

    /// Borrow the payload mutably without allowing its variant to change
    pub fn view_mut(&mut self) -> PayloadMut<'_> {
        match self {
            SensorPayload::Tire(tire) => PayloadMut::Tire(tire),
            SensorPayload::Pmu(pmu) => PayloadMut::Pmu(pmu),
        }
    }

    /// Tire data, if this is a tire payload
    pub fn as_tire(&self) -> Option<&TireData> {
        match self {
            SensorPayload::Tire(tire) => Some(tire),
            SensorPayload::Pmu(_) => None,
        }
    }

    /// PMU data, if this is a PMU payload
    pub fn as_pmu(&self) -> Option<&PmuData> {
        match self {
            SensorPayload::Pmu(pmu) => Some(pmu),
            SensorPayload::Tire(_) => None,
        }
    }
}

/// Mutable view of a payload handed to operations
///
/// Fields can be changed through it but the payload cannot be replaced by the
/// other variant, which keeps a record's kind fixed for its whole lifetime.
#[derive(Debug)]
pub enum PayloadMut<'a> {
    Tire(&'a mut TireData),
    Pmu(&'a mut PmuData),
}

impl PayloadMut<'_> {
    /// Kind of sensor behind this view
    pub fn kind(&self) -> SensorKind {
        match self {
            PayloadMut::Tire(_) => SensorKind::Tire,
            PayloadMut::Pmu(_) => SensorKind::PowerManagementUnit,
        }
    }
}

/// Index into an operation table, always in `0..OPERATION_SLOTS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct OperationIndex(u8);

impl OperationIndex {
    /// Slot whose execution marks a record as analyzed
    pub const PERFORMANCE_SCORE: OperationIndex = OperationIndex(3);

    /// Create an index, `None` if it falls outside the table
    pub fn new(slot: usize) -> Option<Self> {
        if slot < OPERATION_SLOTS {
            Some(OperationIndex(slot as u8))
        } else {
            None
        }
    }

    /// Slot position in the table
    pub fn slot(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<i32> for OperationIndex {
    type Error = i32;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(OperationIndex::new)
            .ok_or(value)
    }
}

impl From<OperationIndex> for i32 {
    fn from(index: OperationIndex) -> Self {
        index.0 as i32
    }
}

impl fmt::Display for OperationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One decoded sensor entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    payload: SensorPayload,
    operations: Vec<OperationIndex>,
}

impl SensorRecord {
    /// Create a record from its payload and operation list
    pub fn new(payload: SensorPayload, operations: Vec<OperationIndex>) -> Self {
        Self { payload, operations }
    }

    /// Sensor kind (fixed at creation)
    pub fn kind(&self) -> SensorKind {
        self.payload.kind()
    }

    /// Current payload values
    pub fn payload(&self) -> &SensorPayload {
        &self.payload
    }

    /// Variant-preserving mutable view of the payload
    pub fn payload_mut(&mut self) -> PayloadMut<'_> {
        self.payload.view_mut()
    }

    /// Operation list and payload borrowed together for dispatch
    pub(crate) fn split_mut(&mut self) -> (&[OperationIndex], &mut SensorPayload) {
        (&self.operations, &mut self.payload)
    }

    /// Operation indices in the order they are applied
    pub fn operations(&self) -> &[OperationIndex] {
        &self.operations
    }
}

/// Errors that can occur while decoding or operating on sensor records
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Truncated input at record {record}, field `{field}`")]
    TruncatedInput { record: usize, field: &'static str },

    #[error("Unknown sensor tag {tag} in record {record}")]
    UnknownSensorTag { record: usize, tag: i32 },

    #[error("Invalid {what}: {value}")]
    InvalidCount { what: &'static str, value: i32 },

    #[error("Invalid operation index {value} in record {record} (expected 0..=7)")]
    InvalidOperationIndex { record: usize, value: i32 },

    #[error("Index {index} not in range (collection has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Operation slot {slot} is not set")]
    UnsetOperation { slot: OperationIndex },

    #[error("Allocation failed: {0}")]
    AllocationFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_kind_tags() {
        assert_eq!(SensorKind::from_tag(0), Some(SensorKind::Tire));
        assert_eq!(SensorKind::from_tag(1), Some(SensorKind::PowerManagementUnit));
        assert_eq!(SensorKind::from_tag(2), None);
        assert_eq!(SensorKind::from_tag(-1), None);
        assert_eq!(SensorKind::PowerManagementUnit.tag(), 1);
    }

    #[test]
    fn test_operation_index_bounds() {
        assert_eq!(OperationIndex::try_from(0).map(OperationIndex::slot), Ok(0));
        assert_eq!(OperationIndex::try_from(7).map(OperationIndex::slot), Ok(7));
        assert_eq!(OperationIndex::try_from(8), Err(8));
        assert_eq!(OperationIndex::try_from(-1), Err(-1));
        assert_eq!(OperationIndex::PERFORMANCE_SCORE.slot(), 3);
    }

    #[test]
    fn test_payload_kind_matches_variant() {
        let mut record = SensorRecord::new(SensorPayload::Tire(TireData::default()), vec![]);
        assert_eq!(record.kind(), SensorKind::Tire);

        if let PayloadMut::Tire(tire) = record.payload_mut() {
            tire.pressure = 22.5;
        }
        assert_eq!(record.kind(), SensorKind::Tire);
        assert_eq!(record.payload().as_tire().map(|t| t.pressure), Some(22.5));
        assert!(record.payload().as_pmu().is_none());
    }

    #[test]
    fn test_payload_serializes_with_kind() {
        let payload = SensorPayload::Pmu(PmuData {
            voltage: 12.0,
            ..PmuData::default()
        });
        let json = serde_json::to_value(payload).unwrap();
        assert_eq!(json["kind"], "pmu");
        assert_eq!(json["voltage"], 12.0);
    }
}
