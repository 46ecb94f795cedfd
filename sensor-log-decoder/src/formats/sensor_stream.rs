//! Sensor record stream reader
//!
//! Reads the fixed-width binary layout produced by the sensor logger:
//!
//! ```text
//! i32 record_count
//! record_count times:
//!     i32 sensor_tag                    0 = tire, 1 = power management unit
//!     tire: f32 pressure, f32 temperature, i32 wear_level, i32 performance_score
//!     pmu:  f32 voltage, f32 current, f32 power_consumption, i32 energy_regen, i32 energy_storage
//!     i32 operation_count
//!     operation_count times: i32 operation_index
//! ```
//!
//! There is no padding between fields. Field ranges are not checked here.

use crate::config::StreamByteOrder;
use crate::types::{
    OperationIndex, PmuData, Result, SensorError, SensorKind, SensorPayload, SensorRecord,
    TireData,
};
use byteorder::{BigEndian, LittleEndian, NativeEndian, ReadBytesExt};
use std::io::{self, Read};

/// Record position used when the header itself is truncated
const HEADER: usize = 0;

/// Upper bound on elements reserved up front from a declared count
const MAX_PREALLOCATED: usize = 4096;

/// Decode `n` records from `reader`
///
/// Fails on the first structural problem; a partially decoded stream is
/// never returned.
pub fn decode_records<R: Read>(
    reader: R,
    n: usize,
    byte_order: StreamByteOrder,
) -> Result<Vec<SensorRecord>> {
    SensorStreamReader::new(reader, byte_order).read_records(n)
}

/// Reader over a sensor record stream
pub struct SensorStreamReader<R> {
    reader: R,
    byte_order: StreamByteOrder,
}

impl<R: Read> SensorStreamReader<R> {
    /// Wrap a reader
    pub fn new(reader: R, byte_order: StreamByteOrder) -> Self {
        Self { reader, byte_order }
    }

    /// Read the leading record count
    pub fn read_record_count(&mut self) -> Result<usize> {
        let count = self.read_i32(HEADER, "record_count")?;
        usize::try_from(count).map_err(|_| SensorError::InvalidCount {
            what: "record count",
            value: count,
        })
    }

    /// Read `n` consecutive records
    pub fn read_records(&mut self, n: usize) -> Result<Vec<SensorRecord>> {
        // The declared count is untrusted; grow past the cap only as records arrive
        let mut records = Vec::new();
        let reserve = n.min(MAX_PREALLOCATED);
        records.try_reserve_exact(reserve).map_err(|e| {
            SensorError::AllocationFailure(format!("{} records: {}", reserve, e))
        })?;

        for position in 0..n {
            records.push(self.read_record(position)?);
        }

        log::debug!("Read {} sensor records", records.len());
        Ok(records)
    }

    /// Read a single record; `position` is only used for error reporting
    pub fn read_record(&mut self, position: usize) -> Result<SensorRecord> {
        let tag = self.read_i32(position, "sensor_tag")?;
        let kind = SensorKind::from_tag(tag)
            .ok_or(SensorError::UnknownSensorTag { record: position, tag })?;

        let payload = match kind {
            SensorKind::Tire => SensorPayload::Tire(self.read_tire(position)?),
            SensorKind::PowerManagementUnit => SensorPayload::Pmu(self.read_pmu(position)?),
        };

        let operations = self.read_operations(position)?;

        log::trace!(
            "Record {}: {:?} with {} operation(s)",
            position,
            kind,
            operations.len()
        );

        Ok(SensorRecord::new(payload, operations))
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_tire(&mut self, position: usize) -> Result<TireData> {
        Ok(TireData {
            pressure: self.read_f32(position, "pressure")?,
            temperature: self.read_f32(position, "temperature")?,
            wear_level: self.read_i32(position, "wear_level")?,
            performance_score: self.read_i32(position, "performance_score")?,
        })
    }

    fn read_pmu(&mut self, position: usize) -> Result<PmuData> {
        Ok(PmuData {
            voltage: self.read_f32(position, "voltage")?,
            current: self.read_f32(position, "current")?,
            power_consumption: self.read_f32(position, "power_consumption")?,
            energy_regen: self.read_i32(position, "energy_regen")?,
            energy_storage: self.read_i32(position, "energy_storage")?,
        })
    }

    fn read_operations(&mut self, position: usize) -> Result<Vec<OperationIndex>> {
        let raw_count = self.read_i32(position, "operation_count")?;
        let count = usize::try_from(raw_count).map_err(|_| SensorError::InvalidCount {
            what: "operation count",
            value: raw_count,
        })?;

        let mut operations = Vec::new();
        let reserve = count.min(MAX_PREALLOCATED);
        operations.try_reserve_exact(reserve).map_err(|e| {
            SensorError::AllocationFailure(format!("{} operation indices: {}", reserve, e))
        })?;

        for _ in 0..count {
            let value = self.read_i32(position, "operation_index")?;
            let index = OperationIndex::try_from(value)
                .map_err(|value| SensorError::InvalidOperationIndex { record: position, value })?;
            operations.push(index);
        }

        Ok(operations)
    }

    fn read_i32(&mut self, position: usize, field: &'static str) -> Result<i32> {
        let value = match self.byte_order {
            StreamByteOrder::Native => self.reader.read_i32::<NativeEndian>(),
            StreamByteOrder::Little => self.reader.read_i32::<LittleEndian>(),
            StreamByteOrder::Big => self.reader.read_i32::<BigEndian>(),
        };
        value.map_err(|e| map_read_error(e, position, field))
    }

    fn read_f32(&mut self, position: usize, field: &'static str) -> Result<f32> {
        let value = match self.byte_order {
            StreamByteOrder::Native => self.reader.read_f32::<NativeEndian>(),
            StreamByteOrder::Little => self.reader.read_f32::<LittleEndian>(),
            StreamByteOrder::Big => self.reader.read_f32::<BigEndian>(),
        };
        value.map_err(|e| map_read_error(e, position, field))
    }
}

fn map_read_error(error: io::Error, record: usize, field: &'static str) -> SensorError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        SensorError::TruncatedInput { record, field }
    } else {
        SensorError::Io(error)
    }
}
