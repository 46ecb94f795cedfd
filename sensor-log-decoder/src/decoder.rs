//! Main decoder API
//!
//! This module provides the primary interface for the decoder library.
//! The Decoder struct reads a complete sensor stream, applies the priority
//! reorder and hands back a ready-to-use `SensorStore`.

use crate::config::DecoderConfig;
use crate::formats::SensorStreamReader;
use crate::reorder::reorder;
use crate::store::SensorStore;
use crate::types::{Result, SensorError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// The main decoder struct - entry point for loading sensor streams
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a sensor stream file into a store
    ///
    /// # Arguments
    /// * `path` - Path to the binary sensor stream
    ///
    /// # Example
    /// ```no_run
    /// use sensor_log_decoder::Decoder;
    /// use std::path::Path;
    ///
    /// let decoder = Decoder::new();
    /// let store = decoder.decode_file(Path::new("sensors.dat")).unwrap();
    /// println!("{} sensors loaded", store.len());
    /// ```
    pub fn decode_file(&self, path: &Path) -> Result<SensorStore> {
        log::info!("Decoding sensor stream: {:?}", path);

        let file = File::open(path)?;
        let store = self.decode_reader(BufReader::new(file))?;

        log::info!("Loaded {} sensors from {:?}", store.len(), path);
        Ok(store)
    }

    /// Decode a complete stream (count header followed by records)
    ///
    /// Records are reordered by priority before the store is returned. Any
    /// decode error aborts the whole load.
    pub fn decode_reader<R: Read>(&self, reader: R) -> Result<SensorStore> {
        let mut stream = SensorStreamReader::new(reader, self.config.byte_order);

        let count = stream.read_record_count()?;
        log::debug!("Stream declares {} records", count);

        let records = stream.read_records(count)?;
        let records = reorder(records);

        let mut rest = stream.into_inner();
        let mut probe = [0u8; 1];
        match rest.read(&mut probe) {
            Ok(0) => {}
            Ok(_) => log::warn!("Ignoring trailing bytes after {} records", count),
            Err(e) => return Err(SensorError::Io(e)),
        }

        Ok(SensorStore::new(records).with_unset_operation(self.config.unset_operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamByteOrder;
    use crate::types::SensorKind;
    use byteorder::{LittleEndian, WriteBytesExt};

    fn stream(kinds: &[i32]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_i32::<LittleEndian>(kinds.len() as i32).unwrap();
        for (i, kind) in kinds.iter().enumerate() {
            buf.write_i32::<LittleEndian>(*kind).unwrap();
            if *kind == 0 {
                buf.write_f32::<LittleEndian>(20.0 + i as f32).unwrap();
                buf.write_f32::<LittleEndian>(40.0).unwrap();
                buf.write_i32::<LittleEndian>(10).unwrap();
                buf.write_i32::<LittleEndian>(0).unwrap();
            } else {
                buf.write_f32::<LittleEndian>(10.0 + i as f32).unwrap();
                buf.write_f32::<LittleEndian>(1.0).unwrap();
                buf.write_f32::<LittleEndian>(2.0).unwrap();
                buf.write_i32::<LittleEndian>(3).unwrap();
                buf.write_i32::<LittleEndian>(4).unwrap();
            }
            buf.write_i32::<LittleEndian>(0).unwrap();
        }
        buf
    }

    fn little_endian_decoder() -> Decoder {
        Decoder::with_config(DecoderConfig::new().with_byte_order(StreamByteOrder::Little))
    }

    #[test]
    fn test_decode_reorders_by_priority() {
        let bytes = stream(&[0, 1, 0, 1]);
        let store = little_endian_decoder().decode_reader(bytes.as_slice()).unwrap();

        let kinds: Vec<SensorKind> = store.iter().map(|e| e.record().kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SensorKind::PowerManagementUnit,
                SensorKind::PowerManagementUnit,
                SensorKind::Tire,
                SensorKind::Tire
            ]
        );
        // PMU from stream position 1 stays ahead of the one from position 3
        assert_eq!(store.get(0).unwrap().record().payload().as_pmu().unwrap().voltage, 11.0);
        assert_eq!(store.get(2).unwrap().record().payload().as_tire().unwrap().pressure, 20.0);
        assert!(store.iter().all(|e| !e.is_analyzed()));
    }

    #[test]
    fn test_zero_records() {
        let bytes = 0i32.to_le_bytes();
        let store = little_endian_decoder().decode_reader(&bytes[..]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = stream(&[1]);
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        let store = little_endian_decoder().decode_reader(bytes.as_slice()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_header_larger_than_body() {
        let mut bytes = 200_000_000i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&1i32.to_le_bytes());

        let result = little_endian_decoder().decode_reader(bytes.as_slice());
        assert!(matches!(
            result,
            Err(SensorError::TruncatedInput { record: 0, field: "voltage" })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = Decoder::new().decode_file(Path::new("nonexistent.dat"));
        assert!(matches!(result, Err(SensorError::Io(_))));
    }
}
