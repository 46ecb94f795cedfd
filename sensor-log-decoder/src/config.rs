//! Decoder configuration types
//!
//! This module defines the small set of knobs the library exposes: how the
//! binary stream's multi-byte fields are ordered, and what dispatch does when
//! a record lists an operation slot that the table leaves empty.

use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Byte order of the input stream (default: host order)
    #[serde(default)]
    pub byte_order: StreamByteOrder,

    /// Behaviour when a listed operation slot is empty (default: skip)
    #[serde(default)]
    pub unset_operation: UnsetOperationPolicy,
}

/// Byte order of integer and float fields in the input stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamByteOrder {
    /// Order of the machine running the decoder
    #[default]
    Native,
    /// Little-endian
    Little,
    /// Big-endian
    Big,
}

/// What dispatch does with an index whose table slot is empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsetOperationPolicy {
    /// Skip the slot, log a warning and report it in the dispatch report
    #[default]
    Skip,
    /// Fail the whole dispatch before any operation runs
    Error,
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the stream byte order
    pub fn with_byte_order(mut self, byte_order: StreamByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Builder method: set the unset-slot policy
    pub fn with_unset_operation(mut self, policy: UnsetOperationPolicy) -> Self {
        self.unset_operation = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_config_builder() {
        let config = DecoderConfig::new()
            .with_byte_order(StreamByteOrder::Big)
            .with_unset_operation(UnsetOperationPolicy::Error);

        assert_eq!(config.byte_order, StreamByteOrder::Big);
        assert_eq!(config.unset_operation, UnsetOperationPolicy::Error);
    }

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::new();
        assert_eq!(config.byte_order, StreamByteOrder::Native);
        assert_eq!(config.unset_operation, UnsetOperationPolicy::Skip);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DecoderConfig = serde_json::from_str(r#"{ "byte_order": "little" }"#).unwrap();
        assert_eq!(config.byte_order, StreamByteOrder::Little);
        assert_eq!(config.unset_operation, UnsetOperationPolicy::Skip);
    }
}
