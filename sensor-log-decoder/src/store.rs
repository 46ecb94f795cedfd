//! Sensor record store
//!
//! The store owns every decoded record together with its analyzed flag. Records
//! are addressed by 0-based position. Dispatch changes payload fields only;
//! compaction is the only operation that removes records.

use crate::config::UnsetOperationPolicy;
use crate::dispatch::{self, DispatchReport, OperationTable};
use crate::types::{Result, SensorError, SensorRecord};
use crate::validation;
use serde::Serialize;

/// A record and its analyzed flag
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    record: SensorRecord,
    analyzed: bool,
}

impl StoredRecord {
    fn new(record: SensorRecord) -> Self {
        Self {
            record,
            analyzed: false,
        }
    }

    /// The stored record
    pub fn record(&self) -> &SensorRecord {
        &self.record
    }

    /// True once an `analyze` call listed the performance-score slot
    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }
}

/// Owned copy of a stored record, suitable for serialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSnapshot {
    /// Position in the store when the snapshot was taken
    pub index: usize,
    /// Record contents
    #[serde(flatten)]
    pub record: SensorRecord,
    /// Analyzed flag
    pub analyzed: bool,
}

/// Counts from one compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionReport {
    /// Records before compaction
    pub before: usize,
    /// Records that passed validation
    pub retained: usize,
}

impl CompactionReport {
    /// Records dropped by the pass
    pub fn removed(&self) -> usize {
        self.before - self.retained
    }
}

/// Ordered collection of sensor records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorStore {
    entries: Vec<StoredRecord>,
    unset_operation: UnsetOperationPolicy,
}

impl SensorStore {
    /// Build a store from records that are already in priority order
    pub fn new(records: Vec<SensorRecord>) -> Self {
        Self {
            entries: records.into_iter().map(StoredRecord::new).collect(),
            unset_operation: UnsetOperationPolicy::default(),
        }
    }

    /// Builder method: set the unset-slot policy used by `analyze`
    pub fn with_unset_operation(mut self, policy: UnsetOperationPolicy) -> Self {
        self.unset_operation = policy;
        self
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record at `index` with its analyzed flag
    pub fn get(&self, index: usize) -> Result<&StoredRecord> {
        self.entries.get(index).ok_or(SensorError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Owned copy of the record at `index`
    pub fn snapshot(&self, index: usize) -> Result<RecordSnapshot> {
        let entry = self.get(index)?;
        Ok(RecordSnapshot {
            index,
            record: entry.record.clone(),
            analyzed: entry.analyzed,
        })
    }

    /// Iterate over stored records in order
    pub fn iter(&self) -> impl Iterator<Item = &StoredRecord> {
        self.entries.iter()
    }

    /// Apply the operations listed by record `index`
    ///
    /// An out-of-range index fails without touching any record. The analyzed
    /// flag is set when the list contains the performance-score slot and is
    /// never cleared afterwards.
    pub fn analyze(&mut self, index: usize, table: &OperationTable) -> Result<DispatchReport> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(SensorError::IndexOutOfRange { index, len })?;

        let report = dispatch::dispatch(&mut entry.record, table, self.unset_operation)?;
        if report.marked_analyzed {
            entry.analyzed = true;
        }

        log::debug!(
            "Analyzed record {}: {} applied, {} skipped, analyzed={}",
            index,
            report.applied.len(),
            report.skipped.len(),
            entry.analyzed
        );
        Ok(report)
    }

    /// Drop every record whose payload fails range validation
    ///
    /// Survivors keep their relative order and analyzed flag.
    pub fn compact(&mut self) -> CompactionReport {
        let before = self.entries.len();
        self.entries
            .retain(|entry| validation::is_valid(entry.record.payload()));

        let report = CompactionReport {
            before,
            retained: self.entries.len(),
        };
        log::info!(
            "Cleared invalid sensors: {} removed, {} remaining",
            report.removed(),
            report.retained
        );
        report
    }
}
