//! Operation dispatch
//!
//! A record carries a list of operation indices. Dispatch resolves each index
//! against an eight-slot `OperationTable` and applies the operations to the
//! record's payload in listed order. Duplicate indices run the operation again.
//!
//! Listing index 3 (`OperationIndex::PERFORMANCE_SCORE`) marks the record as
//! analyzed. The mark does not depend on the record's kind.

use crate::config::UnsetOperationPolicy;
use crate::types::{OperationIndex, PayloadMut, Result, SensorError, SensorRecord, OPERATION_SLOTS};
use std::fmt;

/// A transformation over a single payload
///
/// Implemented for every `Fn(PayloadMut<'_>)`, so closures can be placed in a
/// table directly. The payload borrow ends when `apply` returns.
pub trait Operation {
    /// Apply the operation to one payload
    fn apply(&self, payload: PayloadMut<'_>);

    /// Name used in log output
    fn name(&self) -> &str {
        "anonymous"
    }
}

impl<F> Operation for F
where
    F: Fn(PayloadMut<'_>),
{
    fn apply(&self, payload: PayloadMut<'_>) {
        self(payload)
    }
}

/// Fixed table of eight optional operations addressed by `OperationIndex`
#[derive(Default)]
pub struct OperationTable {
    slots: [Option<Box<dyn Operation>>; OPERATION_SLOTS],
}

impl OperationTable {
    /// Create a table with every slot empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: fill a slot
    pub fn with_operation(mut self, slot: OperationIndex, operation: impl Operation + 'static) -> Self {
        self.set(slot, operation);
        self
    }

    /// Fill a slot, replacing any previous operation
    pub fn set(&mut self, slot: OperationIndex, operation: impl Operation + 'static) {
        self.slots[slot.slot()] = Some(Box::new(operation));
    }

    /// Empty a slot
    pub fn clear(&mut self, slot: OperationIndex) {
        self.slots[slot.slot()] = None;
    }

    /// Operation in a slot, if set
    pub fn get(&self, slot: OperationIndex) -> Option<&dyn Operation> {
        self.slots[slot.slot()].as_deref()
    }

    /// Number of filled slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True if no slot is filled
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for OperationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| slot.as_ref().map(|op| op.name())))
            .finish()
    }
}

/// Outcome of one dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Indices whose operation ran, in order
    pub applied: Vec<OperationIndex>,
    /// Indices whose slot was empty, in order
    pub skipped: Vec<OperationIndex>,
    /// True if the listed indices included the performance-score slot
    pub marked_analyzed: bool,
}

/// Apply a record's listed operations to its payload
///
/// Under `UnsetOperationPolicy::Error` every listed slot is checked before
/// anything runs, so a failing call leaves the payload untouched.
pub fn dispatch(
    record: &mut SensorRecord,
    table: &OperationTable,
    policy: UnsetOperationPolicy,
) -> Result<DispatchReport> {
    let (operations, payload) = record.split_mut();

    if policy == UnsetOperationPolicy::Error {
        if let Some(slot) = operations.iter().copied().find(|op| table.get(*op).is_none()) {
            return Err(SensorError::UnsetOperation { slot });
        }
    }

    let mut report = DispatchReport::default();
    for &index in operations {
        match table.get(index) {
            Some(operation) => {
                log::trace!("Applying operation {} ({})", index, operation.name());
                operation.apply(payload.view_mut());
                report.applied.push(index);
            }
            None => {
                log::warn!("Operation slot {} is not set, skipping", index);
                report.skipped.push(index);
            }
        }

        if index == OperationIndex::PERFORMANCE_SCORE {
            report.marked_analyzed = true;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PmuData, SensorPayload, TireData};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn op(slot: usize) -> OperationIndex {
        OperationIndex::new(slot).unwrap()
    }

    fn tire_record(operations: &[usize]) -> SensorRecord {
        SensorRecord::new(
            SensorPayload::Tire(TireData {
                pressure: 20.0,
                temperature: 30.0,
                wear_level: 10,
                performance_score: 0,
            }),
            operations.iter().map(|slot| op(*slot)).collect(),
        )
    }

    fn counting_table() -> OperationTable {
        let mut table = OperationTable::new();
        table.set(op(0), |payload: PayloadMut<'_>| {
            if let PayloadMut::Tire(tire) = payload {
                tire.pressure += 1.0;
            }
        });
        table.set(op(1), |payload: PayloadMut<'_>| {
            if let PayloadMut::Tire(tire) = payload {
                tire.pressure *= 2.0;
            }
        });
        table.set(op(3), |payload: PayloadMut<'_>| {
            if let PayloadMut::Tire(tire) = payload {
                tire.performance_score = 7;
            }
        });
        table
    }

    #[test]
    fn test_operations_run_in_listed_order() {
        let table = counting_table();

        let mut add_then_double = tire_record(&[0, 1]);
        dispatch(&mut add_then_double, &table, UnsetOperationPolicy::Skip).unwrap();
        assert_eq!(add_then_double.payload().as_tire().unwrap().pressure, 42.0);

        let mut double_then_add = tire_record(&[1, 0]);
        dispatch(&mut double_then_add, &table, UnsetOperationPolicy::Skip).unwrap();
        assert_eq!(double_then_add.payload().as_tire().unwrap().pressure, 41.0);
    }

    #[test]
    fn test_duplicates_reapply() {
        let table = counting_table();
        let mut record = tire_record(&[0, 0, 0]);
        let report = dispatch(&mut record, &table, UnsetOperationPolicy::Skip).unwrap();

        assert_eq!(record.payload().as_tire().unwrap().pressure, 23.0);
        assert_eq!(report.applied, vec![op(0), op(0), op(0)]);
    }

    #[test]
    fn test_deterministic_on_identical_payloads() {
        let table = counting_table();
        let mut first = tire_record(&[1, 0, 3, 0]);
        let mut second = first.clone();

        dispatch(&mut first, &table, UnsetOperationPolicy::Skip).unwrap();
        dispatch(&mut second, &table, UnsetOperationPolicy::Skip).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_performance_score_slot_marks_any_kind() {
        let table = counting_table();
        let mut pmu = SensorRecord::new(SensorPayload::Pmu(PmuData::default()), vec![op(3)]);

        let report = dispatch(&mut pmu, &table, UnsetOperationPolicy::Skip).unwrap();
        assert!(report.marked_analyzed);
        assert_eq!(pmu.payload(), &SensorPayload::Pmu(PmuData::default()));

        let mut tire = tire_record(&[0, 1]);
        let report = dispatch(&mut tire, &table, UnsetOperationPolicy::Skip).unwrap();
        assert!(!report.marked_analyzed);
    }

    #[test]
    fn test_unset_slot_skipped() {
        let table = counting_table();
        let mut record = tire_record(&[5, 0, 6]);
        let report = dispatch(&mut record, &table, UnsetOperationPolicy::Skip).unwrap();

        assert_eq!(report.applied, vec![op(0)]);
        assert_eq!(report.skipped, vec![op(5), op(6)]);
        assert_eq!(record.payload().as_tire().unwrap().pressure, 21.0);
    }

    #[test]
    fn test_unset_slot_error_leaves_payload_untouched() {
        let table = counting_table();
        let mut record = tire_record(&[0, 1, 5]);
        let before = record.clone();

        match dispatch(&mut record, &table, UnsetOperationPolicy::Error) {
            Err(SensorError::UnsetOperation { slot }) => assert_eq!(slot, op(5)),
            other => panic!("expected unset operation error, got {:?}", other),
        }
        assert_eq!(record, before);
    }

    #[test]
    fn test_unset_performance_slot_still_marks() {
        let table = OperationTable::new();
        let mut record = tire_record(&[3]);
        let report = dispatch(&mut record, &table, UnsetOperationPolicy::Skip).unwrap();

        assert!(report.marked_analyzed);
        assert_eq!(report.skipped, vec![op(3)]);
    }

    #[test]
    fn test_table_slots() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&calls);
        let mut table = OperationTable::new().with_operation(op(7), move |payload: PayloadMut<'_>| {
            seen.borrow_mut().push(payload.kind());
        });

        assert_eq!(table.len(), 1);
        assert!(table.get(op(7)).is_some());
        assert!(table.get(op(6)).is_none());

        let mut record = SensorRecord::new(SensorPayload::Pmu(PmuData::default()), vec![op(7), op(7)]);
        dispatch(&mut record, &table, UnsetOperationPolicy::Skip).unwrap();
        assert_eq!(calls.borrow().len(), 2);

        table.clear(op(7));
        assert!(table.is_empty());
    }
}
