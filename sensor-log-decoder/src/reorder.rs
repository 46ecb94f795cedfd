//! Priority reordering
//!
//! Power management units are served before tire sensors. The reorder is a
//! stable partition by class, not a comparison sort: there is no secondary key
//! and records of the same class keep their stream order.

use crate::types::{SensorKind, SensorRecord};

/// Move every PMU record ahead of every tire record, keeping relative order
/// inside each class
pub fn reorder(records: Vec<SensorRecord>) -> Vec<SensorRecord> {
    let (mut ordered, tires): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|record| record.kind() == SensorKind::PowerManagementUnit);

    log::debug!(
        "Reordered sensors: {} PMU first, then {} tire",
        ordered.len(),
        tires.len()
    );

    ordered.extend(tires);
    ordered
}
