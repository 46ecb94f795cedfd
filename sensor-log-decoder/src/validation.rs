//! Sensor range validation
//!
//! Each payload kind has a fixed set of inclusive operating ranges. A record is
//! valid only if every checked field lies inside its range; NaN never does.
//! `performance_score` is derived data and is not checked.

use crate::types::{PmuData, SensorPayload, TireData};
use std::ops::RangeInclusive;

/// Tire pressure range in psi
pub const TIRE_PRESSURE: RangeInclusive<f32> = 19.0..=28.0;
/// Tire temperature range in °C
pub const TIRE_TEMPERATURE: RangeInclusive<f32> = 0.0..=120.0;
/// Tire wear level range in percent
pub const TIRE_WEAR_LEVEL: RangeInclusive<i32> = 0..=100;

/// PMU voltage range in volts
pub const PMU_VOLTAGE: RangeInclusive<f32> = 10.0..=20.0;
/// PMU current range in amperes
pub const PMU_CURRENT: RangeInclusive<f32> = -100.0..=100.0;
/// PMU power consumption range in kW
pub const PMU_POWER_CONSUMPTION: RangeInclusive<f32> = 0.0..=1000.0;
/// PMU regenerated energy range in percent
pub const PMU_ENERGY_REGEN: RangeInclusive<i32> = 0..=100;
/// PMU stored energy range in percent
pub const PMU_ENERGY_STORAGE: RangeInclusive<i32> = 0..=100;

/// Check a payload against the ranges of its kind
pub fn is_valid(payload: &SensorPayload) -> bool {
    match payload {
        SensorPayload::Tire(tire) => is_valid_tire(tire),
        SensorPayload::Pmu(pmu) => is_valid_pmu(pmu),
    }
}

/// Check tire readings
pub fn is_valid_tire(tire: &TireData) -> bool {
    TIRE_PRESSURE.contains(&tire.pressure)
        && TIRE_TEMPERATURE.contains(&tire.temperature)
        && TIRE_WEAR_LEVEL.contains(&tire.wear_level)
}

/// Check power management unit readings
pub fn is_valid_pmu(pmu: &PmuData) -> bool {
    PMU_VOLTAGE.contains(&pmu.voltage)
        && PMU_CURRENT.contains(&pmu.current)
        && PMU_POWER_CONSUMPTION.contains(&pmu.power_consumption)
        && PMU_ENERGY_REGEN.contains(&pmu.energy_regen)
        && PMU_ENERGY_STORAGE.contains(&pmu.energy_storage)
}
