//! Built-in operation table
//!
//! Slots 0-3 work on tire sensors, slots 4-7 on power management units. An
//! operation handed the other kind of payload leaves it untouched.
//!
//! Operations do not write to stdout. Their status lines go to an
//! [`OperationMessages`] sink that the session drains into its own output.

use sensor_log_decoder::{Operation, OperationIndex, OperationTable, PayloadMut, PmuData, TireData};
use std::cell::RefCell;
use std::rc::Rc;

/// Status lines produced by operations, shared between the table and its reader
#[derive(Debug, Clone, Default)]
pub struct OperationMessages(Rc<RefCell<Vec<String>>>);

impl OperationMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        self.0.borrow_mut().push(message.into());
    }

    /// Take every pending message, oldest first
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

type BuiltinFn = fn(PayloadMut<'_>, &OperationMessages);

/// A named operation backed by a plain function
struct Builtin {
    name: &'static str,
    run: BuiltinFn,
    messages: OperationMessages,
}

impl Operation for Builtin {
    fn apply(&self, payload: PayloadMut<'_>) {
        (self.run)(payload, &self.messages)
    }

    fn name(&self) -> &str {
        self.name
    }
}

const BUILTINS: [(&str, BuiltinFn); 8] = [
    ("tire_pressure_status", tire_pressure_status),
    ("tire_temperature_status", tire_temperature_status),
    ("tire_wear_level_status", tire_wear_level_status),
    ("tire_performance_score", tire_performance_score),
    ("pmu_compute_power", pmu_compute_power),
    ("pmu_regenerate_energy", pmu_regenerate_energy),
    ("pmu_get_energy_usage", pmu_get_energy_usage),
    ("pmu_is_battery_healthy", pmu_is_battery_healthy),
];

/// Table with all eight built-in operations, reporting into `messages`
pub fn builtin_table(messages: &OperationMessages) -> OperationTable {
    let mut table = OperationTable::new();
    for (slot, (name, run)) in BUILTINS.into_iter().enumerate() {
        if let Some(index) = OperationIndex::new(slot) {
            table.set(
                index,
                Builtin {
                    name,
                    run,
                    messages: messages.clone(),
                },
            );
        }
    }
    table
}

fn on_tire(name: &str, payload: PayloadMut<'_>, f: impl FnOnce(&mut TireData)) {
    match payload {
        PayloadMut::Tire(tire) => f(tire),
        other => log::debug!("{} does not apply to {:?}", name, other.kind()),
    }
}

fn on_pmu(name: &str, payload: PayloadMut<'_>, f: impl FnOnce(&mut PmuData)) {
    match payload {
        PayloadMut::Pmu(pmu) => f(pmu),
        other => log::debug!("{} does not apply to {:?}", name, other.kind()),
    }
}

fn tire_pressure_status(payload: PayloadMut<'_>, out: &OperationMessages) {
    on_tire("tire_pressure_status", payload, |tire| {
        let p = tire.pressure;
        if (21.0..=26.0).contains(&p) {
            out.push("Tire has normal pressure.");
        } else if p > 26.0 && p <= 28.0 {
            out.push("Tire has high pressure.");
        } else if (19.0..21.0).contains(&p) {
            out.push("Tire has low pressure.");
        } else {
            out.push("Tire has abnormal pressure!");
        }
    });
}

fn tire_temperature_status(payload: PayloadMut<'_>, out: &OperationMessages) {
    on_tire("tire_temperature_status", payload, |tire| {
        let t = tire.temperature;
        if (0.0..20.0).contains(&t) {
            out.push("Tire temperature is low.");
        } else if (20.0..=90.0).contains(&t) {
            out.push("Tire has normal temperature.");
        } else if t > 90.0 && t <= 120.0 {
            out.push("Tire temperature is high.");
        } else {
            out.push("Tire has abnormal temperature!");
        }
    });
}

fn tire_wear_level_status(payload: PayloadMut<'_>, out: &OperationMessages) {
    on_tire("tire_wear_level_status", payload, |tire| match tire.wear_level {
        0..=20 => out.push("Tire is new."),
        21..=60 => out.push("Tire is used."),
        61..=100 => out.push("Tire is worn out, replace it."),
        _ => out.push("Tire has abnormal wear level!"),
    });
}

fn tire_performance_score(payload: PayloadMut<'_>, out: &OperationMessages) {
    on_tire("tire_performance_score", payload, |tire| {
        tire.performance_score = performance_score(tire);
        out.push(format!("Performance score: {}", tire.performance_score));
    });
}

/// Score in `1..=10` from pressure, temperature and wear
fn performance_score(tire: &TireData) -> i32 {
    let mut score = 5;

    score += if (21.0..=26.0).contains(&tire.pressure) {
        3
    } else if (19.0..=28.0).contains(&tire.pressure) {
        1
    } else {
        -2
    };

    score += if (20.0..=90.0).contains(&tire.temperature) {
        2
    } else if (0.0..=120.0).contains(&tire.temperature) {
        0
    } else {
        -2
    };

    score += match tire.wear_level {
        0..=20 => 2,
        21..=60 => 0,
        _ => -3,
    };

    score.clamp(1, 10)
}

fn pmu_compute_power(payload: PayloadMut<'_>, out: &OperationMessages) {
    on_pmu("pmu_compute_power", payload, |pmu| {
        out.push(format!("Power output: {:.2} W.", pmu.voltage * pmu.current));
    });
}

fn pmu_regenerate_energy(payload: PayloadMut<'_>, out: &OperationMessages) {
    on_pmu("pmu_regenerate_energy", payload, |pmu| {
        pmu.energy_storage = (pmu.energy_storage + pmu.energy_regen).min(100);
        pmu.energy_regen = 0;
        out.push(format!("Energy storage: {}%.", pmu.energy_storage));
    });
}

fn pmu_get_energy_usage(payload: PayloadMut<'_>, out: &OperationMessages) {
    on_pmu("pmu_get_energy_usage", payload, |pmu| {
        out.push(format!("Energy usage: {:.2} kW.", pmu.power_consumption * pmu.current));
    });
}

fn pmu_is_battery_healthy(payload: PayloadMut<'_>, out: &OperationMessages) {
    on_pmu("pmu_is_battery_healthy", payload, |pmu| {
        if (25..=100).contains(&pmu.energy_storage) {
            out.push("Battery is healthy.");
        } else {
            out.push("Battery needs charging.");
        }
    });
}
