//! Record rendering
//!
//! Text output follows the sensor report layout operators are used to; JSON
//! output serializes the record snapshot as one object per line. Operation
//! status lines follow the same rule, so a JSON session stays one object per
//! line throughout.

use crate::config::OutputFormat;
use anyhow::Result;
use sensor_log_decoder::{RecordSnapshot, SensorPayload};
use serde::Serialize;
use std::io::Write;

/// Status line emitted by an operation while analyzing a record
#[derive(Debug, Serialize)]
struct OperationLine<'a> {
    index: usize,
    message: &'a str,
}

/// Render one record in the requested format
pub fn render<W: Write>(out: &mut W, snapshot: &RecordSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(out, snapshot),
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, snapshot)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

/// Render the status lines operations produced while analyzing record `index`
pub fn render_messages<W: Write>(
    out: &mut W,
    index: usize,
    messages: &[String],
    format: OutputFormat,
) -> Result<()> {
    for message in messages {
        match format {
            OutputFormat::Text => writeln!(out, "{}", message)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &OperationLine { index, message })?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn render_text<W: Write>(out: &mut W, snapshot: &RecordSnapshot) -> Result<()> {
    let payload = snapshot.record.payload();
    writeln!(out, "{}", payload.kind())?;

    match payload {
        SensorPayload::Tire(tire) => {
            writeln!(out, "Pressure: {:.2}", tire.pressure)?;
            writeln!(out, "Temperature: {:.2}", tire.temperature)?;
            writeln!(out, "Wear Level: {}%", tire.wear_level)?;
            if snapshot.analyzed {
                writeln!(out, "Performance Score: {}", tire.performance_score)?;
            } else {
                writeln!(out, "Performance Score: Not Calculated")?;
            }
        }
        SensorPayload::Pmu(pmu) => {
            writeln!(out, "Voltage: {:.2}", pmu.voltage)?;
            writeln!(out, "Current: {:.2}", pmu.current)?;
            writeln!(out, "Power Consumption: {:.2}", pmu.power_consumption)?;
            writeln!(out, "Energy Regen: {}%", pmu.energy_regen)?;
            writeln!(out, "Energy Storage: {}%", pmu.energy_storage)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_log_decoder::{PmuData, SensorRecord, TireData};

    fn snapshot(payload: SensorPayload, analyzed: bool) -> RecordSnapshot {
        RecordSnapshot {
            index: 0,
            record: SensorRecord::new(payload, vec![]),
            analyzed,
        }
    }

    fn render_to_string(snapshot: &RecordSnapshot, format: OutputFormat) -> String {
        let mut out = Vec::new();
        render(&mut out, snapshot, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tire_text() {
        let tire = SensorPayload::Tire(TireData {
            pressure: 25.0,
            temperature: 40.5,
            wear_level: 10,
            performance_score: 7,
        });

        assert_eq!(
            render_to_string(&snapshot(tire, false), OutputFormat::Text),
            "Tire Sensor\nPressure: 25.00\nTemperature: 40.50\nWear Level: 10%\nPerformance Score: Not Calculated\n"
        );
        assert!(render_to_string(&snapshot(tire, true), OutputFormat::Text)
            .ends_with("Performance Score: 7\n"));
    }

    #[test]
    fn test_pmu_text() {
        let pmu = SensorPayload::Pmu(PmuData {
            voltage: 15.0,
            current: -5.25,
            power_consumption: 50.0,
            energy_regen: 10,
            energy_storage: 20,
        });

        assert_eq!(
            render_to_string(&snapshot(pmu, false), OutputFormat::Text),
            "Power Management Unit\nVoltage: 15.00\nCurrent: -5.25\nPower Consumption: 50.00\nEnergy Regen: 10%\nEnergy Storage: 20%\n"
        );
    }

    #[test]
    fn test_operation_messages() {
        let messages = vec!["Tire is new.".to_string(), "Performance score: 9".to_string()];

        let mut out = Vec::new();
        render_messages(&mut out, 2, &messages, OutputFormat::Text).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Tire is new.\nPerformance score: 9\n");

        let mut out = Vec::new();
        render_messages(&mut out, 2, &messages, OutputFormat::Json).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"index\":2,\"message\":\"Tire is new.\"}\n{\"index\":2,\"message\":\"Performance score: 9\"}\n"
        );
    }

    #[test]
    fn test_json_line() {
        let pmu = SensorPayload::Pmu(PmuData::default());
        let line = render_to_string(&snapshot(pmu, true), OutputFormat::Json);

        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["payload"]["kind"], "pmu");
        assert_eq!(value["analyzed"], true);
    }
}
