//! Rendering a dosage as text.
//!
//! A `Report` pairs an input with its derived values and renders them as
//! a labelled table, JSON, or CSV. Non-finite numbers never abort
//! rendering: the table shows `n/a`, JSON `null`, CSV an empty cell.

use crate::{calculate, compute, DosageInput, DosageOutput, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places in the table view
pub const TABLE_DECIMALS: usize = 3;

/// Footer printed under every table
pub const DISCLAIMER: &str = "Ich übernehme keinerlei Verantwortung für die korrekte Dosierung \
    von Medikamenten. Medikamente und deren Dosierung sollten genau überprüft und von einem \
    Tierarzt verordnet werden.";

/// Output format
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Format::Table),
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => Err(format!("unknown format '{}' (expected table, json or csv)", other)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Table => "table",
            Format::Json => "json",
            Format::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// An input with its derived values and, if any, why it is not usable
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub input: DosageInput,
    /// `None` only when the chain could not be evaluated at all
    pub output: Option<DosageOutput>,
    /// Validation failure of the checked calculation
    pub problem: Option<String>,
}

impl Report {
    /// Evaluate `input`, recording (not failing on) degenerate values
    pub fn new(input: DosageInput) -> Self {
        let output = compute(&input).ok();
        let problem = calculate(&input).err().map(|e| e.to_string());
        if let Some(ref p) = problem {
            tracing::warn!("Dosage input is not usable: {}", p);
        }
        Self {
            input,
            output,
            problem,
        }
    }

    /// Evaluate `input`, failing on degenerate values
    pub fn checked(input: DosageInput) -> Result<Self> {
        let output = calculate(&input)?;
        Ok(Self {
            input,
            output: Some(output),
            problem: None,
        })
    }

    pub fn render(&self, format: Format) -> Result<String> {
        match format {
            Format::Table => Ok(self.to_table()),
            Format::Json => self.to_json(),
            Format::Csv => self.to_csv(),
        }
    }

    /// Labelled two-column table, inputs first
    pub fn to_table(&self) -> String {
        let mut rows: Vec<(&str, String)> = self
            .input
            .values()
            .map(|(field, value)| (field.label(), format_value(value)))
            .collect();
        let split = rows.len();

        if let Some(ref output) = self.output {
            rows.extend(
                output
                    .reported()
                    .map(|(quantity, value)| (quantity.label(), format_value(value))),
            );
        }

        let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        let mut out = String::new();
        for (i, (label, value)) in rows.iter().enumerate() {
            if i == split {
                out.push_str(&"─".repeat(label_width + value_width + 2));
                out.push('\n');
            }
            out.push_str(&format!(
                "{:<lw$}  {:>vw$}\n",
                label,
                value,
                lw = label_width,
                vw = value_width
            ));
        }

        if self.output.is_none() {
            out.push_str("(keine Berechnung möglich)\n");
        }
        if let Some(ref problem) = self.problem {
            out.push_str(&format!("Achtung: {}\n", problem));
        }
        out.push('\n');
        out.push_str(DISCLAIMER);
        out.push('\n');
        out
    }

    /// Pretty JSON; non-finite numbers become `null`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `section,key,label,value,unit` rows, inputs first
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        for (field, value) in self.input.values() {
            writer.serialize(CsvRow {
                section: "input",
                key: field.key(),
                label: field.label(),
                value: finite(value),
                unit: field.unit(),
            })?;
        }

        if let Some(ref output) = self.output {
            for (quantity, value) in output.reported() {
                writer.serialize(CsvRow {
                    section: "output",
                    key: quantity.key(),
                    label: quantity.label(),
                    value: finite(value),
                    unit: quantity.unit(),
                })?;
            }
        }

        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

/// A row in the CSV output
#[derive(Debug, Serialize)]
struct CsvRow {
    section: &'static str,
    key: &'static str,
    label: &'static str,
    value: Option<f64>,
    unit: &'static str,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Fixed-point with three decimals, `n/a` for NaN and infinities
pub fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.*}", TABLE_DECIMALS, value)
    } else {
        "n/a".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.98), "0.980");
        assert_eq!(format_value(2.8000000000000003), "2.800");
        assert_eq!(format_value(f64::NAN), "n/a");
        assert_eq!(format_value(f64::INFINITY), "n/a");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("table".parse::<Format>().unwrap(), Format::Table);
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_table_lists_inputs_and_outputs() {
        let table = Report::new(DosageInput::default()).to_table();

        assert!(table.contains("Konzentration [mg/ml]"));
        assert!(table.contains("100.000"));
        assert!(table.contains("Gesamtmenge Medikament [ml]"));
        assert!(table.contains("0.980"));
        assert!(table.contains("1.820"));
        assert!(table.contains("35.000"));
        assert!(!table.contains("Achtung"));
    }

    #[test]
    fn test_table_carries_label_hint_and_disclaimer() {
        let table = Report::new(DosageInput::default()).to_table();

        assert!(table.contains("in der Spritze gut dosiert werden kann) [ml]"));
        assert!(table.trim_end().ends_with(DISCLAIMER));
        assert!(table.contains("von einem Tierarzt verordnet werden."));
    }

    #[test]
    fn test_table_marks_degenerate_input() {
        let input = DosageInput {
            concentration_mg_ml: 0.0,
            ..Default::default()
        };
        let report = Report::new(input);
        assert!(report.problem.is_some());

        let table = report.to_table();
        assert!(table.contains("n/a"));
        assert!(table.contains("Achtung"));
    }

    #[test]
    fn test_zero_min_dose_has_no_output() {
        let input = DosageInput {
            min_daily_dose_ml: 0.0,
            ..Default::default()
        };
        let report = Report::new(input);
        assert!(report.output.is_none());
        assert!(report.to_table().contains("keine Berechnung"));
        assert!(Report::checked(input).is_err());
    }

    #[test]
    fn test_json_nulls_non_finite() {
        let input = DosageInput {
            concentration_mg_ml: 0.0,
            ..Default::default()
        };
        let json = Report::new(input).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["output"]["daily_dose_ml_kgw"].is_null());
        assert_eq!(value["input"]["weight_g"], 350.0);
        assert!(value["problem"].is_string());
    }

    #[test]
    fn test_csv_rows() {
        let csv = Report::new(DosageInput::default()).to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "section,key,label,value,unit");
        assert_eq!(lines.len(), 1 + 5 + 6);
        assert!(lines[1].starts_with("input,concentration_mg_ml,"));
        assert!(lines[6].starts_with("output,total_treatment_amount_medication_ml,"));
    }
}
