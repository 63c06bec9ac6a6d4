//! Core domain types for Dosemix.
//!
//! This module defines:
//! - The five input fields and their metadata (query key, unit, label)
//! - The input record and its validity rules
//! - The derived output record and the quantities reported to users

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Input Fields
// ============================================================================

/// One of the five user-supplied measurements
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    ConcentrationMgMl,
    DailyDoseMgKgw,
    WeightG,
    TreatmentLengthDays,
    MinDailyDoseMl,
}

impl Field {
    /// All fields in their stable order (form order and query order)
    pub const ALL: [Field; 5] = [
        Field::ConcentrationMgMl,
        Field::DailyDoseMgKgw,
        Field::WeightG,
        Field::TreatmentLengthDays,
        Field::MinDailyDoseMl,
    ];

    /// Query-string key for this field
    pub fn key(self) -> &'static str {
        match self {
            Field::ConcentrationMgMl => "concentration_mg_ml",
            Field::DailyDoseMgKgw => "daily_dose_mg_kgw",
            Field::WeightG => "weight_g",
            Field::TreatmentLengthDays => "treatment_length_days",
            Field::MinDailyDoseMl => "min_daily_dose_ml",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn unit(self) -> &'static str {
        match self {
            Field::ConcentrationMgMl => "mg/ml",
            Field::DailyDoseMgKgw => "mg/kg",
            Field::WeightG => "g",
            Field::TreatmentLengthDays => "days",
            Field::MinDailyDoseMl => "ml",
        }
    }

    /// Form label shown next to the value
    pub fn label(self) -> &'static str {
        match self {
            Field::ConcentrationMgMl => "Konzentration [mg/ml]",
            Field::DailyDoseMgKgw => "Tagesdosis in mg pro kg Gewicht [mg/KGW]",
            Field::WeightG => "Gewicht des Tieres [g]",
            Field::TreatmentLengthDays => "Behandlungslänge [Tage]",
            Field::MinDailyDoseMl => {
                "Mindesttagesdosierung Gemisch (z.B. die Mindestmenge pro Tag die in der \
                 Spritze gut dosiert werden kann) [ml]"
            }
        }
    }

    /// Read this field from an input record
    pub fn get(self, input: &DosageInput) -> f64 {
        match self {
            Field::ConcentrationMgMl => input.concentration_mg_ml,
            Field::DailyDoseMgKgw => input.daily_dose_mg_kgw,
            Field::WeightG => input.weight_g,
            Field::TreatmentLengthDays => input.treatment_length_days,
            Field::MinDailyDoseMl => input.min_daily_dose_ml,
        }
    }

    /// Write this field on an input record
    pub fn set(self, input: &mut DosageInput, value: f64) {
        let slot = match self {
            Field::ConcentrationMgMl => &mut input.concentration_mg_ml,
            Field::DailyDoseMgKgw => &mut input.daily_dose_mg_kgw,
            Field::WeightG => &mut input.weight_g,
            Field::TreatmentLengthDays => &mut input.treatment_length_days,
            Field::MinDailyDoseMl => &mut input.min_daily_dose_ml,
        };
        *slot = value;
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Input Record
// ============================================================================

/// The five measurements a dosage is computed from
///
/// Defaults are the values for a Baytril 10% solution mixed roughly 1:1
/// with fruit juice for a 350 g rat.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DosageInput {
    pub concentration_mg_ml: f64,
    pub daily_dose_mg_kgw: f64,
    pub weight_g: f64,
    pub treatment_length_days: f64,
    pub min_daily_dose_ml: f64,
}

impl Default for DosageInput {
    fn default() -> Self {
        Self {
            concentration_mg_ml: 100.0,
            daily_dose_mg_kgw: 20.0,
            weight_g: 350.0,
            treatment_length_days: 14.0,
            min_daily_dose_ml: 0.2,
        }
    }
}

impl DosageInput {
    /// Check that every field is a positive finite number
    ///
    /// Reports the first offending field in `Field::ALL` order.
    pub fn validate(&self) -> Result<()> {
        for field in Field::ALL {
            let value = field.get(self);
            if !value.is_finite() {
                return Err(Error::invalid(field, "must be a finite number"));
            }
            if value <= 0.0 {
                return Err(Error::invalid(field, "must be greater than zero"));
            }
        }
        Ok(())
    }

    /// Fields paired with their current values, in stable order
    pub fn values(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL.into_iter().map(move |f| (f, f.get(self)))
    }
}

// ============================================================================
// Output Record
// ============================================================================

/// Quantities derived from a `DosageInput`
///
/// Never mutated independently; produce a fresh one with
/// [`crate::compute`] whenever the input changes.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct DosageOutput {
    /// Medication volume per kg body weight per day [ml/kg]
    pub daily_dose_ml_kgw: f64,
    /// Body weight in kg
    pub weight_factor: f64,
    /// Pure medication volume needed per day [ml]
    pub daily_dose_normalized_weight_ml: f64,
    /// Pure medication over the whole course [ml]
    pub total_treatment_amount_medication_ml: f64,
    /// Daily mixture volume, a multiple of the minimum daily dose [ml]
    pub daily_fruit_juice_mix_ml: f64,
    /// Total mixture to prepare [ml]
    pub total_fruit_juice_solution_ml: f64,
    /// Carrier liquid portion of the mixture [ml]
    pub total_fruit_juice_amount_ml: f64,
    /// Share of medication in the mixture [%]
    pub percentage_of_medication_in_mix: f64,
}

/// A derived quantity shown to users
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    TotalMedication,
    TotalJuice,
    TotalSolution,
    DailyMix,
    DailyMedication,
    MedicationPercentage,
}

impl Quantity {
    /// Display order
    pub const ALL: [Quantity; 6] = [
        Quantity::TotalMedication,
        Quantity::TotalJuice,
        Quantity::TotalSolution,
        Quantity::DailyMix,
        Quantity::DailyMedication,
        Quantity::MedicationPercentage,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Quantity::TotalMedication => "total_treatment_amount_medication_ml",
            Quantity::TotalJuice => "total_fruit_juice_amount_ml",
            Quantity::TotalSolution => "total_fruit_juice_solution_ml",
            Quantity::DailyMix => "daily_fruit_juice_mix_ml",
            Quantity::DailyMedication => "daily_dose_normalized_weight_ml",
            Quantity::MedicationPercentage => "percentage_of_medication_in_mix",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quantity::TotalMedication => "Gesamtmenge Medikament [ml]",
            Quantity::TotalJuice => "Gesamtmenge Fruchtsaft [ml]",
            Quantity::TotalSolution => "Gesamtmenge Fruchtsaft-Medikament-Gemisch [ml]",
            Quantity::DailyMix => "Tageseinheit Fruchtsaft-Medikament-Gemisch [ml]",
            Quantity::DailyMedication => "Tagesmenge Medikament [ml]",
            Quantity::MedicationPercentage => "Anteil Medikament im Gemisch [%]",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Quantity::MedicationPercentage => "%",
            _ => "ml",
        }
    }

    pub fn get(self, output: &DosageOutput) -> f64 {
        match self {
            Quantity::TotalMedication => output.total_treatment_amount_medication_ml,
            Quantity::TotalJuice => output.total_fruit_juice_amount_ml,
            Quantity::TotalSolution => output.total_fruit_juice_solution_ml,
            Quantity::DailyMix => output.daily_fruit_juice_mix_ml,
            Quantity::DailyMedication => output.daily_dose_normalized_weight_ml,
            Quantity::MedicationPercentage => output.percentage_of_medication_in_mix,
        }
    }
}

impl DosageOutput {
    /// True when every derived value, intermediates included, is finite
    pub fn is_finite(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_finite())
    }

    /// The reported quantities paired with their values, in display order
    pub fn reported(&self) -> impl Iterator<Item = (Quantity, f64)> + '_ {
        Quantity::ALL.into_iter().map(move |q| (q, q.get(self)))
    }

    /// Every derived value by name, in computation order
    pub(crate) fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("daily_dose_ml_kgw", self.daily_dose_ml_kgw),
            ("weight_factor", self.weight_factor),
            (
                "daily_dose_normalized_weight_ml",
                self.daily_dose_normalized_weight_ml,
            ),
            (
                "total_treatment_amount_medication_ml",
                self.total_treatment_amount_medication_ml,
            ),
            ("daily_fruit_juice_mix_ml", self.daily_fruit_juice_mix_ml),
            (
                "total_fruit_juice_solution_ml",
                self.total_fruit_juice_solution_ml,
            ),
            (
                "total_fruit_juice_amount_ml",
                self.total_fruit_juice_amount_ml,
            ),
            (
                "percentage_of_medication_in_mix",
                self.percentage_of_medication_in_mix,
            ),
        ]
    }
}
