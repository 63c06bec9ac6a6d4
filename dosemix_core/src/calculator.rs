//! Dosage calculator.
//!
//! Derives the medication / carrier-liquid mixture from a `DosageInput`:
//! - Medication volume per day and over the whole treatment
//! - Daily mixture volume, rounded up to a measurable increment
//! - Total mixture, carrier portion and medication percentage
//!
//! The mixture assumes a nominal 1:1 dilution before rounding.

use crate::{DosageInput, DosageOutput, Error, Field, Result};

/// Round `num` up to the nearest multiple of `precision`
///
/// The result is never below `num`. When float noise pushes the quotient
/// just past an integer, the lower multiple is kept if it still covers
/// `num`, so `ceil_to_nearest(1.1, 0.1)` is `1.1`, not `1.2`.
///
/// # Errors
/// `Error::InvalidInput` when `precision` is zero. NaN arguments are not
/// an error and yield NaN.
pub fn ceil_to_nearest(num: f64, precision: f64) -> Result<f64> {
    if precision == 0.0 {
        return Err(Error::invalid(
            Field::MinDailyDoseMl,
            "rounding increment must not be zero",
        ));
    }

    let steps = (num / precision).ceil();
    let steps = if (steps - 1.0) * precision >= num {
        steps - 1.0
    } else {
        steps
    };

    Ok(steps * precision)
}

/// Evaluate the full dosage chain for `input`
///
/// Degenerate values (NaN, zero concentration or treatment length)
/// propagate as non-finite outputs. Use [`calculate`] to reject them.
///
/// # Errors
/// `Error::InvalidInput` when `min_daily_dose_ml` is zero.
pub fn compute(input: &DosageInput) -> Result<DosageOutput> {
    let daily_dose_ml_kgw = input.daily_dose_mg_kgw / input.concentration_mg_ml;
    let weight_factor = input.weight_g / 1000.0;
    let daily_dose_normalized_weight_ml = daily_dose_ml_kgw * weight_factor;
    let total_treatment_amount_medication_ml =
        daily_dose_normalized_weight_ml * input.treatment_length_days;

    let daily_fruit_juice_mix_ml = ceil_to_nearest(
        (total_treatment_amount_medication_ml * 2.0) / input.treatment_length_days,
        input.min_daily_dose_ml,
    )?;

    let total_fruit_juice_solution_ml = daily_fruit_juice_mix_ml * input.treatment_length_days;
    let total_fruit_juice_amount_ml =
        total_fruit_juice_solution_ml - total_treatment_amount_medication_ml;
    let percentage_of_medication_in_mix =
        100.0 * total_treatment_amount_medication_ml / total_fruit_juice_solution_ml;

    let output = DosageOutput {
        daily_dose_ml_kgw,
        weight_factor,
        daily_dose_normalized_weight_ml,
        total_treatment_amount_medication_ml,
        daily_fruit_juice_mix_ml,
        total_fruit_juice_solution_ml,
        total_fruit_juice_amount_ml,
        percentage_of_medication_in_mix,
    };

    tracing::debug!(?input, ?output, "Computed dosage");
    Ok(output)
}

/// Validate `input`, then compute, rejecting any non-finite result
///
/// # Errors
/// `Error::InvalidInput` naming the first field that is non-finite or
/// not positive, `Error::NonFinite` when the chain overflows.
pub fn calculate(input: &DosageInput) -> Result<DosageOutput> {
    input.validate()?;
    let output = compute(input)?;

    if let Some((name, _)) = output.fields().iter().find(|(_, v)| !v.is_finite()) {
        tracing::warn!("Derived value {} is not finite for {:?}", name, input);
        return Err(Error::NonFinite(*name));
    }

    Ok(output)
}
