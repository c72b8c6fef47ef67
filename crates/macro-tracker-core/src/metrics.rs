// ABOUTME: Body-composition formulas: Mifflin-St Jeor BMR, activity-scaled TDEE, BMI and body fat
// ABOUTME: Stateless and deterministic, shared by the profile reconciler and benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Metrics Calculator
//!
//! Converts biometric inputs into derived health metrics. Nothing here rounds
//! or clamps: callers get the raw formula output.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>
//!
//! - Deurenberg, P., et al. (1991). Body mass index as a measure of body fatness.
//!   *British Journal of Nutrition*, 65(2), 105-114.

use crate::errors::AppResult;
use crate::models::{ActivityLevel, Sex};
use serde::{Deserialize, Serialize};

/// BMR and the activity-scaled daily target derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyExpenditure {
    /// Basal Metabolic Rate in kcal/day
    pub bmr: f64,
    /// Total Daily Energy Expenditure in kcal/day (the daily calorie target)
    pub tdee: f64,
}

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + `sex_offset`
/// - Men: +5
/// - Women: -161
#[must_use]
pub fn basal_metabolic_rate(sex: Sex, weight_kg: f64, height_cm: f64, age_years: u32) -> f64 {
    let base = 6.25f64.mul_add(height_cm, 10.0 * weight_kg) - 5.0 * f64::from(age_years);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// TDEE multiplier for an activity tier
///
/// | tier              | factor |
/// |-------------------|--------|
/// | sedentary         | 1.2    |
/// | lightly_active    | 1.375  |
/// | moderately_active | 1.55   |
/// | very_active       | 1.725  |
/// | extra_active      | 1.9    |
#[must_use]
pub const fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::LightlyActive => 1.375,
        ActivityLevel::ModeratelyActive => 1.55,
        ActivityLevel::VeryActive => 1.725,
        ActivityLevel::ExtraActive => 1.9,
    }
}

impl ActivityLevel {
    /// TDEE multiplier for this tier
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        activity_multiplier(self)
    }
}

/// Calculate BMR and TDEE (`TDEE = BMR x activity multiplier`)
#[must_use]
pub fn total_daily_energy_expenditure(
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    activity_level: ActivityLevel,
) -> EnergyExpenditure {
    let bmr = basal_metabolic_rate(sex, weight_kg, height_cm, age_years);
    EnergyExpenditure {
        bmr,
        tdee: bmr * activity_level.multiplier(),
    }
}

/// Calculate BMR and TDEE from unparsed sex and activity strings
///
/// # Errors
///
/// Returns `InvalidInput` if `sex` or `activity_level` is not a recognized value
pub fn calculate_energy_expenditure(
    sex: &str,
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    activity_level: &str,
) -> AppResult<EnergyExpenditure> {
    let sex: Sex = sex.parse()?;
    let activity_level: ActivityLevel = activity_level.parse()?;
    Ok(total_daily_energy_expenditure(
        sex,
        weight_kg,
        height_cm,
        age_years,
        activity_level,
    ))
}

/// Body-mass index: `weight_kg / (height_cm / 100)^2`
///
/// Returns `None` when `height_cm` is not positive instead of dividing by zero.
#[must_use]
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if height_cm > 0.0 {
        let height_m = height_cm / 100.0;
        Some(weight_kg / (height_m * height_m))
    } else {
        None
    }
}

/// Simplified BMI-based body-fat estimate
///
/// - Men: `1.20 x BMI + 0.23 x age - 16.2`
/// - Women: `1.20 x BMI + 0.23 x age - 5.4`
///
/// No bounds are applied; extreme inputs can yield negative percentages.
/// Returns `None` when the sex is unknown.
#[must_use]
pub fn body_fat_percentage(bmi: f64, age_years: u32, sex: Option<Sex>) -> Option<f64> {
    let offset = match sex? {
        Sex::Male => 16.2,
        Sex::Female => 5.4,
    };
    Some(0.23f64.mul_add(f64::from(age_years), 1.20 * bmi) - offset)
}
