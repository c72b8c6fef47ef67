// ABOUTME: Profile reconciliation: turns a partial profile update into column/value changes
// ABOUTME: Recomputes age, daily calorie target, BMI and body fat when their inputs are complete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Profile Reconciler
//!
//! A profile update is any subset of the raw biometric fields. The reconciler
//! validates what was supplied, works out which derived metrics can be
//! recomputed, and hands back the exact set of columns the storage layer must
//! write. Columns missing from the result must not be touched.
//!
//! Failures are all-or-nothing: an invalid date of birth, sex or activity level
//! aborts the whole update before any change set exists.

use crate::errors::{AppError, AppResult};
use crate::metrics::{body_fat_percentage, body_mass_index, total_daily_energy_expenditure};
use crate::models::{ActivityLevel, Sex};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// Partial profile update as received from a client
///
/// Every field is optional; `null` is treated the same as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// Display name
    pub name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// ISO calendar date (`YYYY-MM-DD`)
    pub date_of_birth: Option<String>,
    /// `male` or `female`
    pub sex: Option<String>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// One of the five activity tiers
    pub activity_level: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update supplies any input of a derived metric
    #[must_use]
    pub const fn touches_biometrics(&self) -> bool {
        self.date_of_birth.is_some()
            || self.sex.is_some()
            || self.height_cm.is_some()
            || self.weight_kg.is_some()
            || self.activity_level.is_some()
    }
}

/// Profile state as currently persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    /// Display name
    pub name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Sex
    pub sex: Option<Sex>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Activity tier
    pub activity_level: Option<ActivityLevel>,
    /// Last computed TDEE in kcal/day
    pub daily_calorie_target: Option<f64>,
    /// Last computed body-mass index
    pub bmi: Option<f64>,
    /// Last computed body-fat estimate in percent
    pub body_fat_pct: Option<f64>,
}

impl StoredProfile {
    /// Age in whole years on `today`, if a date of birth is stored
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the stored date of birth lies after `today`
    pub fn age_on(&self, today: NaiveDate) -> AppResult<Option<u32>> {
        self.date_of_birth.map(|dob| age_on(dob, today)).transpose()
    }
}

/// Persisted profile columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileColumn {
    /// `name`
    Name,
    /// `email`
    Email,
    /// `date_of_birth`
    DateOfBirth,
    /// `sex`
    Sex,
    /// `height_cm`
    HeightCm,
    /// `weight_kg`
    WeightKg,
    /// `activity_level`
    ActivityLevel,
    /// `daily_calorie_target` (derived)
    DailyCalorieTarget,
    /// `bmi` (derived)
    Bmi,
    /// `body_fat_pct` (derived)
    BodyFatPct,
}

impl ProfileColumn {
    /// Column name in the `users` table
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::DateOfBirth => "date_of_birth",
            Self::Sex => "sex",
            Self::HeightCm => "height_cm",
            Self::WeightKg => "weight_kg",
            Self::ActivityLevel => "activity_level",
            Self::DailyCalorieTarget => "daily_calorie_target",
            Self::Bmi => "bmi",
            Self::BodyFatPct => "body_fat_pct",
        }
    }

    /// Whether the column holds a derived metric rather than a raw field
    #[must_use]
    pub const fn is_derived(self) -> bool {
        matches!(self, Self::DailyCalorieTarget | Self::Bmi | Self::BodyFatPct)
    }
}

impl Display for ProfileColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// New value for a profile column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    /// Text column (name, email, sex, activity level)
    Text(String),
    /// Real column (height, weight, derived metrics)
    Real(f64),
    /// Calendar date column
    Date(NaiveDate),
}

/// Ordered column to value mapping produced by a reconciliation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProfileChanges(BTreeMap<ProfileColumn, ColumnValue>);

impl ProfileChanges {
    /// Empty change set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value
    pub fn insert(&mut self, column: ProfileColumn, value: ColumnValue) {
        self.0.insert(column, value);
    }

    /// Value for a column, if it changes
    #[must_use]
    pub fn get(&self, column: ProfileColumn) -> Option<&ColumnValue> {
        self.0.get(&column)
    }

    /// Real value for a column, if it changes and is numeric
    #[must_use]
    pub fn real(&self, column: ProfileColumn) -> Option<f64> {
        match self.0.get(&column) {
            Some(ColumnValue::Real(value)) => Some(*value),
            _ => None,
        }
    }

    /// Whether a column changes
    #[must_use]
    pub fn contains(&self, column: ProfileColumn) -> bool {
        self.0.contains_key(&column)
    }

    /// Iterate changes in column order
    pub fn iter(&self) -> impl Iterator<Item = (ProfileColumn, &ColumnValue)> {
        self.0.iter().map(|(column, value)| (*column, value))
    }

    /// Number of changed columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing changes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of reconciling an update
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Nothing to persist
    NoOp,
    /// Columns to persist
    Changes(ProfileChanges),
}

/// Which values feed the derived-metric formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputePolicy {
    /// Only fields present in the update count; stored values are ignored
    #[default]
    PayloadOnly,
    /// Stored values fill in fields the update leaves out
    MergeStored,
}

impl FromStr for RecomputePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payload_only" | "payload" => Ok(Self::PayloadOnly),
            "merge_stored" | "merge" => Ok(Self::MergeStored),
            other => Err(AppError::config_invalid(format!(
                "Unknown profile recompute policy '{other}'"
            ))),
        }
    }
}

impl Display for RecomputePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadOnly => f.write_str("payload_only"),
            Self::MergeStored => f.write_str("merge_stored"),
        }
    }
}

/// Parse a strict ISO `YYYY-MM-DD` calendar date
///
/// Exactly ten characters with zero-padded fields; surrounding whitespace and
/// single-digit months or days are rejected.
///
/// # Errors
///
/// Returns `InvalidInput` naming `field` if the string has another shape or is
/// not a real calendar date
pub fn parse_iso_date(field: &str, raw: &str) -> AppResult<NaiveDate> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(AppError::invalid_input(format!(
            "{field} '{raw}' is not a YYYY-MM-DD date"
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        AppError::invalid_input(format!(
            "{field} '{raw}' is not a valid YYYY-MM-DD date: {e}"
        ))
    })
}

/// Parse an ISO `YYYY-MM-DD` date of birth
///
/// # Errors
///
/// Returns `InvalidInput` if the string is not a valid calendar date
pub fn parse_date_of_birth(raw: &str) -> AppResult<NaiveDate> {
    parse_iso_date("date_of_birth", raw)
}

/// Whole years from `date_of_birth` to `today`
///
/// The naive year difference drops by one while this year's birthday is still ahead.
///
/// # Errors
///
/// Returns `InvalidInput` if `date_of_birth` is after `today`
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> AppResult<u32> {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).map_err(|_| {
        AppError::invalid_input(format!("date_of_birth {date_of_birth} is in the future"))
    })
}

/// Inputs available to the metric formulas after applying an update
#[derive(Debug, Default)]
struct MetricInputs {
    sex: Option<Sex>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age_years: Option<u32>,
    activity_level: Option<ActivityLevel>,
}

/// Applies partial updates to a profile and recomputes derived metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileReconciler {
    policy: RecomputePolicy,
}

impl ProfileReconciler {
    /// Create a reconciler with the given recompute policy
    #[must_use]
    pub const fn new(policy: RecomputePolicy) -> Self {
        Self { policy }
    }

    /// Active recompute policy
    #[must_use]
    pub const fn policy(&self) -> RecomputePolicy {
        self.policy
    }

    /// Reconcile `update` against the previous state
    ///
    /// `stored` is only consulted under [`RecomputePolicy::MergeStored`].
    /// `today` anchors the age calculation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unparseable or future date of birth, or an
    /// unrecognized sex or activity level. No change set is produced in that case.
    pub fn reconcile(
        &self,
        update: &ProfileUpdate,
        stored: Option<&StoredProfile>,
        today: NaiveDate,
    ) -> AppResult<ReconcileOutcome> {
        let date_of_birth = update
            .date_of_birth
            .as_deref()
            .map(parse_date_of_birth)
            .transpose()?;
        let sex = update.sex.as_deref().map(str::parse::<Sex>).transpose()?;
        let activity_level = update
            .activity_level
            .as_deref()
            .map(str::parse::<ActivityLevel>)
            .transpose()?;

        let mut changes = ProfileChanges::new();
        if let Some(name) = &update.name {
            changes.insert(ProfileColumn::Name, ColumnValue::Text(name.clone()));
        }
        if let Some(email) = &update.email {
            changes.insert(ProfileColumn::Email, ColumnValue::Text(email.clone()));
        }
        if let Some(dob) = date_of_birth {
            changes.insert(ProfileColumn::DateOfBirth, ColumnValue::Date(dob));
        }
        if let Some(sex) = sex {
            changes.insert(ProfileColumn::Sex, ColumnValue::Text(sex.as_str().to_owned()));
        }
        if let Some(height_cm) = update.height_cm {
            changes.insert(ProfileColumn::HeightCm, ColumnValue::Real(height_cm));
        }
        if let Some(weight_kg) = update.weight_kg {
            changes.insert(ProfileColumn::WeightKg, ColumnValue::Real(weight_kg));
        }
        if let Some(level) = activity_level {
            changes.insert(
                ProfileColumn::ActivityLevel,
                ColumnValue::Text(level.as_str().to_owned()),
            );
        }

        let fallback = match self.policy {
            RecomputePolicy::MergeStored if update.touches_biometrics() => stored,
            _ => None,
        };
        let inputs = MetricInputs {
            sex: sex.or_else(|| fallback.and_then(|p| p.sex)),
            weight_kg: update.weight_kg.or_else(|| fallback.and_then(|p| p.weight_kg)),
            height_cm: update.height_cm.or_else(|| fallback.and_then(|p| p.height_cm)),
            age_years: date_of_birth
                .or_else(|| fallback.and_then(|p| p.date_of_birth))
                .map(|dob| age_on(dob, today))
                .transpose()?,
            activity_level: activity_level.or_else(|| fallback.and_then(|p| p.activity_level)),
        };

        Self::recompute_metrics(&inputs, &mut changes);

        if changes.is_empty() {
            debug!("Profile update carries no changes");
            return Ok(ReconcileOutcome::NoOp);
        }
        debug!(
            columns = changes.len(),
            policy = %self.policy,
            "Profile update reconciled"
        );
        Ok(ReconcileOutcome::Changes(changes))
    }

    fn recompute_metrics(inputs: &MetricInputs, changes: &mut ProfileChanges) {
        if let (Some(sex), Some(weight_kg), Some(height_cm), Some(age), Some(level)) = (
            inputs.sex,
            inputs.weight_kg,
            inputs.height_cm,
            inputs.age_years,
            inputs.activity_level,
        ) {
            let energy = total_daily_energy_expenditure(sex, weight_kg, height_cm, age, level);
            changes.insert(
                ProfileColumn::DailyCalorieTarget,
                ColumnValue::Real(energy.tdee),
            );
        }

        let bmi = match (inputs.weight_kg, inputs.height_cm) {
            (Some(weight_kg), Some(height_cm)) => body_mass_index(weight_kg, height_cm),
            _ => None,
        };
        if let Some(bmi) = bmi {
            changes.insert(ProfileColumn::Bmi, ColumnValue::Real(bmi));
            if let Some(body_fat) = inputs
                .age_years
                .and_then(|age| body_fat_percentage(bmi, age, inputs.sex))
            {
                changes.insert(ProfileColumn::BodyFatPct, ColumnValue::Real(body_fat));
            }
        }
    }
}
