// ABOUTME: Biometric domain models shared by the calculator, reconciler and storage layer
// ABOUTME: Closed enumerations for sex and activity level plus the user identifier newtype
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Identifier of the user owning a profile and its meal log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Biological sex used by the Mifflin-St Jeor and body-fat formulas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male (+5 kcal BMR constant)
    Male,
    /// Female (-161 kcal BMR constant)
    Female,
}

impl Sex {
    /// Canonical storage name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(AppError::invalid_input(format!(
                "Unrecognized sex '{s}' (expected 'male' or 'female')"
            ))),
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Sedentary (little/no exercise)
    Sedentary,
    /// Lightly active (1-3 days/week)
    LightlyActive,
    /// Moderately active (3-5 days/week)
    ModeratelyActive,
    /// Very active (6-7 days/week)
    VeryActive,
    /// Extra active (hard training 2x/day)
    ExtraActive,
}

impl ActivityLevel {
    /// All tiers, least to most active
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::LightlyActive,
        Self::ModeratelyActive,
        Self::VeryActive,
        Self::ExtraActive,
    ];

    /// Canonical storage name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::LightlyActive => "lightly_active",
            Self::ModeratelyActive => "moderately_active",
            Self::VeryActive => "very_active",
            Self::ExtraActive => "extra_active",
        }
    }
}

impl Display for ActivityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Unrecognized activity level '{s}' (expected one of: sedentary, \
                     lightly_active, moderately_active, very_active, extra_active)"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_sex_parsing_accepts_only_canonical_names() {
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        for raw in ["MALE", " female ", "Female", ""] {
            let err = raw.parse::<Sex>().unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput, "{raw:?}");
        }
    }

    #[test]
    fn test_unknown_sex_is_invalid_input() {
        let err = "otro".parse::<Sex>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.message.contains("otro"));
    }

    #[test]
    fn test_activity_level_round_trips_through_storage_name() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.as_str().parse::<ActivityLevel>().unwrap(), level);
        }
        for raw in ["Lightly-Active", "very active", "SEDENTARY"] {
            assert!(raw.parse::<ActivityLevel>().is_err(), "{raw:?}");
        }
    }

    #[test]
    fn test_unknown_activity_level_is_invalid_input() {
        let err = "muy_muy_activo".parse::<ActivityLevel>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
