//! Underwriting settings
//!
//! Tunable tolerances and policy choices, loaded from `UNDERWRITING_*`
//! environment variables (a `.env` file is honoured) on top of defaults.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

use core_kernel::Timezone;

use crate::error::UnderwritingError;

/// Which premium a family's floor is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorTarget {
    /// The premium derived by the pricing formula
    #[default]
    Computed,
    /// The premium entered on the draft
    Declared,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UnderwritingSettings {
    /// Allowed deviation of a beneficiary percentage sum from 100
    pub percentage_tolerance: Decimal,
    /// Allowed deviation of a declared premium from the derived one
    pub premium_tolerance: Decimal,
    /// Oldest age at which a dependent still counts as a child
    pub child_age_ceiling: u32,
    /// Whether a child exactly at the ceiling is accepted
    pub child_age_inclusive: bool,
    pub floor_target: FloorTarget,
    /// Jurisdiction used to resolve "today"
    pub timezone: Timezone,
    pub catalog_path: Option<PathBuf>,
}

impl Default for UnderwritingSettings {
    fn default() -> Self {
        Self {
            percentage_tolerance: dec!(0.01),
            premium_tolerance: dec!(0.01),
            child_age_ceiling: 25,
            child_age_inclusive: true,
            floor_target: FloorTarget::Computed,
            timezone: Timezone::default(),
            catalog_path: None,
        }
    }
}

impl UnderwritingSettings {
    /// Loads settings from the environment
    ///
    /// Reads `.env` if present, then `UNDERWRITING_*` variables such as
    /// `UNDERWRITING_CHILD_AGE_CEILING=21`. Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, UnderwritingError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("UNDERWRITING"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Whether a child of `age` is over the ceiling
    pub fn child_age_exceeded(&self, age: u32) -> bool {
        if self.child_age_inclusive {
            age > self.child_age_ceiling
        } else {
            age >= self.child_age_ceiling
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = UnderwritingSettings::default();
        assert_eq!(settings.percentage_tolerance, dec!(0.01));
        assert_eq!(settings.child_age_ceiling, 25);
        assert_eq!(settings.floor_target, FloorTarget::Computed);
    }

    #[test]
    fn test_child_age_ceiling_inclusivity() {
        let mut settings = UnderwritingSettings::default();
        assert!(!settings.child_age_exceeded(25));
        assert!(settings.child_age_exceeded(26));

        settings.child_age_inclusive = false;
        assert!(settings.child_age_exceeded(25));
    }

    #[test]
    fn test_deserialize_partial_document() {
        let settings: UnderwritingSettings =
            serde_json::from_str(r#"{"child_age_ceiling": 21, "floor_target": "declared"}"#).unwrap();
        assert_eq!(settings.child_age_ceiling, 21);
        assert_eq!(settings.floor_target, FloorTarget::Declared);
        assert_eq!(settings.premium_tolerance, dec!(0.01));
    }
}
