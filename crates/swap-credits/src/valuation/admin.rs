use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const KITCHEN_BONUS_KEY: &str = "kitchen";
pub const PREMIUM_VIEW_BONUS_KEY: &str = "premium_view";
/// Camel-case spelling found in older config documents; read when `premium_view` is absent.
pub const LEGACY_PREMIUM_VIEW_BONUS_KEY: &str = "premiumView";
pub const DEFAULT_BRAND_TIER: &str = "mid";

/// Shortest and longest stays the guardrails have to cover.
pub const MIN_NIGHTS: u32 = 3;
pub const MAX_NIGHTS: u32 = 7;

/// Tunable pricing parameters maintained by platform admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub credit_price_usd_per_credit: f64,
    pub calibration_k: f64,
    pub rounding_step: u32,
    pub per_night_min_credits: u32,
    pub per_night_max_credits: u32,
    pub total_min_credits: u32,
    pub total_max_credits: u32,
    pub indices: IndexTables,
}

/// Keyed multipliers (`brand_tier`, `unit_base`) and additive bonuses (`feature_bonus`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexTables {
    #[serde(default)]
    pub brand_tier: BTreeMap<String, f64>,
    #[serde(default)]
    pub unit_base: BTreeMap<String, f64>,
    #[serde(default)]
    pub feature_bonus: BTreeMap<String, f64>,
}

/// Inclusive credit bounds for a given stay length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailRange {
    pub min: u32,
    pub max: u32,
}

impl AdminConfig {
    /// Guardrails after combining per-night and total bounds.
    pub fn guardrails_for(&self, nights: u32) -> GuardrailRange {
        let min = self
            .total_min_credits
            .max(self.per_night_min_credits.saturating_mul(nights));
        let max = self
            .total_max_credits
            .min(self.per_night_max_credits.saturating_mul(nights));
        GuardrailRange { min, max }
    }

    pub fn validate(&self) -> Result<(), AdminConfigError> {
        positive("credit_price_usd_per_credit", self.credit_price_usd_per_credit)?;
        positive("calibration_k", self.calibration_k)?;

        if self.rounding_step == 0 {
            return Err(AdminConfigError::ZeroRoundingStep);
        }
        if self.per_night_min_credits > self.per_night_max_credits {
            return Err(AdminConfigError::InvertedBounds {
                field: "per_night",
                min: self.per_night_min_credits,
                max: self.per_night_max_credits,
            });
        }
        if self.total_min_credits > self.total_max_credits {
            return Err(AdminConfigError::InvertedBounds {
                field: "total",
                min: self.total_min_credits,
                max: self.total_max_credits,
            });
        }

        for (table, entries) in [
            ("brand_tier", &self.indices.brand_tier),
            ("unit_base", &self.indices.unit_base),
            ("feature_bonus", &self.indices.feature_bonus),
        ] {
            for (key, value) in entries {
                if !value.is_finite() || *value < 0.0 {
                    return Err(AdminConfigError::InvalidIndex {
                        table,
                        key: key.clone(),
                        value: *value,
                    });
                }
            }
        }

        let step = self.rounding_step;
        for nights in MIN_NIGHTS..=MAX_NIGHTS {
            let range = self.guardrails_for(nights);
            if range.min > range.max {
                return Err(AdminConfigError::InvertedGuardrail {
                    nights,
                    min: range.min,
                    max: range.max,
                });
            }
            let first_multiple = range.min.div_ceil(step).saturating_mul(step);
            if first_multiple > range.max {
                return Err(AdminConfigError::NoRoundedValueInRange {
                    nights,
                    min: range.min,
                    max: range.max,
                    step,
                });
            }
        }

        Ok(())
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        let brand_tier = BTreeMap::from([
            ("lux".to_string(), 1.25),
            ("mid".to_string(), 1.0),
            ("value".to_string(), 0.85),
        ]);
        let unit_base = BTreeMap::from([
            ("studio".to_string(), 0.75),
            ("1br".to_string(), 1.0),
            ("2br".to_string(), 1.35),
            ("3br".to_string(), 1.7),
        ]);
        let feature_bonus = BTreeMap::from([
            (KITCHEN_BONUS_KEY.to_string(), 0.05),
            (PREMIUM_VIEW_BONUS_KEY.to_string(), 0.08),
        ]);

        Self {
            credit_price_usd_per_credit: 0.15,
            calibration_k: 1.0,
            rounding_step: 50,
            per_night_min_credits: 200,
            per_night_max_credits: 1500,
            total_min_credits: 800,
            total_max_credits: 10_000,
            indices: IndexTables {
                brand_tier,
                unit_base,
                feature_bonus,
            },
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), AdminConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AdminConfigError::NonPositive { field, value })
    }
}

/// Reasons an admin config is rejected before any valuation runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdminConfigError {
    #[error("{field} must be a finite positive number, found {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("rounding_step must be greater than zero")]
    ZeroRoundingStep,
    #[error("{field} credit bounds are inverted (min {min} > max {max})")]
    InvertedBounds {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("index {table}[{key}] must be finite and non-negative, found {value}")]
    InvalidIndex {
        table: &'static str,
        key: String,
        value: f64,
    },
    #[error("guardrails for {nights} nights are inverted (min {min} > max {max})")]
    InvertedGuardrail { nights: u32, min: u32, max: u32 },
    #[error("no multiple of {step} fits the {nights}-night guardrails [{min}, {max}]")]
    NoRoundedValueInRange {
        nights: u32,
        min: u32,
        max: u32,
        step: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        AdminConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn guardrails_combine_per_night_and_total_bounds() {
        let config = AdminConfig::default();
        assert_eq!(
            config.guardrails_for(3),
            GuardrailRange {
                min: 800,
                max: 4500
            }
        );
        assert_eq!(
            config.guardrails_for(7),
            GuardrailRange {
                min: 1400,
                max: 10_000
            }
        );
    }

    #[test]
    fn rejects_guardrails_that_invert_for_some_stay_length() {
        let config = AdminConfig {
            total_min_credits: 5000,
            ..AdminConfig::default()
        };

        // 3 nights * 1500 = 4500 < 5000
        assert_eq!(
            config.validate(),
            Err(AdminConfigError::InvertedGuardrail {
                nights: 3,
                min: 5000,
                max: 4500
            })
        );
    }

    #[test]
    fn rejects_ranges_without_a_rounded_value() {
        let config = AdminConfig {
            rounding_step: 1000,
            per_night_min_credits: 100,
            per_night_max_credits: 150,
            total_min_credits: 100,
            total_max_credits: 10_000,
            ..AdminConfig::default()
        };

        // 3 nights: [300, 450] has no multiple of 1000
        assert!(matches!(
            config.validate(),
            Err(AdminConfigError::NoRoundedValueInRange { nights: 3, .. })
        ));
    }

    #[test]
    fn rejects_non_positive_price_and_negative_indices() {
        let zero_price = AdminConfig {
            credit_price_usd_per_credit: 0.0,
            ..AdminConfig::default()
        };
        assert!(matches!(
            zero_price.validate(),
            Err(AdminConfigError::NonPositive {
                field: "credit_price_usd_per_credit",
                ..
            })
        ));

        let mut negative_index = AdminConfig::default();
        negative_index
            .indices
            .unit_base
            .insert("penthouse".to_string(), -0.5);
        assert!(matches!(
            negative_index.validate(),
            Err(AdminConfigError::InvalidIndex {
                table: "unit_base",
                ..
            })
        ));
    }

    #[test]
    fn deserializes_with_missing_index_tables() {
        let raw = r#"{
            "credit_price_usd_per_credit": 0.15,
            "calibration_k": 1.0,
            "rounding_step": 50,
            "per_night_min_credits": 200,
            "per_night_max_credits": 1500,
            "total_min_credits": 800,
            "total_max_credits": 10000,
            "indices": { "brand_tier": { "lux": 1.2 } }
        }"#;
        let config: AdminConfig = serde_json::from_str(raw).expect("config parses");
        assert_eq!(config.indices.brand_tier.get("lux"), Some(&1.2));
        assert!(config.indices.unit_base.is_empty());
        config.validate().expect("parsed config validates");
    }
}
