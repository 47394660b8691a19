//! Individual valuation factors. Each one is applied multiplicatively by the engine.

use chrono::NaiveDate;

use super::super::admin::{
    AdminConfig, DEFAULT_BRAND_TIER, KITCHEN_BONUS_KEY, LEGACY_PREMIUM_VIEW_BONUS_KEY,
    MAX_NIGHTS, MIN_NIGHTS, PREMIUM_VIEW_BONUS_KEY,
};
use super::super::domain::{Flexibility, UnitFeatures};
use super::ValuationError;

pub const RESTRICTED_FLEX_INDEX: f64 = 0.95;

/// Calendar nights between check-in and the exclusive checkout day.
pub fn stay_nights(start: NaiveDate, end: NaiveDate) -> Result<u32, ValuationError> {
    let nights = (end - start).num_days();
    if nights < i64::from(MIN_NIGHTS) || nights > i64::from(MAX_NIGHTS) {
        return Err(ValuationError::StayLengthInvalid { nights });
    }
    Ok(nights as u32)
}

pub fn brand_tier_index(config: &AdminConfig, tier: Option<&str>) -> f64 {
    let key = tier.unwrap_or(DEFAULT_BRAND_TIER);
    config
        .indices
        .brand_tier
        .get(key)
        .copied()
        .unwrap_or(1.0)
}

pub fn unit_base_index(config: &AdminConfig, unit_type: &str) -> f64 {
    config
        .indices
        .unit_base
        .get(unit_type)
        .copied()
        .unwrap_or(1.0)
}

/// Kitchen and premium-view bonuses, zero when the feature is absent.
pub fn feature_bonuses(config: &AdminConfig, features: UnitFeatures) -> (f64, f64) {
    let bonus = |enabled: bool, keys: &[&str]| {
        if enabled {
            keys.iter()
                .find_map(|key| config.indices.feature_bonus.get(*key))
                .copied()
                .unwrap_or(0.0)
        } else {
            0.0
        }
    };

    (
        bonus(features.kitchen, &[KITCHEN_BONUS_KEY]),
        bonus(
            features.premium_view,
            &[PREMIUM_VIEW_BONUS_KEY, LEGACY_PREMIUM_VIEW_BONUS_KEY],
        ),
    )
}

/// Bonuses add up before scaling the base unit multiplier.
pub fn unit_index(unit_base: f64, kitchen_bonus: f64, view_bonus: f64) -> f64 {
    unit_base * (1.0 + kitchen_bonus + view_bonus)
}

pub fn flex_index(flexibility: Flexibility) -> f64 {
    if flexibility.guest_cert_allowed {
        1.0
    } else {
        RESTRICTED_FLEX_INDEX
    }
}

/// Fee-to-value ratio; the denominator never drops below one dollar.
pub fn maintenance_fee_ratio(maintenance_fee_usd: f64, raw_usd: f64) -> f64 {
    maintenance_fee_usd / raw_usd.max(1.0)
}

/// Cheap-to-hold weeks earn a premium, fee-heavy ones a discount.
pub fn maintenance_fee_index(ratio: f64) -> f64 {
    if ratio <= 0.25 {
        1.05
    } else if ratio <= 0.40 {
        1.00
    } else if ratio <= 0.55 {
        0.95
    } else {
        0.90
    }
}
