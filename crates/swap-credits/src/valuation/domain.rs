use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::engine::ValuationBreakdown;
use super::season::Season;

/// Identifier wrapper for resorts in the reference store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResortId(pub String);

/// Identifier wrapper for listed weeks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ResortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Amenity flags that earn a configured bonus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFeatures {
    #[serde(default)]
    pub kitchen: bool,
    #[serde(default)]
    pub premium_view: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flexibility {
    pub guest_cert_allowed: bool,
}

impl Default for Flexibility {
    fn default() -> Self {
        Self {
            guest_cert_allowed: true,
        }
    }
}

/// Listing attributes submitted for valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub resort_id: ResortId,
    pub start_date: NaiveDate,
    /// Checkout day, exclusive.
    pub end_date: NaiveDate,
    pub unit_type: String,
    #[serde(default)]
    pub features: UnitFeatures,
    #[serde(default)]
    pub maintenance_fee_usd: Option<f64>,
    #[serde(default)]
    pub flexibility: Flexibility,
    #[serde(default)]
    pub history_index: Option<f64>,
    #[serde(default)]
    pub lead_time_index: Option<f64>,
}

/// Resort metadata resolved from the reference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResortRef {
    pub resort_id: ResortId,
    pub region_id: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Average daily rate per season, in USD. Zero or negative entries count as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalRates {
    #[serde(default)]
    pub off: Option<f64>,
    #[serde(default)]
    pub shoulder: Option<f64>,
    #[serde(default)]
    pub peak: Option<f64>,
}

impl SeasonalRates {
    pub fn get(&self, season: Season) -> Option<f64> {
        let rate = match season {
            Season::Off => self.off,
            Season::Shoulder => self.shoulder,
            Season::Peak => self.peak,
        };
        rate.filter(|adr| adr.is_finite() && *adr > 0.0)
    }
}

/// Region-level pricing inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSeasonalData {
    pub region_id: String,
    pub adr_base_by_season: SeasonalRates,
    /// Keyed by stay start date (`YYYY-MM-DD`).
    #[serde(default)]
    pub demand_index_by_week: BTreeMap<String, f64>,
}

impl RegionSeasonalData {
    /// Demand for the week starting on `start_date`; missing, negative, or non-finite entries read as 1.0.
    pub fn demand_index(&self, start_date: NaiveDate) -> f64 {
        self.demand_index_by_week
            .get(&start_date.format("%Y-%m-%d").to_string())
            .copied()
            .filter(|index| index.is_finite() && *index >= 0.0)
            .unwrap_or(1.0)
    }
}

/// Stay window stored on a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingStay {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingUnit {
    pub unit_type: String,
    #[serde(default)]
    pub features: UnitFeatures,
}

/// Valuation snapshot written onto a listing by the authoritative scoring path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingValuation {
    pub credit_value: u32,
    pub trade_value_score: u8,
    pub market_value_usd: f64,
    pub adjusted_value_usd: f64,
    pub breakdown: ValuationBreakdown,
    pub explain: String,
    pub updated_at: DateTime<Utc>,
}

/// Listing as held by the listing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub listing_id: ListingId,
    pub resort_id: ResortId,
    pub stay: ListingStay,
    pub unit: ListingUnit,
    #[serde(default)]
    pub maintenance_fee_usd: Option<f64>,
    #[serde(default)]
    pub valuation: Option<ListingValuation>,
}

impl ListingRecord {
    pub fn credit_value(&self) -> Option<u32> {
        self.valuation.as_ref().map(|valuation| valuation.credit_value)
    }

    pub fn trade_value_score(&self) -> Option<u8> {
        self.valuation
            .as_ref()
            .map(|valuation| valuation.trade_value_score)
    }

    /// Server-side input: guest certificates allowed, neutral history and lead time.
    pub fn valuation_input(&self) -> ValuationInput {
        ValuationInput {
            resort_id: self.resort_id.clone(),
            start_date: self.stay.start_date,
            end_date: self.stay.end_date,
            unit_type: self.unit.unit_type.clone(),
            features: self.unit.features,
            maintenance_fee_usd: self.maintenance_fee_usd,
            flexibility: Flexibility {
                guest_cert_allowed: true,
            },
            history_index: Some(1.0),
            lead_time_index: Some(1.0),
        }
    }
}

/// Compact reply of the authoritative scoring path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingScore {
    pub credit_value: u32,
    pub trade_value_score: u8,
    pub explain: String,
}

pub const ESTIMATE_DISCLAIMER: &str = "Estimate only. Final value may adjust after verification.";

/// Analytics entry appended for every successful pre-deposit estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub input: ValuationInput,
    pub score: u8,
    pub estimated_credits: u32,
    pub breakdown: ValuationBreakdown,
    pub disclaimer: String,
    pub created_at: DateTime<Utc>,
}
