mod guardrails;
pub mod indices;

pub use guardrails::{apply_guardrails, trade_value_score, Roundable, NOMINAL_CREDITS_PER_NIGHT};

use serde::{Deserialize, Serialize};

use super::admin::{AdminConfig, AdminConfigError, GuardrailRange};
use super::domain::{RegionSeasonalData, ResortId, ResortRef, ValuationInput};
use super::season::{Season, SeasonCalendar};

/// Stateless evaluator turning listing attributes into a credit price.
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    calendar: SeasonCalendar,
}

impl ValuationEngine {
    pub fn new(calendar: SeasonCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &SeasonCalendar {
        &self.calendar
    }

    /// Value a stay against one config snapshot and the resort's region data.
    pub fn evaluate(
        &self,
        input: &ValuationInput,
        config: &AdminConfig,
        region: &RegionSeasonalData,
        resort: &ResortRef,
    ) -> Result<ValuationResult, ValuationError> {
        config.validate()?;

        if region.region_id != resort.region_id {
            return Err(ValuationError::RegionDataMissing {
                region_id: resort.region_id.clone(),
            });
        }

        let nights = indices::stay_nights(input.start_date, input.end_date)?;
        validate_optional_inputs(input)?;

        let season = self.calendar.classify(input.start_date);
        let adr_base = region.adr_base_by_season.get(season).ok_or_else(|| {
            ValuationError::SeasonalRateMissing {
                region_id: region.region_id.clone(),
                season,
            }
        })?;
        let demand_index = region.demand_index(input.start_date);
        let season_index = season.index();

        let brand_tier_index = indices::brand_tier_index(config, resort.tier.as_deref());
        let unit_base_index = indices::unit_base_index(config, &input.unit_type);
        let (kitchen_bonus, premium_view_bonus) =
            indices::feature_bonuses(config, input.features);
        let unit_index = indices::unit_index(unit_base_index, kitchen_bonus, premium_view_bonus);

        let lead_index = input.lead_time_index.unwrap_or(1.0);
        let history_index = input.history_index.unwrap_or(1.0);
        let flex_index = indices::flex_index(input.flexibility);

        let market_value_usd = adr_base * f64::from(nights);
        let multiplier = demand_index
            * season_index
            * brand_tier_index
            * unit_index
            * lead_index
            * flex_index
            * history_index;
        let raw_usd = market_value_usd * multiplier;

        let mf_ratio = input
            .maintenance_fee_usd
            .map(|fee| indices::maintenance_fee_ratio(fee, raw_usd));
        let mf_index = mf_ratio.map(indices::maintenance_fee_index).unwrap_or(1.0);
        let adjusted_usd = raw_usd * mf_index;

        let credits_unclamped =
            (adjusted_usd / config.credit_price_usd_per_credit) * config.calibration_k;
        if !credits_unclamped.is_finite() {
            return Err(ValuationError::InvalidInput {
                field: "credits_unclamped",
                value: credits_unclamped,
            });
        }
        let guardrails = config.guardrails_for(nights);
        let credits = apply_guardrails(credits_unclamped, guardrails, config.rounding_step);
        let trade_value_score = trade_value_score(credits, nights);

        let breakdown = ValuationBreakdown {
            adr_base,
            season,
            demand_index,
            season_index,
            brand_tier_index,
            unit_base_index,
            kitchen_bonus,
            premium_view_bonus,
            unit_index,
            lead_index,
            flex_index,
            history_index,
            multiplier,
            raw_usd,
            mf_ratio,
            mf_index,
            calibration_k: config.calibration_k,
            credit_price_usd_per_credit: config.credit_price_usd_per_credit,
            credits_unclamped,
            guardrails,
        };
        let explanation = breakdown.explain(nights);

        Ok(ValuationResult {
            resort_id: input.resort_id.clone(),
            nights,
            credits,
            trade_value_score,
            market_value_usd: market_value_usd.round_2(),
            adjusted_value_usd: adjusted_usd.round_2(),
            breakdown,
            explanation,
        })
    }
}

fn validate_optional_inputs(input: &ValuationInput) -> Result<(), ValuationError> {
    let checks = [
        ("maintenance_fee_usd", input.maintenance_fee_usd),
        ("history_index", input.history_index),
        ("lead_time_index", input.lead_time_index),
    ];
    for (field, value) in checks {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                return Err(ValuationError::InvalidInput { field, value });
            }
        }
    }
    Ok(())
}

/// Every factor applied during a valuation, kept for audits and explanations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationBreakdown {
    pub adr_base: f64,
    pub season: Season,
    pub demand_index: f64,
    pub season_index: f64,
    pub brand_tier_index: f64,
    pub unit_base_index: f64,
    pub kitchen_bonus: f64,
    pub premium_view_bonus: f64,
    pub unit_index: f64,
    pub lead_index: f64,
    pub flex_index: f64,
    pub history_index: f64,
    pub multiplier: f64,
    pub raw_usd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mf_ratio: Option<f64>,
    pub mf_index: f64,
    pub calibration_k: f64,
    pub credit_price_usd_per_credit: f64,
    pub credits_unclamped: f64,
    pub guardrails: GuardrailRange,
}

impl ValuationBreakdown {
    pub fn explain(&self, nights: u32) -> String {
        let mf = if self.mf_ratio.is_some() {
            format!("MF ratio adjustment {:.2}", self.mf_index)
        } else {
            "MF not provided".to_string()
        };

        [
            format!(
                "Base from local ADR (${}/night) x {} nights",
                self.adr_base, nights
            ),
            format!(
                "Adjustments: demand {:.2}, season {:.2}, brand {:.2}, unit {:.2}, lead {:.2}, flex {:.2}, history {:.2}",
                self.demand_index,
                self.season_index,
                self.brand_tier_index,
                self.unit_index,
                self.lead_index,
                self.flex_index,
                self.history_index
            ),
            mf,
            format!("Calibration K {:.2}", self.calibration_k),
        ]
        .join(" • ")
    }
}

/// Valuation output for one stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub resort_id: ResortId,
    pub nights: u32,
    pub credits: u32,
    pub trade_value_score: u8,
    pub market_value_usd: f64,
    pub adjusted_value_usd: f64,
    pub breakdown: ValuationBreakdown,
    pub explanation: String,
}

/// Terminal valuation failures. None of them are retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValuationError {
    #[error("admin pricing configuration is missing")]
    ConfigMissing,
    #[error("resort {resort_id} not found")]
    ResortNotFound { resort_id: ResortId },
    #[error("reference data for region {region_id} is missing")]
    RegionDataMissing { region_id: String },
    #[error("no average daily rate for region {region_id} in {season} season")]
    SeasonalRateMissing { region_id: String, season: Season },
    #[error("stay must be 3-7 nights, got {nights}")]
    StayLengthInvalid { nights: i64 },
    #[error("{field} must be a finite non-negative number, found {value}")]
    InvalidInput { field: &'static str, value: f64 },
    #[error("invalid admin configuration: {0}")]
    InvalidConfig(#[from] AdminConfigError),
}
