use std::fmt;

use serde::{Deserialize, Serialize};

use crate::valuation::Season;

/// How the requester proposes to pay for the target week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    CreditsOnly,
    TradeOnly,
    Hybrid,
}

impl OfferKind {
    pub fn label(self) -> &'static str {
        match self {
            OfferKind::CreditsOnly => "credits only",
            OfferKind::TradeOnly => "trade only",
            OfferKind::Hybrid => "trade plus credits",
        }
    }
}

/// Five-step fairness badge, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferTier {
    Low,
    LeaningLow,
    Fair,
    Good,
    Great,
}

impl OfferTier {
    pub const ALL: [OfferTier; 5] = [
        OfferTier::Low,
        OfferTier::LeaningLow,
        OfferTier::Fair,
        OfferTier::Good,
        OfferTier::Great,
    ];

    pub fn step_up(self) -> Self {
        match self {
            OfferTier::Low => OfferTier::LeaningLow,
            OfferTier::LeaningLow => OfferTier::Fair,
            OfferTier::Fair => OfferTier::Good,
            OfferTier::Good | OfferTier::Great => OfferTier::Great,
        }
    }

    pub fn step_down(self) -> Self {
        match self {
            OfferTier::Great => OfferTier::Good,
            OfferTier::Good => OfferTier::Fair,
            OfferTier::Fair => OfferTier::LeaningLow,
            OfferTier::LeaningLow | OfferTier::Low => OfferTier::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OfferTier::Low => "low",
            OfferTier::LeaningLow => "leaning-low",
            OfferTier::Fair => "fair",
            OfferTier::Good => "good",
            OfferTier::Great => "great",
        }
    }
}

impl fmt::Display for OfferTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three-step badge written by older clients. Superseded by [`OfferTier`].
#[deprecated(note = "use OfferTier; the three-step badge loses leaning-low and good")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyRank {
    Low,
    Fair,
    Great,
}

#[allow(deprecated)]
impl From<OfferTier> for LegacyRank {
    fn from(tier: OfferTier) -> Self {
        match tier {
            OfferTier::Low | OfferTier::LeaningLow => LegacyRank::Low,
            OfferTier::Fair => LegacyRank::Fair,
            OfferTier::Good | OfferTier::Great => LegacyRank::Great,
        }
    }
}

#[allow(deprecated)]
impl From<LegacyRank> for OfferTier {
    fn from(rank: LegacyRank) -> Self {
        match rank {
            LegacyRank::Low => OfferTier::Low,
            LegacyRank::Fair => OfferTier::Fair,
            LegacyRank::Great => OfferTier::Great,
        }
    }
}

/// Standing of the member making the offer. VIP status comes from the loyalty ladder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterStanding {
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub vip: bool,
}

/// Soft signals around an offer. Every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferContext {
    #[serde(default)]
    pub days_to_check_in: Option<u32>,
    /// Demand index of the target week; 1.0 is typical.
    #[serde(default)]
    pub demand_index: Option<f64>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub requester: RequesterStanding,
}

/// Offer against a target week, expressed in credit values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferInput {
    #[serde(default)]
    pub target_week_credit_value: u32,
    #[serde(default)]
    pub offered_week_credit_value: Option<u32>,
    #[serde(default)]
    pub offered_credits: u32,
    #[serde(default)]
    pub context: OfferContext,
}

impl OfferInput {
    /// Kind by precedence: a traded week makes it trade-only or hybrid, otherwise credits-only.
    pub fn kind(&self) -> OfferKind {
        match (self.offered_week_credit_value, self.offered_credits) {
            (None, _) => OfferKind::CreditsOnly,
            (Some(_), 0) => OfferKind::TradeOnly,
            (Some(_), _) => OfferKind::Hybrid,
        }
    }

    /// Total credit value put on the table.
    pub fn offer_value(&self) -> u64 {
        u64::from(self.offered_week_credit_value.unwrap_or(0)) + u64::from(self.offered_credits)
    }
}

/// Ranking returned to the offer card and the offer coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRanking {
    pub ai_rank: OfferTier,
    /// Tier from the ratio alone, before soft modifiers.
    pub base_rank: OfferTier,
    pub offer_kind: OfferKind,
    pub ratio_pct: f64,
    pub explanation: String,
    pub suggested_top_up: u32,
    pub acceptance_probability: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("target week has no credit value to compare against")]
    InvalidTarget,
    #[error("offer carries neither a week nor credits")]
    EmptyOffer,
}
