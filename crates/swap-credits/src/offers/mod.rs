//! Offer fairness ranking.
//!
//! An offer is compared with the target week's credit value, banded into one of five tiers, and
//! then nudged at most one step by the soft modifiers configured in [`ModifierWeights`].

pub mod domain;
mod modifiers;
mod thresholds;

#[allow(deprecated)]
pub use domain::LegacyRank;
pub use domain::{
    OfferContext, OfferInput, OfferKind, OfferRanking, OfferTier, RankingError,
    RequesterStanding,
};
pub use modifiers::{ModifierWeights, TIER_SHIFT_THRESHOLD, URGENT_CHECK_IN_DAYS};

use crate::valuation::Roundable;
use modifiers::ModifierScore;

/// Stateless ranking policy. Cheap to clone and safe to share across requests.
#[derive(Debug, Clone, Default)]
pub struct OfferRankingPolicy {
    weights: ModifierWeights,
}

impl OfferRankingPolicy {
    pub fn new(weights: ModifierWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ModifierWeights {
        &self.weights
    }

    pub fn rank(&self, offer: &OfferInput) -> Result<OfferRanking, RankingError> {
        let target = u64::from(offer.target_week_credit_value);
        if target == 0 {
            return Err(RankingError::InvalidTarget);
        }

        let kind = offer.kind();
        let offer_value = offer.offer_value();
        if kind == OfferKind::CreditsOnly && offer_value == 0 {
            return Err(RankingError::EmptyOffer);
        }

        let ratio_pct = offer_value as f64 * 100.0 / target as f64;
        let base_rank = thresholds::base_tier(kind, offer_value, target);

        let score = ModifierScore::evaluate(&offer.context, &self.weights);
        let ai_rank = score.shift(base_rank);

        let suggested_top_up = if ai_rank == OfferTier::Great {
            0
        } else {
            thresholds::top_up_to_next_band(kind, base_rank, offer_value, target)
        };

        Ok(OfferRanking {
            ai_rank,
            base_rank,
            offer_kind: kind,
            ratio_pct: ratio_pct.round_2(),
            explanation: explain(ratio_pct, &score, &offer.context),
            suggested_top_up,
            acceptance_probability: acceptance_probability(ai_rank, &score),
        })
    }
}

fn tier_base_probability(tier: OfferTier) -> i16 {
    match tier {
        OfferTier::Low => 10,
        OfferTier::LeaningLow => 30,
        OfferTier::Fair => 55,
        OfferTier::Good => 75,
        OfferTier::Great => 90,
    }
}

/// Tier bases sit 15+ points apart and the nudge is capped at 5, so ordering by tier holds.
fn acceptance_probability(tier: OfferTier, score: &ModifierScore) -> u8 {
    (tier_base_probability(tier) + score.probability_nudge()).clamp(0, 100) as u8
}

fn explain(ratio_pct: f64, score: &ModifierScore, context: &OfferContext) -> String {
    let mut parts = vec![format!("Value vs typical: {:.0}%", ratio_pct)];

    let note = match score.dominant() {
        Some((modifier, value)) => Some(modifiers::describe(modifier, value, context)),
        None => context.season.map(modifiers::season_note),
    };
    if let Some(note) = note {
        parts.push(note.to_string());
    }

    parts.join(" • ")
}
