//! Ratio bands per offer kind.
//!
//! Credits-only offers read inverted: the lower the ratio, the better the badge. Trade and hybrid
//! offers improve as the ratio rises. Comparisons run on integers (`value * 100` against
//! `percent * target`) so band edges are exact.

use super::domain::{OfferKind, OfferTier};

/// Credits-only band edges, in percent of the target's credit value.
const CREDITS_LOW_ABOVE: u64 = 115;
const CREDITS_LEANING_LOW_ABOVE: u64 = 105;
const CREDITS_FAIR_FROM: u64 = 95;
const CREDITS_GOOD_FROM: u64 = 85;

/// Trade and hybrid band edges.
const TRADE_LEANING_LOW_FROM: u64 = 85;
const TRADE_FAIR_FROM: u64 = 95;
const TRADE_GOOD_ABOVE: u64 = 105;
const TRADE_GREAT_ABOVE: u64 = 120;

pub(crate) fn base_tier(kind: OfferKind, offer_value: u64, target: u64) -> OfferTier {
    let scaled = offer_value * 100;
    let edge = |percent: u64| percent * target;

    match kind {
        OfferKind::CreditsOnly => {
            if scaled > edge(CREDITS_LOW_ABOVE) {
                OfferTier::Low
            } else if scaled > edge(CREDITS_LEANING_LOW_ABOVE) {
                OfferTier::LeaningLow
            } else if scaled >= edge(CREDITS_FAIR_FROM) {
                OfferTier::Fair
            } else if scaled >= edge(CREDITS_GOOD_FROM) {
                OfferTier::Good
            } else {
                OfferTier::Great
            }
        }
        OfferKind::TradeOnly | OfferKind::Hybrid => {
            if scaled < edge(TRADE_LEANING_LOW_FROM) {
                OfferTier::Low
            } else if scaled < edge(TRADE_FAIR_FROM) {
                OfferTier::LeaningLow
            } else if scaled <= edge(TRADE_GOOD_ABOVE) {
                OfferTier::Fair
            } else if scaled <= edge(TRADE_GREAT_ABOVE) {
                OfferTier::Good
            } else {
                OfferTier::Great
            }
        }
    }
}

/// Smallest offer value that reaches the band above `tier`, for trade and hybrid offers.
fn next_band_floor(tier: OfferTier, target: u64) -> Option<u64> {
    let at_least = |percent: u64| (percent * target).div_ceil(100);
    let above = |percent: u64| percent * target / 100 + 1;

    match tier {
        OfferTier::Low => Some(at_least(TRADE_LEANING_LOW_FROM)),
        OfferTier::LeaningLow => Some(at_least(TRADE_FAIR_FROM)),
        OfferTier::Fair => Some(above(TRADE_GOOD_ABOVE)),
        OfferTier::Good => Some(above(TRADE_GREAT_ABOVE)),
        OfferTier::Great => None,
    }
}

/// Credits to add so the ratio crosses into the next-better band.
///
/// Credits-only offers never improve by adding credits, so they get no top-up.
pub(crate) fn top_up_to_next_band(
    kind: OfferKind,
    tier: OfferTier,
    offer_value: u64,
    target: u64,
) -> u32 {
    if kind == OfferKind::CreditsOnly {
        return 0;
    }

    next_band_floor(tier, target)
        .map(|floor| floor.saturating_sub(offer_value))
        .map(|top_up| u32::try_from(top_up).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
