use serde::{Deserialize, Serialize};

use super::domain::{OfferContext, OfferTier};
use crate::valuation::Season;

/// Check-ins closer than this many days count as urgent.
pub const URGENT_CHECK_IN_DAYS: u32 = 14;
/// Composite magnitude needed to move the badge one step.
pub const TIER_SHIFT_THRESHOLD: f64 = 0.5;
/// Demand-times-season strength that saturates the demand signal.
const DEMAND_SPREAD: f64 = 0.3;
/// Largest swing the composite applies to the acceptance estimate, in points.
const MAX_PROBABILITY_NUDGE: f64 = 5.0;

/// Weights for the soft modifiers. All zero means the ratio alone decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierWeights {
    #[serde(default)]
    pub check_in_urgency: f64,
    #[serde(default)]
    pub demand_strength: f64,
    #[serde(default)]
    pub requester_trust: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Modifier {
    CheckInUrgency,
    DemandStrength,
    RequesterTrust,
}

/// Weighted modifier contributions for one offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ModifierScore {
    pub urgency: f64,
    pub demand: f64,
    pub trust: f64,
}

impl ModifierScore {
    pub fn evaluate(context: &OfferContext, weights: &ModifierWeights) -> Self {
        Self {
            urgency: weights.check_in_urgency * urgency_signal(context.days_to_check_in),
            demand: weights.demand_strength * demand_signal(context.demand_index, context.season),
            trust: weights.requester_trust * trust_signal(context),
        }
    }

    pub fn composite(&self) -> f64 {
        self.urgency + self.demand + self.trust
    }

    /// Move at most one step in either direction.
    pub fn shift(&self, tier: OfferTier) -> OfferTier {
        let composite = self.composite();
        if composite >= TIER_SHIFT_THRESHOLD {
            tier.step_up()
        } else if composite <= -TIER_SHIFT_THRESHOLD {
            tier.step_down()
        } else {
            tier
        }
    }

    pub fn probability_nudge(&self) -> i16 {
        (self.composite() * MAX_PROBABILITY_NUDGE)
            .round()
            .clamp(-MAX_PROBABILITY_NUDGE, MAX_PROBABILITY_NUDGE) as i16
    }

    /// Largest non-zero contribution; ties resolve in declaration order.
    pub fn dominant(&self) -> Option<(Modifier, f64)> {
        [
            (Modifier::CheckInUrgency, self.urgency),
            (Modifier::DemandStrength, self.demand),
            (Modifier::RequesterTrust, self.trust),
        ]
        .into_iter()
        .filter(|(_, value)| *value != 0.0)
        .fold(None, |best: Option<(Modifier, f64)>, candidate| match best {
            Some(current) if current.1.abs() >= candidate.1.abs() => Some(current),
            _ => Some(candidate),
        })
    }
}

/// -1 at check-in day, 0 once the stay is at least the urgency window away.
fn urgency_signal(days_to_check_in: Option<u32>) -> f64 {
    match days_to_check_in {
        Some(days) if days < URGENT_CHECK_IN_DAYS => {
            -f64::from(URGENT_CHECK_IN_DAYS - days) / f64::from(URGENT_CHECK_IN_DAYS)
        }
        _ => 0.0,
    }
}

/// Strong weeks tolerate lower offers, so demand above typical reads positive.
fn demand_signal(demand_index: Option<f64>, season: Option<Season>) -> f64 {
    let demand = demand_index
        .filter(|index| index.is_finite() && *index > 0.0)
        .unwrap_or(1.0);
    let strength = demand * season.map(Season::index).unwrap_or(1.0);
    ((strength - 1.0) / DEMAND_SPREAD).clamp(-1.0, 1.0)
}

fn trust_signal(context: &OfferContext) -> f64 {
    if context.requester.vip {
        1.0
    } else if context.requester.trusted {
        0.5
    } else {
        0.0
    }
}

pub(crate) fn describe(modifier: Modifier, value: f64, context: &OfferContext) -> &'static str {
    match modifier {
        Modifier::CheckInUrgency => "Check-in soon",
        Modifier::DemandStrength => match (context.season, value > 0.0) {
            (Some(Season::Peak), true) => "Peak season",
            (_, true) => "High demand week",
            (Some(Season::Off), false) => "Off season",
            (_, false) => "Soft demand week",
        },
        Modifier::RequesterTrust => {
            if context.requester.vip {
                "VIP requester"
            } else {
                "Trusted requester"
            }
        }
    }
}

pub(crate) fn season_note(season: Season) -> &'static str {
    match season {
        Season::Peak => "Peak season",
        Season::Shoulder => "Shoulder season",
        Season::Off => "Off season",
    }
}
