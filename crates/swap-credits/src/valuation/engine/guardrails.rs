use super::super::admin::GuardrailRange;

/// Credits a mid-market week earns per night; anchors the desirability score.
pub const NOMINAL_CREDITS_PER_NIGHT: f64 = 2000.0;

pub trait Roundable {
    fn round_2(self) -> f64;
}

impl Roundable for f64 {
    #[inline(always)]
    fn round_2(self) -> f64 {
        (self * 100.0).round() / 100.0
    }
}

/// Clamp into the guardrails, then snap to the rounding step (half away from zero).
///
/// When the nearest multiple of `step` lands outside the range, the closest multiple inside
/// it is used instead. Admin config validation guarantees such a multiple exists.
/// A non-finite input lands on the lowest in-range multiple.
pub fn apply_guardrails(credits: f64, range: GuardrailRange, step: u32) -> u32 {
    let min = f64::from(range.min);
    let max = f64::from(range.max);
    let step = f64::from(step);

    let clamped = if credits.is_finite() {
        credits.clamp(min, max)
    } else {
        min
    };
    let mut rounded = (clamped / step).round() * step;
    if rounded < min {
        rounded = (min / step).ceil() * step;
    } else if rounded > max {
        rounded = (max / step).floor() * step;
    }

    rounded as u32
}

/// Normalized 0–100 score; a nominal week lands at 100, an empty one at 30.
pub fn trade_value_score(credits: u32, nights: u32) -> u8 {
    let nominal = NOMINAL_CREDITS_PER_NIGHT * f64::from(nights.max(1));
    let raw = (f64::from(credits) / nominal) * 70.0 + 30.0;
    raw.round().clamp(0.0, 100.0) as u8
}
