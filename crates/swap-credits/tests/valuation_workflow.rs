use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use swap_credits::offers::{OfferContext, OfferInput, OfferRankingPolicy, OfferTier};
use swap_credits::valuation::{
    AdminConfig, Flexibility, RegionSeasonalData, ResortId, ResortRef, SeasonalRates,
    UnitFeatures, ValuationEngine, ValuationInput,
};

fn region(adr: f64) -> RegionSeasonalData {
    RegionSeasonalData {
        region_id: "caribbean".to_string(),
        adr_base_by_season: SeasonalRates {
            off: Some(adr * 0.7),
            shoulder: Some(adr * 0.85),
            peak: Some(adr),
        },
        demand_index_by_week: Default::default(),
    }
}

fn resort(tier: &str) -> ResortRef {
    ResortRef {
        resort_id: ResortId("aruba-palm".to_string()),
        region_id: "caribbean".to_string(),
        tier: Some(tier.to_string()),
        name: None,
    }
}

fn stay(month: u32, day: u32, nights: i64) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(2026, month, day).expect("valid start date");
    (start, start + Duration::days(nights))
}

fn trade(target: u32, week: u32) -> OfferInput {
    OfferInput {
        target_week_credit_value: target,
        offered_week_credit_value: Some(week),
        offered_credits: 0,
        context: OfferContext::default(),
    }
}

#[test]
fn estimate_then_rank_against_it() {
    let engine = ValuationEngine::default();
    let config = AdminConfig::default();
    let (start_date, end_date) = stay(8, 1, 7);

    let target = engine
        .evaluate(
            &ValuationInput {
                resort_id: ResortId("aruba-palm".to_string()),
                start_date,
                end_date,
                unit_type: "2br".to_string(),
                features: UnitFeatures {
                    kitchen: true,
                    premium_view: true,
                },
                maintenance_fee_usd: Some(1_800.0),
                flexibility: Flexibility::default(),
                history_index: None,
                lead_time_index: None,
            },
            &config,
            &region(250.0),
            &resort("lux"),
        )
        .expect("target week valued");
    assert_eq!(target.credits, 10_000, "lux 2br peak week hits the total cap");

    let policy = OfferRankingPolicy::default();
    let ranking = policy
        .rank(&trade(target.credits, 9_000))
        .expect("offer ranked");
    assert_eq!(ranking.ai_rank, OfferTier::LeaningLow);
    assert_eq!(ranking.suggested_top_up, 500);

    let topped_up = policy
        .rank(&OfferInput {
            offered_credits: ranking.suggested_top_up,
            ..trade(target.credits, 9_000)
        })
        .expect("topped-up offer ranked");
    assert_eq!(topped_up.ai_rank, OfferTier::Fair);
}

proptest! {
    #[test]
    fn credits_land_on_step_within_guardrails(
        adr in 40.0..2_500.0f64,
        nights in 3i64..=7,
        month in 1u32..=12,
        day in 1u32..=28,
        unit in prop::sample::select(vec!["studio", "1br", "2br", "3br", "villa"]),
        tier in prop::sample::select(vec!["lux", "mid", "value"]),
        fee in prop::option::of(0.0..6_000.0f64),
        (kitchen, premium_view, guest_cert_allowed) in (any::<bool>(), any::<bool>(), any::<bool>()),
        (step, calibration_k) in (prop::sample::select(vec![25u32, 50, 100, 250]), 0.5..2.0f64),
        (per_night_min, per_night_span) in (101u32..400, 300u32..2_500),
        (total_min, total_max) in (300u32..1_500, 3_300u32..30_000),
        (demand, lead, history) in (
            prop::option::of(0.3..2.5f64),
            prop::option::of(0.8..1.2f64),
            prop::option::of(0.5..1.5f64),
        ),
    ) {
        let config = AdminConfig {
            rounding_step: step,
            calibration_k,
            per_night_min_credits: per_night_min,
            per_night_max_credits: per_night_min + per_night_span,
            total_min_credits: total_min,
            total_max_credits: total_max,
            ..AdminConfig::default()
        };
        prop_assume!(config.validate().is_ok());

        let (start_date, end_date) = stay(month, day, nights);
        let mut seasonal = region(adr);
        if let Some(demand) = demand {
            seasonal
                .demand_index_by_week
                .insert(start_date.format("%Y-%m-%d").to_string(), demand);
        }
        let input = ValuationInput {
            resort_id: ResortId("aruba-palm".to_string()),
            start_date,
            end_date,
            unit_type: unit.to_string(),
            features: UnitFeatures { kitchen, premium_view },
            maintenance_fee_usd: fee,
            flexibility: Flexibility { guest_cert_allowed },
            history_index: history,
            lead_time_index: lead,
        };

        let result = ValuationEngine::default()
            .evaluate(&input, &config, &seasonal, &resort(tier))
            .expect("valid inputs value cleanly");

        let range = config.guardrails_for(result.nights);
        prop_assert_eq!(result.credits % step, 0);
        prop_assert!(result.credits >= range.min && result.credits <= range.max);
        prop_assert!(result.trade_value_score <= 100);
    }

    #[test]
    fn better_trades_never_lower_acceptance(
        target in 1u32..200_000,
        low in 0u32..300_000,
        extra in 0u32..100_000,
    ) {
        let policy = OfferRankingPolicy::default();
        let weaker = policy.rank(&trade(target, low)).expect("weaker offer ranked");
        let stronger = policy.rank(&trade(target, low + extra)).expect("stronger offer ranked");

        prop_assert!(weaker.ai_rank <= stronger.ai_rank);
        prop_assert!(weaker.acceptance_probability <= stronger.acceptance_probability);
    }

    #[test]
    fn top_up_reaches_the_next_band(target in 1_000u32..200_000, week in 0u32..300_000) {
        let policy = OfferRankingPolicy::default();
        let ranking = policy.rank(&trade(target, week)).expect("offer ranked");
        prop_assume!(ranking.ai_rank != OfferTier::Great);

        let topped_up = policy
            .rank(&OfferInput {
                offered_credits: ranking.suggested_top_up,
                ..trade(target, week)
            })
            .expect("topped-up offer ranked");
        prop_assert_eq!(topped_up.base_rank, ranking.base_rank.step_up());
    }
}
