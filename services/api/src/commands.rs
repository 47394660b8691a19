use crate::infra::{parse_date, parse_season, ReferenceDataset};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use swap_credits::config::AppConfig;
use swap_credits::error::AppError;
use swap_credits::offers::{
    OfferContext, OfferInput, OfferRanking, OfferRankingPolicy, RequesterStanding,
};
use swap_credits::valuation::{Season, ValuationInput, ValuationResult};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// JSON file holding the valuation input
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// JSON reference dataset (defaults to APP_REFERENCE_DATA, then the built-in demo data)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Check-in date (YYYY-MM-DD) replacing the one in the input file
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Check-out date (YYYY-MM-DD) replacing the one in the input file
    #[arg(long, value_parser = parse_date)]
    pub(crate) end_date: Option<NaiveDate>,
}

impl EstimateArgs {
    fn apply_overrides(&self, mut input: ValuationInput) -> ValuationInput {
        if let Some(start_date) = self.start_date {
            input.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            input.end_date = end_date;
        }
        input
    }
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Credit value of the requested week
    #[arg(long)]
    pub(crate) target: u32,
    /// Credit value of the week offered in trade
    #[arg(long)]
    pub(crate) offered_week: Option<u32>,
    /// Credits offered on top of, or instead of, a week
    #[arg(long, default_value_t = 0)]
    pub(crate) offered_credits: u32,
    #[arg(long)]
    pub(crate) days_to_check_in: Option<u32>,
    #[arg(long)]
    pub(crate) demand_index: Option<f64>,
    /// off, shoulder, or peak
    #[arg(long, value_parser = parse_season)]
    pub(crate) season: Option<Season>,
    #[arg(long)]
    pub(crate) trusted: bool,
    #[arg(long)]
    pub(crate) vip: bool,
}

impl RankArgs {
    fn offer(&self) -> OfferInput {
        OfferInput {
            target_week_credit_value: self.target,
            offered_week_credit_value: self.offered_week,
            offered_credits: self.offered_credits,
            context: OfferContext {
                days_to_check_in: self.days_to_check_in,
                demand_index: self.demand_index,
                season: self.season,
                requester: RequesterStanding {
                    trusted: self.trusted,
                    vip: self.vip,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct EstimateReport<'a> {
    #[serde(flatten)]
    result: &'a ValuationResult,
    disclaimer: &'static str,
}

pub(crate) async fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = std::fs::read_to_string(&args.input)?;
    let input = args.apply_overrides(serde_json::from_str::<ValuationInput>(&raw)?);

    let dataset_path = args.dataset.or(config.reference_data);
    let service = ReferenceDataset::load(dataset_path.as_deref())?
        .into_service(OfferRankingPolicy::new(config.offer_weights));

    let result = service.estimate(input).await?;
    print_estimate(&result)
}

fn print_estimate(result: &ValuationResult) -> Result<(), AppError> {
    let report = EstimateReport {
        result,
        disclaimer: swap_credits::valuation::ESTIMATE_DISCLAIMER,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!();
    println!("{}", result.explanation);
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let policy = OfferRankingPolicy::new(config.offer_weights);
    let ranking = rank(&policy, &args)?;

    println!("{}", serde_json::to_string_pretty(&ranking)?);
    Ok(())
}

fn rank(policy: &OfferRankingPolicy, args: &RankArgs) -> Result<OfferRanking, AppError> {
    policy
        .rank(&args.offer())
        .map_err(|err| AppError::Valuation(err.into()))
}
