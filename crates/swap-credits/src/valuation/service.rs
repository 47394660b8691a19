use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::admin::AdminConfig;
use super::domain::{
    EstimateRecord, ListingId, ListingRecord, ListingScore, ListingValuation,
    RegionSeasonalData, ResortId, ResortRef, ValuationInput, ESTIMATE_DISCLAIMER,
};
use super::engine::{indices, ValuationEngine, ValuationError, ValuationResult};
use super::repository::{ConfigStore, EstimateLog, ListingStore, ReferenceStore, StoreError};
use crate::offers::{OfferContext, OfferInput, OfferRanking, OfferRankingPolicy, RankingError};

/// Offer as submitted against a listed week, before credit values are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub listing_id: ListingId,
    #[serde(default)]
    pub offered_listing_id: Option<ListingId>,
    #[serde(default)]
    pub offered_credits: u32,
    #[serde(default)]
    pub context: OfferContext,
}

/// Service composing the stores, the valuation engine, and the offer policy.
pub struct ValuationService<C, R, L, E> {
    configs: Arc<C>,
    references: Arc<R>,
    listings: Arc<L>,
    estimates: Arc<E>,
    engine: Arc<ValuationEngine>,
    policy: Arc<OfferRankingPolicy>,
}

impl<C, R, L, E> ValuationService<C, R, L, E>
where
    C: ConfigStore + 'static,
    R: ReferenceStore + 'static,
    L: ListingStore + 'static,
    E: EstimateLog + 'static,
{
    pub fn new(
        configs: Arc<C>,
        references: Arc<R>,
        listings: Arc<L>,
        estimates: Arc<E>,
        policy: OfferRankingPolicy,
    ) -> Self {
        Self {
            configs,
            references,
            listings,
            estimates,
            engine: Arc::new(ValuationEngine::default()),
            policy: Arc::new(policy),
        }
    }

    pub fn with_engine(mut self, engine: ValuationEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    pub fn policy(&self) -> &OfferRankingPolicy {
        &self.policy
    }

    /// Pre-deposit estimate. Nothing is returned unless the full valuation succeeds.
    #[instrument(skip(self, input), fields(resort_id = %input.resort_id))]
    pub async fn estimate(
        &self,
        input: ValuationInput,
    ) -> Result<ValuationResult, ValuationServiceError> {
        let result = self.value(&input).await?;

        let record = EstimateRecord {
            input,
            score: result.trade_value_score,
            estimated_credits: result.credits,
            breakdown: result.breakdown.clone(),
            disclaimer: ESTIMATE_DISCLAIMER.to_string(),
            created_at: Utc::now(),
        };
        if let Err(err) = self.estimates.record(record).await {
            warn!(error = %err, "estimate log write failed; returning estimate anyway");
        }

        info!(
            credits = result.credits,
            score = result.trade_value_score,
            nights = result.nights,
            "estimate computed"
        );
        Ok(result)
    }

    /// Server-authoritative scoring. The listing is written once, after the valuation succeeds.
    #[instrument(skip(self, listing_id), fields(listing_id = %listing_id))]
    pub async fn score_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<ListingScore, ValuationServiceError> {
        let listing = self.listing(listing_id).await?;
        let result = self.value(&listing.valuation_input()).await?;

        let valuation = ListingValuation {
            credit_value: result.credits,
            trade_value_score: result.trade_value_score,
            market_value_usd: result.market_value_usd,
            adjusted_value_usd: result.adjusted_value_usd,
            breakdown: result.breakdown,
            explain: result.explanation.clone(),
            updated_at: Utc::now(),
        };
        self.listings
            .update_valuation(listing_id, valuation)
            .await?;

        info!(
            credit_value = result.credits,
            score = result.trade_value_score,
            "listing valuation stored"
        );
        Ok(ListingScore {
            credit_value: result.credits,
            trade_value_score: result.trade_value_score,
            explain: result.explanation,
        })
    }

    /// Rank an offer using the credit values stored on both listings.
    #[instrument(skip(self, request), fields(listing_id = %request.listing_id))]
    pub async fn rank_offer(
        &self,
        request: OfferRequest,
    ) -> Result<OfferRanking, ValuationServiceError> {
        let offered = async {
            match &request.offered_listing_id {
                Some(id) => self.listing(id).await.map(Some),
                None => Ok(None),
            }
        };
        let (target, offered) = tokio::try_join!(self.listing(&request.listing_id), offered)?;

        let target_week_credit_value = target
            .credit_value()
            .ok_or(ValuationServiceError::Ranking(RankingError::InvalidTarget))?;
        let offered_week_credit_value = match offered {
            Some(listing) => Some(
                listing
                    .credit_value()
                    .ok_or_else(|| ValuationServiceError::ListingNotValued(listing.listing_id))?,
            ),
            None => None,
        };

        let ranking = self.policy.rank(&OfferInput {
            target_week_credit_value,
            offered_week_credit_value,
            offered_credits: request.offered_credits,
            context: request.context,
        })?;

        debug!(rank = %ranking.ai_rank, ratio = ranking.ratio_pct, "offer ranked");
        Ok(ranking)
    }

    async fn value(&self, input: &ValuationInput) -> Result<ValuationResult, ValuationServiceError> {
        let (config, resort) =
            tokio::try_join!(self.admin_config(), self.resort(&input.resort_id))?;

        indices::stay_nights(input.start_date, input.end_date)?;
        let region = self.region(&resort.region_id).await?;

        Ok(self.engine.evaluate(input, &config, &region, &resort)?)
    }

    async fn admin_config(&self) -> Result<AdminConfig, ValuationServiceError> {
        self.configs
            .admin_config()
            .await?
            .ok_or(ValuationServiceError::Valuation(ValuationError::ConfigMissing))
    }

    async fn resort(&self, resort_id: &ResortId) -> Result<ResortRef, ValuationServiceError> {
        self.references.resort(resort_id).await?.ok_or_else(|| {
            ValuationServiceError::Valuation(ValuationError::ResortNotFound {
                resort_id: resort_id.clone(),
            })
        })
    }

    async fn region(&self, region_id: &str) -> Result<RegionSeasonalData, ValuationServiceError> {
        self.references.region(region_id).await?.ok_or_else(|| {
            ValuationServiceError::Valuation(ValuationError::RegionDataMissing {
                region_id: region_id.to_string(),
            })
        })
    }

    async fn listing(&self, listing_id: &ListingId) -> Result<ListingRecord, ValuationServiceError> {
        self.listings
            .fetch(listing_id)
            .await?
            .ok_or_else(|| ValuationServiceError::ListingNotFound(listing_id.clone()))
    }
}

/// Error raised by the valuation service.
#[derive(Debug, thiserror::Error)]
pub enum ValuationServiceError {
    #[error(transparent)]
    Valuation(#[from] ValuationError),
    #[error(transparent)]
    Ranking(#[from] RankingError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("listing {0} not found")]
    ListingNotFound(ListingId),
    #[error("listing {0} has not been valued yet")]
    ListingNotValued(ListingId),
}
