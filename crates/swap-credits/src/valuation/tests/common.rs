use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::offers::OfferRankingPolicy;
use crate::valuation::admin::AdminConfig;
use crate::valuation::domain::{
    EstimateRecord, ListingId, ListingRecord, ListingStay, ListingUnit, ListingValuation,
    RegionSeasonalData, ResortId, ResortRef, SeasonalRates, UnitFeatures, ValuationInput,
};
use crate::valuation::engine::ValuationEngine;
use crate::valuation::repository::{
    ConfigStore, EstimateLog, ListingStore, ReferenceStore, StoreError,
};
use crate::valuation::ValuationService;

pub(super) const RESORT: &str = "kaanapali-beach";
pub(super) const REGION: &str = "maui";
pub(super) const TARGET: &str = "wk-target";
pub(super) const OFFERED: &str = "wk-offered";
pub(super) const UNVALUED: &str = "wk-unvalued";

pub(super) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

/// Defaults with guardrails wide enough that a 5-night peak week is not clamped.
pub(super) fn admin_config() -> AdminConfig {
    AdminConfig {
        per_night_max_credits: 5_000,
        total_max_credits: 50_000,
        ..AdminConfig::default()
    }
}

pub(super) fn resort() -> ResortRef {
    ResortRef {
        resort_id: ResortId(RESORT.to_string()),
        region_id: REGION.to_string(),
        tier: Some("mid".to_string()),
        name: Some("Kaanapali Beach Club".to_string()),
    }
}

pub(super) fn region() -> RegionSeasonalData {
    RegionSeasonalData {
        region_id: REGION.to_string(),
        adr_base_by_season: SeasonalRates {
            off: Some(180.0),
            shoulder: Some(220.0),
            peak: Some(300.0),
        },
        demand_index_by_week: Default::default(),
    }
}

/// Five July nights in a plain one-bedroom.
pub(super) fn input() -> ValuationInput {
    ValuationInput {
        resort_id: ResortId(RESORT.to_string()),
        start_date: date(7, 5),
        end_date: date(7, 10),
        unit_type: "1br".to_string(),
        features: UnitFeatures::default(),
        maintenance_fee_usd: None,
        flexibility: Default::default(),
        history_index: None,
        lead_time_index: None,
    }
}

pub(super) fn engine() -> ValuationEngine {
    ValuationEngine::default()
}

pub(super) fn listing(id: &str, credit_value: Option<u32>) -> ListingRecord {
    let valuation = credit_value.map(|credits| {
        let result = engine()
            .evaluate(&input(), &admin_config(), &region(), &resort())
            .expect("fixture valuation");
        ListingValuation {
            credit_value: credits,
            trade_value_score: result.trade_value_score,
            market_value_usd: result.market_value_usd,
            adjusted_value_usd: result.adjusted_value_usd,
            breakdown: result.breakdown,
            explain: result.explanation,
            updated_at: Utc::now(),
        }
    });

    ListingRecord {
        listing_id: ListingId(id.to_string()),
        resort_id: ResortId(RESORT.to_string()),
        stay: ListingStay {
            start_date: date(7, 5),
            end_date: date(7, 10),
        },
        unit: ListingUnit {
            unit_type: "1br".to_string(),
            features: UnitFeatures::default(),
        },
        maintenance_fee_usd: None,
        valuation,
    }
}

pub(super) type TestService =
    ValuationService<MemoryConfigStore, MemoryReferences, MemoryListings, MemoryEstimates>;

pub(super) fn build_service() -> (TestService, Arc<MemoryListings>, Arc<MemoryEstimates>) {
    let listings = Arc::new(MemoryListings::with_records([
        listing(TARGET, Some(10_000)),
        listing(OFFERED, Some(9_800)),
        listing(UNVALUED, None),
    ]));
    let estimates = Arc::new(MemoryEstimates::default());
    let service = ValuationService::new(
        Arc::new(MemoryConfigStore::new(Some(admin_config()))),
        Arc::new(MemoryReferences::standard()),
        listings.clone(),
        estimates.clone(),
        OfferRankingPolicy::default(),
    );
    (service, listings, estimates)
}

pub(super) struct MemoryConfigStore {
    config: Option<AdminConfig>,
}

impl MemoryConfigStore {
    pub(super) fn new(config: Option<AdminConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn admin_config(&self) -> Result<Option<AdminConfig>, StoreError> {
        Ok(self.config.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryReferences {
    pub(super) resorts: HashMap<ResortId, ResortRef>,
    pub(super) regions: HashMap<String, RegionSeasonalData>,
}

impl MemoryReferences {
    pub(super) fn standard() -> Self {
        let resort = resort();
        let region = region();
        Self {
            resorts: HashMap::from([(resort.resort_id.clone(), resort)]),
            regions: HashMap::from([(region.region_id.clone(), region)]),
        }
    }
}

#[async_trait]
impl ReferenceStore for MemoryReferences {
    async fn resort(&self, resort_id: &ResortId) -> Result<Option<ResortRef>, StoreError> {
        Ok(self.resorts.get(resort_id).cloned())
    }

    async fn region(&self, region_id: &str) -> Result<Option<RegionSeasonalData>, StoreError> {
        Ok(self.regions.get(region_id).cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryListings {
    records: Mutex<HashMap<ListingId, ListingRecord>>,
    writes: Mutex<usize>,
    read_only: bool,
}

impl MemoryListings {
    pub(super) fn with_records(records: impl IntoIterator<Item = ListingRecord>) -> Self {
        Self {
            records: Mutex::new(
                records
                    .into_iter()
                    .map(|record| (record.listing_id.clone(), record))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Reads succeed, every write fails.
    pub(super) fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub(super) fn get(&self, id: &str) -> Option<ListingRecord> {
        self.records
            .lock()
            .expect("listing mutex poisoned")
            .get(&ListingId(id.to_string()))
            .cloned()
    }

    pub(super) fn writes(&self) -> usize {
        *self.writes.lock().expect("write counter poisoned")
    }
}

#[async_trait]
impl ListingStore for MemoryListings {
    async fn fetch(&self, listing_id: &ListingId) -> Result<Option<ListingRecord>, StoreError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard.get(listing_id).cloned())
    }

    async fn update_valuation(
        &self,
        listing_id: &ListingId,
        valuation: ListingValuation,
    ) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Unavailable("listing store is read only".to_string()));
        }
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        let record = guard.get_mut(listing_id).ok_or(StoreError::NotFound)?;
        record.valuation = Some(valuation);
        *self.writes.lock().expect("write counter poisoned") += 1;
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryEstimates {
    records: Mutex<Vec<EstimateRecord>>,
}

impl MemoryEstimates {
    pub(super) fn records(&self) -> Vec<EstimateRecord> {
        self.records.lock().expect("estimate mutex poisoned").clone()
    }
}

#[async_trait]
impl EstimateLog for MemoryEstimates {
    async fn record(&self, estimate: EstimateRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("estimate mutex poisoned")
            .push(estimate);
        Ok(())
    }
}

pub(super) struct UnavailableEstimates;

#[async_trait]
impl EstimateLog for UnavailableEstimates {
    async fn record(&self, _estimate: EstimateRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("analytics offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
