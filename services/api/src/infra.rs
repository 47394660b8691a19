use async_trait::async_trait;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use swap_credits::error::AppError;
use swap_credits::offers::OfferRankingPolicy;
use swap_credits::valuation::{
    AdminConfig, ConfigStore, EstimateLog, EstimateRecord, ListingId, ListingRecord,
    ListingStay, ListingStore, ListingUnit, ListingValuation, ReferenceStore,
    RegionSeasonalData, ResortId, ResortRef, Season, SeasonalRates, StoreError, UnitFeatures,
    ValuationService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ApiService = ValuationService<
    InMemoryConfigStore,
    InMemoryReferenceStore,
    InMemoryListingStore,
    InMemoryEstimateLog,
>;

/// Seed data for the in-memory stores, loaded from JSON or built in for demos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ReferenceDataset {
    #[serde(default)]
    pub(crate) admin_config: Option<AdminConfig>,
    #[serde(default)]
    pub(crate) resorts: Vec<ResortRef>,
    #[serde(default)]
    pub(crate) regions: Vec<RegionSeasonalData>,
    #[serde(default)]
    pub(crate) listings: Vec<ListingRecord>,
}

impl ReferenceDataset {
    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Falls back to the built-in demo data when no path is configured.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(demo_dataset()),
        }
    }

    pub(crate) fn unvalued_listings(&self) -> Vec<ListingId> {
        self.listings
            .iter()
            .filter(|listing| listing.valuation.is_none())
            .map(|listing| listing.listing_id.clone())
            .collect()
    }

    pub(crate) fn into_service(self, policy: OfferRankingPolicy) -> ApiService {
        ValuationService::new(
            Arc::new(InMemoryConfigStore::new(self.admin_config)),
            Arc::new(InMemoryReferenceStore::new(self.resorts, self.regions)),
            Arc::new(InMemoryListingStore::new(self.listings)),
            Arc::new(InMemoryEstimateLog::default()),
            policy,
        )
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryConfigStore {
    config: Option<AdminConfig>,
}

impl InMemoryConfigStore {
    pub(crate) fn new(config: Option<AdminConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn admin_config(&self) -> Result<Option<AdminConfig>, StoreError> {
        Ok(self.config.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReferenceStore {
    resorts: Arc<HashMap<ResortId, ResortRef>>,
    regions: Arc<HashMap<String, RegionSeasonalData>>,
}

impl InMemoryReferenceStore {
    pub(crate) fn new(resorts: Vec<ResortRef>, regions: Vec<RegionSeasonalData>) -> Self {
        Self {
            resorts: Arc::new(
                resorts
                    .into_iter()
                    .map(|resort| (resort.resort_id.clone(), resort))
                    .collect(),
            ),
            regions: Arc::new(
                regions
                    .into_iter()
                    .map(|region| (region.region_id.clone(), region))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl ReferenceStore for InMemoryReferenceStore {
    async fn resort(&self, resort_id: &ResortId) -> Result<Option<ResortRef>, StoreError> {
        Ok(self.resorts.get(resort_id).cloned())
    }

    async fn region(&self, region_id: &str) -> Result<Option<RegionSeasonalData>, StoreError> {
        Ok(self.regions.get(region_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryListingStore {
    records: Arc<Mutex<HashMap<ListingId, ListingRecord>>>,
}

impl InMemoryListingStore {
    pub(crate) fn new(listings: Vec<ListingRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(
                listings
                    .into_iter()
                    .map(|listing| (listing.listing_id.clone(), listing))
                    .collect(),
            )),
        }
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn fetch(&self, listing_id: &ListingId) -> Result<Option<ListingRecord>, StoreError> {
        let guard = self.records.lock().expect("listing mutex poisoned");
        Ok(guard.get(listing_id).cloned())
    }

    async fn update_valuation(
        &self,
        listing_id: &ListingId,
        valuation: ListingValuation,
    ) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("listing mutex poisoned");
        match guard.get_mut(listing_id) {
            Some(record) => {
                record.valuation = Some(valuation);
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEstimateLog {
    records: Arc<Mutex<Vec<EstimateRecord>>>,
}

#[async_trait]
impl EstimateLog for InMemoryEstimateLog {
    async fn record(&self, estimate: EstimateRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("estimate mutex poisoned");
        guard.push(estimate);
        Ok(())
    }
}

/// Two regions, three resorts, and a handful of unvalued weeks.
pub(crate) fn demo_dataset() -> ReferenceDataset {
    let resorts = vec![
        resort("kaanapali-beach", "maui", "lux", "Kaanapali Beach Club"),
        resort("lahaina-shores", "maui", "mid", "Lahaina Shores"),
        resort("palm-cove", "aruba", "value", "Palm Cove Villas"),
    ];
    let regions = vec![
        RegionSeasonalData {
            region_id: "maui".to_string(),
            adr_base_by_season: SeasonalRates {
                off: Some(210.0),
                shoulder: Some(260.0),
                peak: Some(320.0),
            },
            demand_index_by_week: [("2025-07-05".to_string(), 1.15)].into_iter().collect(),
        },
        RegionSeasonalData {
            region_id: "aruba".to_string(),
            adr_base_by_season: SeasonalRates {
                off: Some(150.0),
                shoulder: Some(185.0),
                peak: Some(240.0),
            },
            demand_index_by_week: Default::default(),
        },
    ];
    let listings = vec![
        listing("wk-kaanapali-0705", "kaanapali-beach", (7, 5), 7, "2br", 2_100.0),
        listing("wk-lahaina-1011", "lahaina-shores", (10, 11), 5, "1br", 900.0),
        listing("wk-palmcove-0201", "palm-cove", (2, 1), 7, "studio", 650.0),
    ];

    ReferenceDataset {
        admin_config: Some(AdminConfig::default()),
        resorts,
        regions,
        listings,
    }
}

fn resort(id: &str, region: &str, tier: &str, name: &str) -> ResortRef {
    ResortRef {
        resort_id: ResortId(id.to_string()),
        region_id: region.to_string(),
        tier: Some(tier.to_string()),
        name: Some(name.to_string()),
    }
}

fn listing(
    id: &str,
    resort_id: &str,
    (month, day): (u32, u32),
    nights: i64,
    unit_type: &str,
    maintenance_fee_usd: f64,
) -> ListingRecord {
    let start_date = NaiveDate::from_ymd_opt(2025, month, day).unwrap_or(NaiveDate::MIN);
    ListingRecord {
        listing_id: ListingId(id.to_string()),
        resort_id: ResortId(resort_id.to_string()),
        stay: ListingStay {
            start_date,
            end_date: start_date + chrono::Duration::days(nights),
        },
        unit: ListingUnit {
            unit_type: unit_type.to_string(),
            features: UnitFeatures {
                kitchen: unit_type != "studio",
                premium_view: false,
            },
        },
        maintenance_fee_usd: Some(maintenance_fee_usd),
        valuation: None,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_season(raw: &str) -> Result<Season, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "off" => Ok(Season::Off),
        "shoulder" => Ok(Season::Shoulder),
        "peak" => Ok(Season::Peak),
        other => Err(format!("unknown season '{other}' (expected off, shoulder, or peak)")),
    }
}
