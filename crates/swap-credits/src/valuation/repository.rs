use async_trait::async_trait;

use super::admin::AdminConfig;
use super::domain::{
    EstimateRecord, ListingId, ListingRecord, ListingValuation, RegionSeasonalData, ResortId,
    ResortRef,
};

/// Source of the admin pricing document.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// `Ok(None)` when no config has been published.
    async fn admin_config(&self) -> Result<Option<AdminConfig>, StoreError>;
}

/// Read-only resort and region reference data.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn resort(&self, resort_id: &ResortId) -> Result<Option<ResortRef>, StoreError>;
    async fn region(&self, region_id: &str) -> Result<Option<RegionSeasonalData>, StoreError>;
}

/// Listing persistence used by the authoritative scoring and offer paths.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn fetch(&self, listing_id: &ListingId) -> Result<Option<ListingRecord>, StoreError>;

    /// Replace the listing's valuation in a single write.
    async fn update_valuation(
        &self,
        listing_id: &ListingId,
        valuation: ListingValuation,
    ) -> Result<(), StoreError>;
}

/// Append-only sink for pre-deposit estimates.
#[async_trait]
pub trait EstimateLog: Send + Sync {
    async fn record(&self, estimate: EstimateRecord) -> Result<(), StoreError>;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
