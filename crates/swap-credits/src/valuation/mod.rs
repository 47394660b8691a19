//! Listing valuation: admin config, reference data, the pricing engine, and the service that
//! wires them to their stores.

pub mod admin;
pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod season;
pub mod service;

#[cfg(test)]
mod tests;

pub use admin::{AdminConfig, AdminConfigError, GuardrailRange, IndexTables};
pub use domain::{
    EstimateRecord, Flexibility, ListingId, ListingRecord, ListingScore, ListingStay,
    ListingUnit, ListingValuation, RegionSeasonalData, ResortId, ResortRef, SeasonalRates,
    UnitFeatures, ValuationInput, ESTIMATE_DISCLAIMER,
};
pub use engine::{
    Roundable, ValuationBreakdown, ValuationEngine, ValuationError, ValuationResult,
};
pub use repository::{ConfigStore, EstimateLog, ListingStore, ReferenceStore, StoreError};
pub use router::valuation_router;
pub use season::{classify_season, Season, SeasonCalendar};
pub use service::{OfferRequest, ValuationService, ValuationServiceError};
