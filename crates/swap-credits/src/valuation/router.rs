use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::{ListingId, ValuationInput};
use super::engine::ValuationError;
use super::repository::{ConfigStore, EstimateLog, ListingStore, ReferenceStore, StoreError};
use super::service::{OfferRequest, ValuationService, ValuationServiceError};

/// Router builder exposing estimate, scoring, and offer ranking endpoints.
pub fn valuation_router<C, R, L, E>(service: Arc<ValuationService<C, R, L, E>>) -> Router
where
    C: ConfigStore + 'static,
    R: ReferenceStore + 'static,
    L: ListingStore + 'static,
    E: EstimateLog + 'static,
{
    Router::new()
        .route(
            "/api/v1/valuations/estimate",
            post(estimate_handler::<C, R, L, E>),
        )
        .route(
            "/api/v1/listings/:listing_id/score",
            post(score_handler::<C, R, L, E>),
        )
        .route("/api/v1/offers/rank", post(rank_handler::<C, R, L, E>))
        .with_state(service)
}

pub(crate) async fn estimate_handler<C, R, L, E>(
    State(service): State<Arc<ValuationService<C, R, L, E>>>,
    axum::Json(input): axum::Json<ValuationInput>,
) -> Response
where
    C: ConfigStore + 'static,
    R: ReferenceStore + 'static,
    L: ListingStore + 'static,
    E: EstimateLog + 'static,
{
    match service.estimate(input).await {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn score_handler<C, R, L, E>(
    State(service): State<Arc<ValuationService<C, R, L, E>>>,
    Path(listing_id): Path<String>,
) -> Response
where
    C: ConfigStore + 'static,
    R: ReferenceStore + 'static,
    L: ListingStore + 'static,
    E: EstimateLog + 'static,
{
    let id = ListingId(listing_id);
    match service.score_listing(&id).await {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn rank_handler<C, R, L, E>(
    State(service): State<Arc<ValuationService<C, R, L, E>>>,
    axum::Json(request): axum::Json<OfferRequest>,
) -> Response
where
    C: ConfigStore + 'static,
    R: ReferenceStore + 'static,
    L: ListingStore + 'static,
    E: EstimateLog + 'static,
{
    match service.rank_offer(request).await {
        Ok(ranking) => (StatusCode::OK, axum::Json(ranking)).into_response(),
        Err(error) => error.into_response(),
    }
}

impl ValuationServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValuationServiceError::Valuation(error) => match error {
                ValuationError::ResortNotFound { .. } => StatusCode::NOT_FOUND,
                ValuationError::ConfigMissing => StatusCode::SERVICE_UNAVAILABLE,
                ValuationError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ValuationError::RegionDataMissing { .. }
                | ValuationError::SeasonalRateMissing { .. }
                | ValuationError::StayLengthInvalid { .. }
                | ValuationError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ValuationServiceError::Ranking(_) | ValuationServiceError::ListingNotValued(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ValuationServiceError::ListingNotFound(_)
            | ValuationServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ValuationServiceError::Store(StoreError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ValuationServiceError {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": self.to_string(),
        });
        (self.status_code(), axum::Json(payload)).into_response()
    }
}
