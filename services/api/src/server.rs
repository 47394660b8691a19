use crate::cli::ServeArgs;
use crate::infra::{ApiService, AppState, ReferenceDataset};
use crate::routes::with_valuation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use swap_credits::config::AppConfig;
use swap_credits::error::AppError;
use swap_credits::offers::OfferRankingPolicy;
use swap_credits::telemetry;
use swap_credits::valuation::ListingId;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dataset = ReferenceDataset::load(config.reference_data.as_deref())?;
    let unvalued = dataset.unvalued_listings();
    info!(
        resorts = dataset.resorts.len(),
        regions = dataset.regions.len(),
        listings = dataset.listings.len(),
        "reference data loaded"
    );

    let service = Arc::new(dataset.into_service(OfferRankingPolicy::new(config.offer_weights)));
    prime_listings(&service, &unvalued).await;

    let app = with_valuation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "swap credit valuation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Score seeded weeks that arrived without a valuation so offers against them can be ranked.
async fn prime_listings(service: &ApiService, listings: &[ListingId]) {
    for listing_id in listings {
        if let Err(err) = service.score_listing(listing_id).await {
            warn!(%listing_id, error = %err, "could not score seeded listing");
        }
    }
}
