use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use swap_credits::valuation::{
    valuation_router, ConfigStore, EstimateLog, ListingStore, ReferenceStore, ValuationService,
};

pub(crate) fn with_valuation_routes<C, R, L, E>(
    service: Arc<ValuationService<C, R, L, E>>,
) -> axum::Router
where
    C: ConfigStore + 'static,
    R: ReferenceStore + 'static,
    L: ListingStore + 'static,
    E: EstimateLog + 'static,
{
    valuation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::demo_dataset;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use swap_credits::offers::OfferRankingPolicy;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(state: AppState) -> axum::Router {
        let service = Arc::new(demo_dataset().into_service(OfferRankingPolicy::default()));
        with_valuation_routes(service).layer(Extension(state))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let state = app_state(false);
        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_served_as_text() {
        let response = app(app_state(true))
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn estimate_route_prices_demo_week() {
        let response = app(app_state(true))
            .oneshot(post_json(
                "/api/v1/valuations/estimate",
                json!({
                    "resort_id": "lahaina-shores",
                    "start_date": "2025-10-11",
                    "end_date": "2025-10-16",
                    "unit_type": "1br",
                    "features": { "kitchen": true },
                    "maintenance_fee_usd": 900.0,
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["nights"], 5);
        assert_eq!(body["breakdown"]["season"], "shoulder");
        let credits = body["credits"].as_u64().expect("credits present");
        assert_eq!(credits % 50, 0);
        assert!((1_000..=7_500).contains(&credits));
    }

    #[tokio::test]
    async fn scored_weeks_can_be_ranked() {
        let router = app(app_state(true));

        for listing in ["wk-lahaina-1011", "wk-palmcove-0201"] {
            let response = router
                .clone()
                .oneshot(post_json(
                    &format!("/api/v1/listings/{listing}/score"),
                    json!({}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = router
            .oneshot(post_json(
                "/api/v1/offers/rank",
                json!({
                    "listing_id": "wk-lahaina-1011",
                    "offered_listing_id": "wk-palmcove-0201",
                    "offered_credits": 250,
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["offer_kind"], "hybrid");
        assert!(body["acceptance_probability"].as_u64().expect("probability") <= 100);
        assert!(body["explanation"]
            .as_str()
            .expect("explanation")
            .starts_with("Value vs typical: "));
    }

    #[tokio::test]
    async fn ranking_an_unscored_week_is_rejected() {
        let response = app(app_state(true))
            .oneshot(post_json(
                "/api/v1/offers/rank",
                json!({
                    "listing_id": "wk-kaanapali-0705",
                    "offered_credits": 8_000,
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
