use crate::api::handlers::{dashboard, health, reports};
use crate::api::middleware::identify_owner;
use crate::api::state::AppState;
use axum::{extract::Request, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health::health));

    // Authentication is done by oauth2-proxy at the ingress; this layer only
    // turns its headers into an owner filter.
    let api_routes = Router::new()
        .route("/api/v1/dashboard/overview", get(dashboard::get_overview))
        .route("/api/v1/dashboard/trend", get(dashboard::get_trend))
        .route("/api/v1/dashboard/latest", get(dashboard::get_latest))
        .route("/api/v1/dashboard/stream", get(dashboard::stream))
        .route("/api/v1/reports/current", get(reports::get_current))
        .route(
            "/api/v1/reports/export/{format}",
            get(reports::export_get).post(reports::export_post),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), identify_owner));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request| {
                            tracing::span!(
                                Level::INFO,
                                "http_request",
                                method = %request.method(),
                                uri = %request.uri(),
                            )
                        })
                        .on_request(|_request: &Request, _span: &tracing::Span| {
                            tracing::event!(Level::DEBUG, "received request");
                        })
                        .on_response(
                            |_response: &axum::response::Response,
                             latency: std::time::Duration,
                             _span: &tracing::Span| {
                                tracing::event!(Level::INFO, latency = ?latency, "request completed");
                            },
                        ),
                )
                .layer(CorsLayer::permissive()),
        )
}
