//! cdpt-lambda
//!
//! HTTP surface of the assistant. The router is built here so it can be
//! exercised in-process; `main.rs` wires AWS clients and hands it to
//! `lambda_http`.

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

pub const ALLOWED_METHODS: &str = "POST, GET, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

pub fn router(state: AppState) -> Router {
    // Every response, including errors and preflights, carries the same
    // header set.
    let response_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ));

    Router::new()
        .route(
            "/",
            post(routes::turn::handle_turn).options(routes::preflight::preflight),
        )
        .route(
            "/turn",
            post(routes::turn::handle_turn).options(routes::preflight::preflight),
        )
        .route(
            "/health",
            get(routes::health::health_check).options(routes::preflight::preflight),
        )
        .fallback(routes::fallback::fallback)
        .layer(axum_mw::from_fn(middleware::access_log::access_log))
        .layer(response_headers)
        .with_state(state)
}
