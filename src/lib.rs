pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod site;
pub mod state;
pub mod storage;
pub mod validation;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};
use crate::storage::local::PUBLIC_PREFIX;

pub fn build_app(pool: PgPool, config: Config) -> Result<Router, String> {
    let storage = storage::from_config(&config)?;
    let upload_dir = config.upload_dir.clone();
    let max_upload_request = config.max_upload_request;

    if config.admin.is_none() {
        tracing::warn!("ADMIN_PASSWORD_HASH not set, write endpoints are unauthenticated");
    }

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        storage,
        login_limiter: LoginRateLimiter::new(),
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .merge(routes::upload_routes(max_upload_request))
        .merge(routes::seo_routes())
        .merge(views::view_routes())
        .merge(views::admin_view_routes().layer(axum::middleware::from_fn(redirect_unauthorized)))
        .nest_service("/static", ServeDir::new("static"))
        .nest_service(PUBLIC_PREFIX, ServeDir::new(upload_dir))
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                )),
        )
        .with_state(state);

    Ok(app)
}

async fn health() -> &'static str {
    "ok"
}
