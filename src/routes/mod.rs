pub mod auth;
pub mod comments;
pub mod projects;
pub mod seo;
pub mod stats;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/logout", post(auth::logout))
        // Projects
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
        // Comments
        .route(
            "/api/projects/{id}/comments",
            get(comments::list).post(comments::create),
        )
        // Dashboard
        .route("/api/stats", get(stats::summary))
}

/// The upload route streams its own body, so it carries its own size cap.
pub fn upload_routes(max_request: usize) -> Router<SharedState> {
    Router::new()
        .route("/api/upload", post(upload::upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_request))
}

pub fn seo_routes() -> Router<SharedState> {
    Router::new()
        .route("/robots.txt", get(seo::robots))
        .route("/sitemap.xml", get(seo::sitemap))
}
