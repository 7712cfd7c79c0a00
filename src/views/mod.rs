pub mod auth;
pub mod dashboard;
pub mod home;
pub mod portfolio;
pub mod services;

use axum::routing::get;
use axum::Router;

use crate::models::ProjectDetails;
use crate::state::SharedState;
use crate::storage::cloudinary::optimized_url;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(home::index))
        .route("/services/{slug}", get(services::show))
        .route("/portfolio", get(portfolio::index))
        .route("/portfolio/{id}", get(portfolio::show))
        .route("/login", get(auth::login_page))
}

/// Pages behind the dashboard login; a 401 becomes a redirect to `/login`.
pub fn admin_view_routes() -> Router<SharedState> {
    Router::new().route("/dashboard", get(dashboard::index))
}

/// Card data for project grids, with display strings prepared.
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    pub cover: Option<String>,
    pub featured: bool,
    pub rating: String,
    pub views: i32,
    pub comment_count: i64,
    pub media_count: usize,
}

impl From<&ProjectDetails> for ProjectCard {
    fn from(details: &ProjectDetails) -> Self {
        let project = &details.project;
        ProjectCard {
            id: project.id.to_string(),
            title: project.title.clone(),
            category: project.category.clone(),
            location: project.location.clone(),
            cover: details
                .cover()
                .map(|m| optimized_url(m.thumbnail.as_deref().unwrap_or(&m.src), 640, None)),
            featured: project.featured,
            rating: format!("{:.1}", project.rating),
            views: project.views,
            comment_count: details.comment_count,
            media_count: details.media_items.len(),
        }
    }
}
