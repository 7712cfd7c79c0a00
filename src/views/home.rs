use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::error::AppError;
use crate::routes::projects::{load_page, ListParams};
use crate::site::{self, Service};
use crate::state::SharedState;

use super::ProjectCard;

const LATEST_PROJECTS: i64 = 6;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    page_title: String,
    meta_description: String,
    tagline: &'static str,
    services: &'static [Service],
    projects: Vec<ProjectCard>,
}

pub async fn index(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let params = ListParams {
        limit: Some(LATEST_PROJECTS),
        ..Default::default()
    };
    let (projects, _) = load_page(&state, &params).await?;

    let template = HomeTemplate {
        page_title: format!("{} | {}", site::COMPANY_NAME, site::TAGLINE),
        meta_description: site::TAGLINE.to_string(),
        tagline: site::TAGLINE,
        services: site::SERVICES,
        projects: projects.iter().map(ProjectCard::from).collect(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
