use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};

use crate::error::AppError;
use crate::routes::projects::{load_page, ListParams};
use crate::site::{self, Service};
use crate::state::SharedState;

use super::ProjectCard;

#[derive(Template)]
#[template(path = "service.html")]
struct ServiceTemplate {
    page_title: String,
    meta_description: String,
    service: &'static Service,
    portfolio_href: String,
    projects: Vec<ProjectCard>,
}

pub async fn show(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = site::find_service(&slug)
        .ok_or_else(|| AppError::NotFound("الخدمة غير موجودة".to_string()))?;

    let params = ListParams {
        category: Some(service.category.to_string()),
        limit: Some(6),
        ..Default::default()
    };
    let (projects, _) = load_page(&state, &params).await?;

    let category: String = form_urlencoded::byte_serialize(service.category.as_bytes()).collect();
    let template = ServiceTemplate {
        page_title: format!("{} - {}", service.title, site::COMPANY_NAME),
        meta_description: service.summary.to_string(),
        service,
        portfolio_href: format!("/portfolio?category={category}"),
        projects: projects.iter().map(ProjectCard::from).collect(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
