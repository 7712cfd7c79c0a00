use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::auth::extractor::AdminAccess;
use crate::db;
use crate::db::stats::{CategoryCount, Totals};
use crate::error::AppError;
use crate::site;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    page_title: String,
    meta_description: String,
    totals: Totals,
    average_rating: String,
    categories: Vec<CategoryCount>,
    login_enabled: bool,
}

pub async fn index(
    _admin: AdminAccess,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let totals = db::stats::totals(&state.pool).await?;
    let categories = db::stats::categories(&state.pool).await?;

    let template = DashboardTemplate {
        page_title: format!("لوحة التحكم - {}", site::COMPANY_NAME),
        meta_description: String::new(),
        average_rating: format!("{:.1}", totals.average_rating),
        totals,
        categories,
        login_enabled: state.config.admin.is_some(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
