use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::extractor::AdminAccess;
use crate::db;
use crate::db::labels::LabelKind;
use crate::db::projects::ListFilter;
use crate::error::AppError;
use crate::extract::{JsonBody, ProjectId, QueryParams};
use crate::models::ProjectDetails;
use crate::state::SharedState;
use crate::validation::{self, NewProject, ProjectInput};

pub const DEFAULT_PAGE_SIZE: i64 = 12;
const MAX_PAGE_SIZE: i64 = 100;

/// Query string of the project listing, shared with the portfolio page.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

impl ListParams {
    pub fn filter(&self) -> ListFilter {
        ListFilter {
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty() && *c != "all")
                .map(str::to_string),
            featured_only: self.featured.as_deref() == Some("true"),
        }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Saturates for absurd page numbers; such a page is simply empty.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// One page of projects with relations plus the pagination block.
pub async fn load_page(
    state: &SharedState,
    params: &ListParams,
) -> Result<(Vec<ProjectDetails>, Pagination), AppError> {
    let filter = params.filter();
    let rows = db::projects::list(&state.pool, &filter, params.limit(), params.offset()).await?;
    let total = db::projects::count(&state.pool, &filter).await?;
    let projects = db::projects::with_relations(&state.pool, rows).await?;
    Ok((projects, Pagination::new(total, params.page(), params.limit())))
}

pub async fn list(
    State(state): State<SharedState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Value>, AppError> {
    let (projects, pagination) = load_page(&state, &params).await?;
    tracing::debug!(
        "Listed {} projects (page {} of {})",
        projects.len(),
        pagination.page,
        pagination.total_pages
    );
    Ok(Json(json!({
        "projects": projects,
        "pagination": pagination,
    })))
}

pub async fn create(
    _admin: AdminAccess,
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<ProjectInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new = validation::validate_project(req)?;

    let mut tx = state.pool.begin().await?;
    let project = db::projects::create(&mut *tx, &new).await?;
    replace_relations(&mut tx, project.id, &new).await?;
    tx.commit().await?;

    tracing::info!(
        "Project {} created with {} media items",
        project.id,
        new.media.len()
    );

    let project = reload(&state, project.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "project": project,
            "message": "تم إضافة المشروع بنجاح",
        })),
    ))
}

pub async fn get(
    State(state): State<SharedState>,
    ProjectId(id): ProjectId,
) -> Result<Json<ProjectDetails>, AppError> {
    let project = db::projects::increment_views(&state.pool, id)
        .await?
        .ok_or_else(project_not_found)?;
    let details = db::projects::details(&state.pool, project).await?;
    Ok(Json(details))
}

pub async fn update(
    _admin: AdminAccess,
    State(state): State<SharedState>,
    ProjectId(id): ProjectId,
    JsonBody(req): JsonBody<ProjectInput>,
) -> Result<Json<Value>, AppError> {
    let new = validation::validate_project(req)?;

    let mut tx = state.pool.begin().await?;
    let project = db::projects::update(&mut *tx, id, &new)
        .await?
        .ok_or_else(project_not_found)?;
    replace_relations(&mut tx, project.id, &new).await?;
    tx.commit().await?;

    tracing::info!("Project {id} updated");

    let project = reload(&state, id).await?;
    Ok(Json(json!({
        "success": true,
        "project": project,
        "message": "تم تحديث المشروع بنجاح",
    })))
}

pub async fn delete(
    _admin: AdminAccess,
    State(state): State<SharedState>,
    ProjectId(id): ProjectId,
) -> Result<Json<Value>, AppError> {
    if db::projects::delete(&state.pool, id).await? == 0 {
        return Err(project_not_found());
    }

    tracing::info!("Project {id} deleted");

    Ok(Json(json!({
        "success": true,
        "message": "تم حذف المشروع بنجاح",
    })))
}

pub fn project_not_found() -> AppError {
    AppError::NotFound("المشروع غير موجود".to_string())
}

async fn replace_relations(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    project_id: Uuid,
    new: &NewProject,
) -> Result<(), sqlx::Error> {
    db::media_items::replace_for_project(&mut **tx, project_id, &new.media).await?;
    db::labels::replace_for_project(&mut **tx, LabelKind::Tag, project_id, &new.tags).await?;
    db::labels::replace_for_project(&mut **tx, LabelKind::Material, project_id, &new.materials)
        .await?;
    Ok(())
}

async fn reload(state: &SharedState, id: Uuid) -> Result<ProjectDetails, AppError> {
    let project = db::projects::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(project_not_found)?;
    let mut details = db::projects::with_relations(&state.pool, vec![project]).await?;
    details.pop().ok_or_else(project_not_found)
}
