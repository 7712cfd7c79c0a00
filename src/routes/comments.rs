use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::extract::{JsonBody, ProjectId};
use crate::models::Comment;
use crate::routes::projects::project_not_found;
use crate::state::SharedState;
use crate::validation::{self, CommentInput};

/// A second comment under the same name on the same project is refused
/// inside this window.
pub const THROTTLE_WINDOW_SECS: i64 = 10 * 60;

/// Public shape of a comment. The email stays private.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub avatar: String,
}

impl From<Comment> for CommentView {
    fn from(c: Comment) -> Self {
        let avatar = avatar_url(&c.name);
        CommentView {
            id: c.id,
            name: c.name,
            message: c.message,
            rating: c.rating,
            created_at: c.created_at,
            avatar,
        }
    }
}

pub fn avatar_url(name: &str) -> String {
    // Path-style escaping: a literal `+` is already `%2B`, so any `+` left is a space.
    let encoded = form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("https://ui-avatars.com/api/?name={encoded}&background=059669&color=fff")
}

pub async fn list(
    State(state): State<SharedState>,
    ProjectId(project_id): ProjectId,
) -> Result<Json<Value>, AppError> {
    db::projects::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(project_not_found)?;

    let comments: Vec<CommentView> = db::comments::list_by_project(&state.pool, project_id)
        .await?
        .into_iter()
        .map(CommentView::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "comments": comments,
    })))
}

pub async fn create(
    State(state): State<SharedState>,
    ProjectId(project_id): ProjectId,
    JsonBody(req): JsonBody<CommentInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new = validation::validate_comment(req)?;

    db::projects::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(project_not_found)?;

    let mut tx = state.pool.begin().await?;
    db::comments::lock_author(&mut *tx, project_id, &new.name).await?;

    if db::comments::find_recent_by_name(&mut *tx, project_id, &new.name, THROTTLE_WINDOW_SECS)
        .await?
        .is_some()
    {
        tracing::warn!("Throttled repeat comment on project {project_id}");
        return Err(AppError::RateLimited(
            "لقد أضفت تعليقاً مؤخراً. يرجى الانتظار قبل إضافة تعليق آخر".to_string(),
        ));
    }

    let comment = db::comments::create(&mut *tx, project_id, &new).await?;
    if let Some(average) = db::comments::average_rating(&mut *tx, project_id).await? {
        db::projects::set_rating(&mut *tx, project_id, average).await?;
    }
    tx.commit().await?;

    tracing::info!("Comment {} added to project {project_id}", comment.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "تم إضافة التعليق بنجاح",
            "comment": CommentView::from(comment),
        })),
    ))
}
