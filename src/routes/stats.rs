use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::extractor::AdminAccess;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

pub async fn summary(
    _admin: AdminAccess,
    State(state): State<SharedState>,
) -> Result<Json<Value>, AppError> {
    let totals = db::stats::totals(&state.pool).await?;
    let categories: serde_json::Map<String, Value> = db::stats::categories(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.category, json!(c.count)))
        .collect();

    let mut body = json!(totals);
    body["categoryStats"] = Value::Object(categories);
    body["success"] = json!(true);
    Ok(Json(body))
}
