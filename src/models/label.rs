use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project tag or material. Both tables share this shape.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
}
