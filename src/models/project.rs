use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Comment, Label, MediaItem};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub completion_date: DateTime<Utc>,
    pub client: Option<String>,
    pub featured: bool,
    pub project_duration: String,
    pub project_cost: String,
    pub views: i32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A project with its owned relations, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub media_items: Vec<MediaItem>,
    pub tags: Vec<Label>,
    pub materials: Vec<Label>,
    pub comment_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl ProjectDetails {
    pub fn images(&self) -> impl Iterator<Item = &MediaItem> {
        self.media_items.iter().filter(|m| m.is_image())
    }

    pub fn videos(&self) -> impl Iterator<Item = &MediaItem> {
        self.media_items.iter().filter(|m| !m.is_image())
    }

    /// First image in display order, used as the card cover.
    pub fn cover(&self) -> Option<&MediaItem> {
        self.images().next()
    }
}
