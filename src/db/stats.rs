use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_projects: i64,
    pub total_views: i64,
    pub featured_projects: i64,
    pub recent_projects: i64,
    pub total_ratings: i64,
    pub average_rating: f64,
    pub total_images: i64,
    pub total_videos: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

pub async fn totals(pool: &PgPool) -> Result<Totals, sqlx::Error> {
    sqlx::query_as::<_, Totals>(
        "SELECT
            (SELECT COUNT(*) FROM projects) AS total_projects,
            (SELECT COALESCE(SUM(views), 0)::bigint FROM projects) AS total_views,
            (SELECT COUNT(*) FROM projects WHERE featured) AS featured_projects,
            (SELECT COUNT(*) FROM projects WHERE created_at > now() - interval '7 days')
                AS recent_projects,
            (SELECT COUNT(*) FROM comments) AS total_ratings,
            (SELECT COALESCE(AVG(rating), 0)::float8 FROM comments) AS average_rating,
            (SELECT COUNT(*) FROM media_items WHERE kind = 'IMAGE') AS total_images,
            (SELECT COUNT(*) FROM media_items WHERE kind = 'VIDEO') AS total_videos",
    )
    .fetch_one(pool)
    .await
}

pub async fn categories(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
    sqlx::query_as::<_, CategoryCount>(
        "SELECT category, COUNT(*) AS count FROM projects
         GROUP BY category ORDER BY count DESC, category",
    )
    .fetch_all(pool)
    .await
}
