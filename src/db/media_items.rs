use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::MediaItem;
use crate::validation::NewMedia;

pub async fn list_by_projects(
    pool: &PgPool,
    project_ids: &[Uuid],
) -> Result<Vec<MediaItem>, sqlx::Error> {
    sqlx::query_as::<_, MediaItem>(
        "SELECT * FROM media_items WHERE project_id = ANY($1)
         ORDER BY project_id, sort_order ASC",
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await
}

/// Drop the project's media and insert `items` in display order.
pub async fn replace_for_project(
    conn: &mut PgConnection,
    project_id: Uuid,
    items: &[NewMedia],
) -> Result<Vec<MediaItem>, sqlx::Error> {
    sqlx::query("DELETE FROM media_items WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    let mut created = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let row = sqlx::query_as::<_, MediaItem>(
            "INSERT INTO media_items (id, project_id, kind, src, thumbnail, title, description,
                                      duration, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(project_id)
        .bind(item.kind)
        .bind(&item.src)
        .bind(item.thumbnail.as_deref())
        .bind(item.title.as_deref())
        .bind(item.description.as_deref())
        .bind(item.duration.as_deref())
        .bind(index as i32)
        .fetch_one(&mut *conn)
        .await?;
        created.push(row);
    }
    Ok(created)
}
