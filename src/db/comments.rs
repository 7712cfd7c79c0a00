use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Comment;
use crate::validation::NewComment;

pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        "SELECT * FROM comments WHERE project_id = $1 ORDER BY created_at DESC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn count_by_projects(
    pool: &PgPool,
    project_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT project_id, COUNT(*) FROM comments WHERE project_id = ANY($1)
         GROUP BY project_id",
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await
}

/// Serialize comment inserts for one (project, name) pair until the
/// transaction ends.
pub async fn lock_author<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_id: Uuid,
    name: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("{project_id}:{name}"))
        .execute(executor)
        .await?;
    Ok(())
}

/// Latest comment by `name` on the project within the last `window_secs`,
/// measured against the database clock.
pub async fn find_recent_by_name<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_id: Uuid,
    name: &str,
    window_secs: i64,
) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        "SELECT * FROM comments
         WHERE project_id = $1 AND name = $2
           AND created_at >= now() - make_interval(secs => $3)
         ORDER BY created_at DESC LIMIT 1",
    )
    .bind(project_id)
    .bind(name)
    .bind(window_secs as f64)
    .fetch_optional(executor)
    .await
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_id: Uuid,
    comment: &NewComment,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (id, project_id, name, email, message, rating)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(project_id)
    .bind(&comment.name)
    .bind(comment.email.as_deref())
    .bind(&comment.message)
    .bind(comment.rating)
    .fetch_one(executor)
    .await
}

/// Arithmetic mean of every rating on the project, `None` without comments.
pub async fn average_rating<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_id: Uuid,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<f64>>(
        "SELECT AVG(rating)::float8 FROM comments WHERE project_id = $1",
    )
    .bind(project_id)
    .fetch_one(executor)
    .await
}
