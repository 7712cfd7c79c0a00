use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comments, labels, media_items};
use crate::db::labels::LabelKind;
use crate::models::{Project, ProjectDetails};
use crate::validation::NewProject;

/// Listing filter shared by the API and the portfolio pages.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub category: Option<String>,
    pub featured_only: bool,
}

pub async fn list(
    pool: &PgPool,
    filter: &ListFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects
         WHERE ($1::text IS NULL OR category = $1) AND (NOT $2 OR featured)
         ORDER BY featured DESC, created_at DESC
         LIMIT $3 OFFSET $4",
    )
    .bind(filter.category.as_deref())
    .bind(filter.featured_only)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool, filter: &ListFilter) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM projects
         WHERE ($1::text IS NULL OR category = $1) AND (NOT $2 OR featured)",
    )
    .bind(filter.category.as_deref())
    .bind(filter.featured_only)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Every project, most recently updated first. Used by the sitemap.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY updated_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM projects ORDER BY category")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects SET views = views + 1 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project: &NewProject,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "INSERT INTO projects (id, title, description, category, location, completion_date,
                               client, featured, project_duration, project_cost)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.category)
    .bind(&project.location)
    .bind(project.completion_date)
    .bind(project.client.as_deref())
    .bind(project.featured)
    .bind(&project.project_duration)
    .bind(&project.project_cost)
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    project: &NewProject,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects SET title = $2, description = $3, category = $4, location = $5,
                completion_date = $6, client = $7, featured = $8, project_duration = $9,
                project_cost = $10, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&project.title)
    .bind(&project.description)
    .bind(&project.category)
    .bind(&project.location)
    .bind(project.completion_date)
    .bind(project.client.as_deref())
    .bind(project.featured)
    .bind(&project.project_duration)
    .bind(&project.project_cost)
    .fetch_optional(executor)
    .await
}

pub async fn set_rating<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    rating: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE projects SET rating = $2 WHERE id = $1")
        .bind(id)
        .bind(rating)
        .execute(executor)
        .await?;
    Ok(())
}

/// Relations go with the row through `ON DELETE CASCADE`.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Load media, tags, materials and comment counts for a page of projects,
/// preserving the input order.
pub async fn with_relations(
    pool: &PgPool,
    projects: Vec<Project>,
) -> Result<Vec<ProjectDetails>, sqlx::Error> {
    let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();

    let mut media: HashMap<Uuid, Vec<_>> = HashMap::new();
    for item in media_items::list_by_projects(pool, &ids).await? {
        media.entry(item.project_id).or_default().push(item);
    }

    let mut tags: HashMap<Uuid, Vec<_>> = HashMap::new();
    for tag in labels::list_by_projects(pool, LabelKind::Tag, &ids).await? {
        tags.entry(tag.project_id).or_default().push(tag);
    }

    let mut materials: HashMap<Uuid, Vec<_>> = HashMap::new();
    for material in labels::list_by_projects(pool, LabelKind::Material, &ids).await? {
        materials.entry(material.project_id).or_default().push(material);
    }

    let counts: HashMap<Uuid, i64> = comments::count_by_projects(pool, &ids)
        .await?
        .into_iter()
        .collect();

    Ok(projects
        .into_iter()
        .map(|project| {
            let id = project.id;
            ProjectDetails {
                project,
                media_items: media.remove(&id).unwrap_or_default(),
                tags: tags.remove(&id).unwrap_or_default(),
                materials: materials.remove(&id).unwrap_or_default(),
                comment_count: counts.get(&id).copied().unwrap_or(0),
                comments: None,
            }
        })
        .collect())
}

/// Single project with relations and its comments, newest first.
pub async fn details(pool: &PgPool, project: Project) -> Result<ProjectDetails, sqlx::Error> {
    let project_comments = comments::list_by_project(pool, project.id).await?;
    let mut details = with_relations(pool, vec![project])
        .await?
        .pop()
        .ok_or(sqlx::Error::RowNotFound)?;
    details.comment_count = project_comments.len() as i64;
    details.comments = Some(project_comments);
    Ok(details)
}
