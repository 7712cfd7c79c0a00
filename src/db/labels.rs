use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Label;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Tag,
    Material,
}

impl LabelKind {
    fn table(self) -> &'static str {
        match self {
            LabelKind::Tag => "project_tags",
            LabelKind::Material => "project_materials",
        }
    }
}

pub async fn list_by_projects(
    pool: &PgPool,
    kind: LabelKind,
    project_ids: &[Uuid],
) -> Result<Vec<Label>, sqlx::Error> {
    sqlx::query_as::<_, Label>(&format!(
        "SELECT * FROM {} WHERE project_id = ANY($1) ORDER BY id",
        kind.table()
    ))
    .bind(project_ids)
    .fetch_all(pool)
    .await
}

pub async fn replace_for_project(
    conn: &mut PgConnection,
    kind: LabelKind,
    project_id: Uuid,
    names: &[String],
) -> Result<Vec<Label>, sqlx::Error> {
    sqlx::query(&format!("DELETE FROM {} WHERE project_id = $1", kind.table()))
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    let mut created = Vec::with_capacity(names.len());
    for name in names {
        let row = sqlx::query_as::<_, Label>(&format!(
            "INSERT INTO {} (id, project_id, name) VALUES ($1, $2, $3) RETURNING *",
            kind.table()
        ))
        .bind(Uuid::now_v7())
        .bind(project_id)
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
        created.push(row);
    }
    Ok(created)
}
