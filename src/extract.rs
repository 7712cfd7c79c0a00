use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::projects::project_not_found;

/// JSON request body whose rejection is an [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Query string whose rejection is an [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// The `{id}` segment of a project route. Anything that is not a UUID cannot
/// name a project, so it is a 404 like any other unknown id.
#[derive(Debug, Clone, Copy)]
pub struct ProjectId(pub Uuid);

impl<S> FromRequestParts<S> for ProjectId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| project_not_found())?;
        Uuid::parse_str(&raw)
            .map(ProjectId)
            .map_err(|_| project_not_found())
    }
}
