use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::{jwt, ADMIN_COOKIE};
use crate::error::AppError;
use crate::state::SharedState;

/// Guard for write endpoints and the dashboard.
///
/// Passes unconditionally when no admin password is configured; otherwise a
/// valid token must arrive as a Bearer header or the session cookie.
#[derive(Debug, Clone)]
pub struct AdminAccess;

impl FromRequestParts<SharedState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(admin) = state.config.admin.as_ref() else {
            return Ok(AdminAccess);
        };

        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("ترويسة التفويض غير صالحة".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                jwt::decode_token(token, &admin.jwt_secret).map_err(|_| {
                    AppError::Unauthorized("الجلسة غير صالحة أو منتهية".to_string())
                })?;
                return Ok(AdminAccess);
            }
        }

        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(ADMIN_COOKIE) {
            jwt::decode_token(cookie.value(), &admin.jwt_secret)
                .map_err(|_| AppError::Unauthorized("الجلسة غير صالحة أو منتهية".to_string()))?;
            return Ok(AdminAccess);
        }

        Err(AppError::Unauthorized("يجب تسجيل الدخول".to_string()))
    }
}
