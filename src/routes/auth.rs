use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::extractor::AdminAccess;
use crate::auth::jwt::{self, Claims};
use crate::auth::{password, ADMIN_COOKIE};
use crate::error::AppError;
use crate::extract::JsonBody;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(jwt::SESSION_HOURS))
        .build()
}

pub async fn login(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let ip = addr.ip();
    if state.login_limiter.check(ip).is_err() {
        tracing::warn!("Dashboard login from {ip} refused after repeated failures");
        return Err(AppError::RateLimited(
            "محاولات دخول كثيرة. يرجى المحاولة لاحقاً".to_string(),
        ));
    }

    let admin = state
        .config
        .admin
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("تسجيل الدخول غير مفعّل".to_string()))?;

    if !password::verify(&req.password, &admin.password_hash).map_err(AppError::Internal)? {
        state.login_limiter.record_failure(ip);
        tracing::warn!("Failed dashboard login attempt from {ip}");
        return Err(AppError::Unauthorized("كلمة المرور غير صحيحة".to_string()));
    }

    let token = jwt::encode_token(&Claims::admin(), &admin.jwt_secret).map_err(AppError::Internal)?;
    let secure = state.config.base_url.starts_with("https://");

    state.login_limiter.reset(ip);
    tracing::info!("Dashboard login from {ip}");

    Ok((
        jar.add(session_cookie(token.clone(), secure)),
        Json(LoginResponse {
            success: true,
            token,
        }),
    ))
}

pub async fn verify(_admin: AdminAccess) -> Json<Value> {
    Json(json!({ "success": true, "authenticated": true }))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let cleared = Cookie::build((ADMIN_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    (jar.add(cleared), Json(json!({ "success": true })))
}
