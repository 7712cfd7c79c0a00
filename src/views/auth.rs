use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::auth::{jwt, ADMIN_COOKIE};
use crate::site;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    page_title: String,
    meta_description: String,
}

pub async fn login_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let Some(admin) = state.config.admin.as_ref() else {
        return Redirect::to("/dashboard").into_response();
    };

    if let Some(cookie) = jar.get(ADMIN_COOKIE) {
        if jwt::decode_token(cookie.value(), &admin.jwt_secret).is_ok() {
            return Redirect::to("/dashboard").into_response();
        }
    }

    let template = LoginTemplate {
        page_title: format!("تسجيل الدخول - {}", site::COMPANY_NAME),
        meta_description: String::new(),
    };
    Html(template.render().unwrap_or_default()).into_response()
}
