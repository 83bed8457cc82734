use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;

use crate::auth::{self, LOGIN_PATH, SESSION_COOKIE};
use crate::errors::AppError;
use crate::state::AppState;
use crate::templates::LoginPage;

const HOME_PATH: &str = "/admin/bookings";

// GET /admin
pub async fn admin_home() -> Redirect {
    Redirect::to(HOME_PATH)
}

// GET /admin/login
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let signed_in = jar
        .get(SESSION_COOKIE)
        .and_then(|c| auth::verify_token(&state.config.session_secret, c.value(), Utc::now()))
        .is_some();
    if signed_in {
        return Ok(Redirect::to(HOME_PATH).into_response());
    }

    let page = LoginPage {
        error: None,
        username: String::new(),
    };
    Ok(Html(page.render()?).into_response())
}

// POST /admin/login
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    if !auth::credentials_match(&state.config, username, &form.password) {
        tracing::warn!(username = %username, "failed admin login");
        let page = LoginPage {
            error: Some("Invalid username or password".to_string()),
            username: username.to_string(),
        };
        return Ok((StatusCode::UNAUTHORIZED, Html(page.render()?)).into_response());
    }

    let cookie = auth::session_cookie(&state.config, username)
        .ok_or_else(|| AppError::Internal("failed to sign admin session".to_string()))?;

    tracing::info!(username = %username, "admin signed in");
    Ok((jar.add(cookie), Redirect::to(HOME_PATH)).into_response())
}

// POST /admin/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(auth::removal_cookie()), Redirect::to(LOGIN_PATH))
}
