use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::config::AppConfig;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "admin_session";
pub const LOGIN_PATH: &str = "/admin/login";

type HmacSha1 = Hmac<Sha1>;

/// The signed-in admin, resolved from the session cookie for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

fn signature(secret: &str, payload: &str) -> Option<HmacSha1> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload.as_bytes());
    Some(mac)
}

/// Token layout: `username|expires_unix|base64url(hmac-sha1(secret, "username|expires_unix"))`.
pub fn issue_token(secret: &str, username: &str, expires_at: DateTime<Utc>) -> Option<String> {
    let payload = format!("{username}|{}", expires_at.timestamp());
    let mac = signature(secret, &payload)?;
    let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Some(format!("{payload}|{sig}"))
}

pub fn verify_token(secret: &str, token: &str, now: DateTime<Utc>) -> Option<AdminSession> {
    let (payload, sig) = token.rsplit_once('|')?;
    let (username, expires) = payload.rsplit_once('|')?;
    if username.is_empty() {
        return None;
    }

    let sig = URL_SAFE_NO_PAD.decode(sig).ok()?;
    signature(secret, payload)?.verify_slice(&sig).ok()?;

    let expires_at = DateTime::from_timestamp(expires.parse().ok()?, 0)?;
    if expires_at <= now {
        return None;
    }

    Some(AdminSession {
        username: username.to_string(),
        expires_at,
    })
}

pub fn credentials_match(config: &AppConfig, username: &str, password: &str) -> bool {
    // Constant-time password check via MAC verification.
    let Some(expected) = signature(&config.session_secret, &config.admin_password) else {
        return false;
    };
    let Some(given) = signature(&config.session_secret, password) else {
        return false;
    };
    let given = given.finalize().into_bytes();
    username == config.admin_username && expected.verify_slice(&given).is_ok()
}

pub fn session_cookie(config: &AppConfig, username: &str) -> Option<Cookie<'static>> {
    let ttl = Duration::try_hours(config.session_ttl_hours)?;
    let expires_at = Utc::now().checked_add_signed(ttl)?;
    let token = issue_token(&config.session_secret, username, expires_at)?;
    Some(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = jar
            .get(SESSION_COOKIE)
            .and_then(|c| verify_token(&state.config.session_secret, c.value(), Utc::now()));

        match session {
            Some(session) => Ok(session),
            None => {
                tracing::debug!(path = %parts.uri.path(), "no admin session, redirecting to login");
                Err(Redirect::to(LOGIN_PATH))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_issued_token_verifies() {
        let now = Utc::now();
        let token = issue_token(SECRET, "admin", now + Duration::hours(1)).unwrap();

        let session = verify_token(SECRET, &token, now).unwrap();
        assert_eq!(session.username, "admin");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = Utc::now();
        let token = issue_token(SECRET, "admin", now - Duration::seconds(1)).unwrap();
        assert!(verify_token(SECRET, &token, now).is_none());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let now = Utc::now();
        let token = issue_token(SECRET, "admin", now + Duration::hours(1)).unwrap();

        let forged = token.replacen("admin", "root", 1);
        assert!(verify_token(SECRET, &forged, now).is_none());
        assert!(verify_token("other-secret", &token, now).is_none());
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let now = Utc::now();
        for token in ["", "admin", "admin|123", "|123|abc", "admin|soon|c2ln"] {
            assert!(verify_token(SECRET, token, now).is_none(), "{token}");
        }
    }

    #[test]
    fn test_oversized_session_ttl_yields_no_cookie() {
        let mut config = AppConfig::from_env();
        config.session_ttl_hours = i64::MAX / 2;
        assert!(session_cookie(&config, "admin").is_none());

        config.session_ttl_hours = 12;
        assert!(session_cookie(&config, "admin").is_some());
    }

    #[test]
    fn test_credentials_check_both_fields() {
        let mut config = AppConfig::from_env();
        config.admin_username = "admin".to_string();
        config.admin_password = "s3cret".to_string();

        assert!(credentials_match(&config, "admin", "s3cret"));
        assert!(!credentials_match(&config, "admin", "wrong"));
        assert!(!credentials_match(&config, "someone", "s3cret"));
    }
}
