use std::env;

pub const DEFAULT_ADMIN_PASSWORD: &str = "changeme";
pub const DEFAULT_SESSION_SECRET: &str = "change-this-secret";
pub const DEFAULT_UPLOAD_URL: &str = "/uploads/";
/// Longest accepted session lifetime (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_username: String,
    pub admin_password: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub upload_dir: String,
    /// Public base path the upload directory is served from, e.g. `/uploads/`.
    pub upload_url: String,
    pub max_upload_bytes: usize,
    pub currency_symbol: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "spa_admin.db".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| DEFAULT_SESSION_SECRET.to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|h: &i64| *h > 0)
                .map(|h| h.min(MAX_SESSION_TTL_HOURS))
                .unwrap_or(12),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            upload_url: normalize_upload_url(
                &env::var("UPLOAD_URL").unwrap_or_else(|_| DEFAULT_UPLOAD_URL.to_string()),
            ),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "$".to_string()),
        }
    }

    pub fn uses_default_credentials(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD || self.session_secret == DEFAULT_SESSION_SECRET
    }

    /// Route prefix for serving uploads, without the trailing slash.
    pub fn upload_route(&self) -> &str {
        self.upload_url.trim_end_matches('/')
    }
}

/// Uploads cannot be served from the site root, so a bare `/` falls back to the default.
fn normalize_upload_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_UPLOAD_URL.to_string();
    }
    let mut url = trimmed.to_string();
    if !url.starts_with('/') {
        url.insert(0, '/');
    }
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::assets::{AssetStore, LocalAssetStore};

    #[test]
    fn test_upload_url_gets_slashes() {
        assert_eq!(normalize_upload_url("uploads"), "/uploads/");
        assert_eq!(normalize_upload_url("/static/up/"), "/static/up/");
        assert_eq!(normalize_upload_url(" media "), "/media/");
    }

    #[test]
    fn test_root_upload_url_falls_back_to_default() {
        assert_eq!(normalize_upload_url("/"), "/uploads/");
        assert_eq!(normalize_upload_url("//"), "/uploads/");
        assert_eq!(normalize_upload_url(""), "/uploads/");
    }

    #[test]
    fn test_upload_route_drops_trailing_slash() {
        let mut config = AppConfig::from_env();
        config.upload_url = normalize_upload_url("/media/");
        assert_eq!(config.upload_route(), "/media");
    }

    #[test]
    fn test_icon_urls_live_under_served_route() {
        let mut config = AppConfig::from_env();
        for raw in ["/", "", "media", "/static/up/"] {
            config.upload_url = normalize_upload_url(raw);
            let store = LocalAssetStore::new("uploads", "services", config.upload_url.clone(), 1024);
            let url = store.public_url("services/a.png");
            let prefix = format!("{}/", config.upload_route());
            assert!(url.starts_with(&prefix), "{url} not under {prefix}");
            assert!(config.upload_route().len() > 1, "{raw}");
        }
    }

    #[test]
    fn test_session_ttl_is_capped() {
        std::env::set_var("SESSION_TTL_HOURS", (i64::MAX / 2).to_string());
        let config = AppConfig::from_env();
        std::env::remove_var("SESSION_TTL_HOURS");
        assert_eq!(config.session_ttl_hours, MAX_SESSION_TTL_HOURS);
    }
}
