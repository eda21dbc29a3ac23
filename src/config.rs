use std::collections::HashMap;
use std::env;

use crate::registry::oauth::PROVIDER_IDS;

#[derive(Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub sqlite_path: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_header: String,
    pub session_cookie: String,
    pub reaper_interval_secs: u64,
    pub oauth_redirect_base: String,
    pub oauth_client_ids: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(38321);

        let sqlite_path = env::var("SQLITE_PATH").unwrap_or_else(|_| "/opt/golf/data.sqlite".to_string());
        let database_url = env::var("DATABASE_URL").ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "golfer-settings-dev-secret".to_string());
        let token_header = env::var("TOKEN_HEADER").unwrap_or_else(|_| "token".to_string());
        let session_cookie = env::var("SESSION_COOKIE").unwrap_or_else(|_| "__Host-session".to_string());

        let reaper_interval_secs = env::var("REAPER_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3600);

        let oauth_redirect_base = env::var("OAUTH_REDIRECT_BASE")
            .unwrap_or_else(|_| "https://code.golf".to_string());

        // OAUTH_STACK_OVERFLOW_CLIENT_ID etc.
        let oauth_client_ids = PROVIDER_IDS
            .iter()
            .filter_map(|id| {
                let key = format!("OAUTH_{}_CLIENT_ID", id.to_uppercase().replace('-', "_"));
                env::var(key)
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (id.to_string(), v))
            })
            .collect();

        Self {
            server_port,
            sqlite_path,
            database_url,
            jwt_secret,
            token_header,
            session_cookie,
            reaper_interval_secs,
            oauth_redirect_base,
            oauth_client_ids,
        }
    }

    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }

        let path = self.sqlite_path.trim();
        if path.starts_with("sqlite:") || path.starts_with("file:") {
            return path.to_string();
        }
        format!("sqlite://{}?mode=rwc", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;

    #[test]
    fn explicit_database_url_wins() {
        let config = AppConfig {
            database_url: Some("mysql://golf@localhost/golf".to_string()),
            ..test_config()
        };
        assert_eq!(config.database_url(), "mysql://golf@localhost/golf");
    }

    #[test]
    fn bare_sqlite_path_becomes_a_url() {
        let config = AppConfig {
            database_url: None,
            sqlite_path: " /var/lib/golf/data.sqlite ".to_string(),
            ..test_config()
        };
        assert_eq!(config.database_url(), "sqlite:///var/lib/golf/data.sqlite?mode=rwc");

        let config = AppConfig {
            database_url: None,
            sqlite_path: "sqlite::memory:".to_string(),
            ..test_config()
        };
        assert_eq!(config.database_url(), "sqlite::memory:");
    }
}
