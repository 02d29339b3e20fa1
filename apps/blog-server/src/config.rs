//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{DatabaseConfig, SmtpConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// `None` keeps outgoing mail in memory.
    pub smtp: Option<SmtpConfig>,
    pub site: SiteConfig,
}

/// Settings used to build links and outgoing mail.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base URL for absolute links, e.g. `https://blog.example.com`.
    /// When unset, links use the scheme and host of the request.
    pub site_url: Option<String>,
    /// Sender address of share messages.
    pub mail_from: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: None,
            mail_from: "blog@localhost".to_string(),
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 20),
            min_connections: parsed("DB_MIN_CONNECTIONS", 2),
        });

        let smtp = env::var("SMTP_HOST").ok().map(|host| SmtpConfig {
            host,
            port: parsed("SMTP_PORT", 587),
            username: env::var("SMTP_USERNAME").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
        });

        let site = SiteConfig {
            site_url: env::var("SITE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| SiteConfig::default().mail_from),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            smtp,
            site,
        }
    }
}
