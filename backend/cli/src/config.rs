use anyhow::Result;

use droplink_core::DropError;

/// Droplink runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram Bot API token.
    pub bot_token: Option<String>,
    /// Telegram user id of the privileged uploader. The default of 0
    /// matches no real user, so uploads are rejected until it is set.
    pub admin_id: u64,
    /// SQLite database path.
    pub db_path: String,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: None,
            admin_id: 0,
            db_path: "droplink.db".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            bot_token: std::env::var("DROPLINK_BOT_TOKEN").ok(),
            admin_id: std::env::var("DROPLINK_ADMIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            db_path: std::env::var("DROPLINK_DB")
                .unwrap_or_else(|_| "droplink.db".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// The bot cannot start without a token; everything else has a default.
    pub fn require_token(&self) -> Result<String> {
        self.bot_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DropError::MissingConfig("DROPLINK_BOT_TOKEN".to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_a_typed_error() {
        let config = Config::default();
        let err = config.require_token().expect_err("no token configured");
        assert!(err.to_string().contains("DROPLINK_BOT_TOKEN"));
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let config = Config {
            bot_token: Some(String::new()),
            ..Config::default()
        };
        assert!(config.require_token().is_err());
    }
}
