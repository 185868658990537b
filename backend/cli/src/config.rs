use serde::Deserialize;

/// codedesk runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Credential for the remote assistant service.
    pub openai_api_key: Option<String>,
    /// Base URL of the assistant service API.
    pub base_url: String,
    /// Model the assistant is created with.
    pub model: String,
    /// Delay between run status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Log level used when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            poll_interval_ms: 750,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: std::env::var("CODEDESK_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("CODEDESK_MODEL").unwrap_or(defaults.model),
            poll_interval_ms: std::env::var("CODEDESK_POLL_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .unwrap_or(defaults.poll_interval_ms),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_hosted_service() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.poll_interval_ms, 750);
        assert!(config.openai_api_key.is_none());
    }
}
