use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Rate limiting window configuration; per-key limits live on the keys
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub window_seconds: u64,
}

/// Webhook delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    pub delivery_timeout_seconds: u64,
    /// Signs deliveries for subscriptions that have no secret of their own
    pub signing_secret: Option<String>,
}

/// Upstream generation engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { window_seconds: 60 }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            delivery_timeout_seconds: 10,
            signing_secret: None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9800".to_string(),
            timeout_seconds: 120,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert_eq!(config.webhook.delivery_timeout_seconds, 10);
        assert!(config.webhook.signing_secret.is_none());
        assert_eq!(config.engine.timeout_seconds, 120);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server": {"host": "127.0.0.1", "port": 9000}}"#).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.rate_limit.window_seconds, 60);
    }
}
