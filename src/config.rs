use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub instance_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `dev`, `development` and `local` select development; anything else is production
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" | "local" => Self::Development,
            _ => Self::Production,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    /// Overrides the environment when set
    pub debug: Option<bool>,
}

impl AppConfig {
    /// Whether error detail is exposed for server errors
    pub fn is_dev(&self) -> bool {
        self.debug
            .unwrap_or(self.environment == Environment::Development)
    }
}

#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub default_locale: String,
    pub catalog_path: Option<String>,
    pub strict: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
                // Only reported in error metadata. Falls back to HOSTNAME
                // (Docker/Kubernetes), otherwise "unknown".
                instance_id: env::var("INSTANCE_ID")
                    .or_else(|_| env::var("HOSTNAME"))
                    .unwrap_or_else(|_| "unknown".to_string()),
            },
            app: AppConfig {
                environment: Environment::parse(
                    &env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
                ),
                debug: env::var("APP_DEBUG")
                    .ok()
                    .map(|v| parse_bool(&v).context("APP_DEBUG must be true or false"))
                    .transpose()?,
            },
            translation: TranslationConfig {
                default_locale: env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
                catalog_path: env::var("TRANSLATIONS_PATH")
                    .ok()
                    .filter(|path| !path.trim().is_empty()),
                strict: env::var("TRANSLATIONS_STRICT")
                    .ok()
                    .map(|v| parse_bool(&v).context("TRANSLATIONS_STRICT must be true or false"))
                    .transpose()?
                    .unwrap_or(false),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid boolean '{}'", other),
    }
}
