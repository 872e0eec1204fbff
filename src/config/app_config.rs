use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;

use crate::domain::application_token::TokenCredential;
use crate::domain::auth::TeamCreationPolicy;
use crate::infrastructure::application_token::DEFAULT_AUTH_HEADER;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub teams: TeamsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// PostgreSQL settings; without a URL the in-memory repositories are used
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

/// Application token settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Request header carrying `<username>:<application>:<secret>`
    pub header_name: String,
    pub salt_bytes: usize,
    /// Length of generated secrets before encoding
    pub secret_bytes: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    pub creation_policy: TeamCreationPolicy,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header_name: DEFAULT_AUTH_HEADER.to_string(),
            salt_bytes: TokenCredential::DEFAULT_SALT_BYTES,
            secret_bytes: TokenCredential::DEFAULT_SECRET_BYTES,
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `APP__*` variables
    ///
    /// Unknown values are errors; a misspelled `teams.creation_policy` must
    /// not fall back to the permissive default.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_builder(Self::sources())
    }

    fn sources() -> ConfigBuilder<DefaultState> {
        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}
