use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::services::MatchLimits;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    pub plan_api: Option<PlanApiSettings>,
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub matching: MatchingSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Where the candidate pool comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryBackend {
    #[default]
    Api,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositorySettings {
    #[serde(default)]
    pub backend: RepositoryBackend,
    /// JSON array of plans for the memory backend
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanApiSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_pool_page_size")]
    pub pool_page_size: u32,
    #[serde(default = "default_max_pool_page_size")]
    pub max_pool_page_size: u32,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default = "default_max_suggestion_limit")]
    pub max_suggestion_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            pool_page_size: default_pool_page_size(),
            max_pool_page_size: default_max_pool_page_size(),
            suggestion_limit: default_suggestion_limit(),
            max_suggestion_limit: default_max_suggestion_limit(),
        }
    }
}

impl From<&MatchingSettings> for MatchLimits {
    fn from(settings: &MatchingSettings) -> Self {
        Self {
            pool_page_size: settings.pool_page_size.clamp(1, settings.max_pool_page_size.max(1)),
            max_pool_page_size: settings.max_pool_page_size.max(1),
            suggestion_limit: settings.suggestion_limit,
            max_suggestion_limit: settings.max_suggestion_limit,
        }
    }
}

fn default_pool_page_size() -> u32 { 100 }
fn default_max_pool_page_size() -> u32 { 500 }
fn default_suggestion_limit() -> usize { 6 }
fn default_max_suggestion_limit() -> usize { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_cookie_name() -> String { "accessToken".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TRIPMATE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TRIPMATE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("TRIPMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_well_known_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("TRIPMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn match_limits(&self) -> MatchLimits {
        MatchLimits::from(&self.matching)
    }
}

/// Apply conventional unprefixed variables (DATABASE_URL, JWT_SECRET,
/// PLAN_API_URL, PLAN_API_KEY) on top of the layered config
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }
    if let Ok(endpoint) = env::var("PLAN_API_URL") {
        builder = builder.set_override("plan_api.endpoint", endpoint)?;
    }
    if let Ok(api_key) = env::var("PLAN_API_KEY") {
        builder = builder.set_override("plan_api.api_key", api_key)?;
    }

    builder.build()
}
