//! API configuration
//!
//! Sources, lowest precedence first: built-in defaults, the optional
//! `config/policy-board.toml`, then `API_`-prefixed environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use core_kernel::ordering::is_qualified_identifier;
use domain_policy::{FailureMode, POLICY_VIEW};
use infra_db::pool::redact_url;

/// Optional configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "config/policy-board";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "API";

/// Conventional variables the hosted service's tooling sets
const URL_FALLBACKS: [&str; 2] = ["PUBLIC_SUPABASE_URL", "SUPABASE_URL"];
const KEY_FALLBACKS: [&str; 2] = ["PUBLIC_SUPABASE_ANON_KEY", "SUPABASE_ANON_KEY"];

/// Where policies are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The hosted service's REST layer
    #[default]
    HostedRest,
    /// Direct PostgreSQL connection
    Postgres,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// API configuration
#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level or `EnvFilter` directives
    pub log_level: String,
    pub log_format: LogFormat,
    pub data_source: DataSource,
    /// Hosted project URL
    #[serde(default)]
    pub hosted_url: Option<String>,
    /// Hosted public (anon) API key
    #[serde(default)]
    pub hosted_api_key: Option<String>,
    /// Schema sent as `Accept-Profile`
    #[serde(default)]
    pub hosted_schema: Option<String>,
    /// PostgreSQL connection string
    #[serde(default)]
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Upper bound for one store read; unset keeps client defaults
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Listing view to read
    pub view_name: String,
    /// Behavior when the store cannot be read
    pub on_error: FailureMode,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            data_source: DataSource::HostedRest,
            hosted_url: None,
            hosted_api_key: None,
            hosted_schema: None,
            database_url: None,
            max_connections: 10,
            request_timeout_secs: None,
            view_name: POLICY_VIEW.to_string(),
            on_error: FailureMode::EmptyOnError,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("data_source", &self.data_source)
            .field("hosted_url", &self.hosted_url)
            .field("hosted_api_key", &self.hosted_api_key.as_ref().map(|_| "<redacted>"))
            .field("hosted_schema", &self.hosted_schema)
            .field("database_url", &self.database_url.as_deref().map(redact_url))
            .field("max_connections", &self.max_connections)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("view_name", &self.view_name)
            .field("on_error", &self.on_error)
            .finish()
    }
}

impl ApiConfig {
    /// Loads configuration from the file and process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::build(
            Some(File::with_name(CONFIG_FILE).required(false)),
            Environment::with_prefix(ENV_PREFIX),
        )?;
        config.apply_fallbacks(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Layers defaults, an optional file and an environment source
    pub fn build(
        file: Option<File<config::FileSourceFile, config::FileFormat>>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", "pretty")?
            .set_default("data_source", "hosted_rest")?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("view_name", defaults.view_name)?
            .set_default("on_error", "empty")?;
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        builder.add_source(env).build()?.try_deserialize()
    }

    /// Fills unset hosted settings from the conventional variables
    pub fn apply_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
        };
        if self.hosted_url.is_none() {
            self.hosted_url = first(&URL_FALLBACKS);
        }
        if self.hosted_api_key.is_none() {
            self.hosted_api_key = first(&KEY_FALLBACKS);
        }
    }

    /// Checks that the selected data source has what it needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_qualified_identifier(&self.view_name) {
            return Err(invalid(format!("view_name '{}' is not a SQL identifier", self.view_name)));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(invalid("request_timeout_secs must be greater than zero"));
        }

        match self.data_source {
            DataSource::HostedRest => {
                if self.view_name.contains('.') {
                    return Err(invalid("view_name cannot be schema-qualified for hosted_rest; set hosted_schema"));
                }
                let url = self
                    .hosted_url
                    .as_deref()
                    .ok_or_else(|| invalid("hosted_url is required for the hosted_rest data source"))?;
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(invalid(format!("hosted_url '{}' must be an http(s) URL", url)));
                }
                if self.hosted_api_key.as_deref().map_or(true, str::is_empty) {
                    return Err(invalid("hosted_api_key is required for the hosted_rest data source"));
                }
            }
            DataSource::Postgres => {
                if self.database_url.is_none() {
                    return Err(invalid("database_url is required for the postgres data source"));
                }
                if self.max_connections == 0 {
                    return Err(invalid("max_connections must be greater than zero"));
                }
            }
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Message(message.into())
}
