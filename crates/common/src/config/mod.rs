//! Configuration management for the demo service
//!
//! Every setting comes from an unprefixed process environment variable
//! (`PORT`, `TABLE_NAME`, `DB_HOST`, ...). Absent or empty variables fall
//! back to the defaults below; only malformed values are rejected.

use config::{Config, ConfigError, Environment, Map};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Connectivity probe configuration
    pub probe: ProbeConfig,

    /// Upstream passthrough configuration
    pub upstream: UpstreamConfig,

    /// Managed secret configuration
    pub secrets: SecretsConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    /// Database host; the driver default applies when unset
    pub host: Option<String>,

    /// Database name
    pub name: String,

    /// Table holding visit records
    pub table: String,

    /// Username from `DB_USER`
    pub user: Option<String>,

    /// Password from `DB_PASS`
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Host probed by `/test-connection`
    pub target: String,

    /// Port probed by `/test-connection`
    pub port: u16,

    /// Connect timeout per resolved address in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Internal service URL relayed by `/ecs-private-service`
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SecretsConfig {
    /// Fetch database credentials from the secret store at startup
    pub managed: bool,

    /// Secret identifier (name or ARN)
    pub secret_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,

    /// Enable JSON logging
    pub json_logging: bool,

    /// Prometheus exporter port (0 to disable)
    pub metrics_port: u16,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("name", &self.name)
            .field("table", &self.table)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Raw environment view, one field per variable (keys are lowercased)
#[derive(Debug, Deserialize)]
struct EnvSettings {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_table_name")]
    table_name: String,
    #[serde(default = "default_target")]
    target: String,
    target_port: Option<u16>,
    db_host: Option<String>,
    #[serde(default = "default_db_name")]
    db_name: String,
    db_user: Option<String>,
    db_pass: Option<String>,
    dbsecretsname: Option<String>,
    apprunnerservice: Option<String>,
    ecsprivateservice: Option<String>,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_json_logging")]
    log_json: bool,
    #[serde(default)]
    metrics_port: u16,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_table_name() -> String { "access".to_string() }
fn default_target() -> String { "0.0.0.0".to_string() }
fn default_db_name() -> String { "apprunnerdemo".to_string() }
fn default_probe_timeout() -> u64 { 2 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default().ignore_empty(true))
    }

    /// Load configuration from an explicit variable map instead of the process environment
    pub fn from_env_map<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars: Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self::from_source(Environment::default().ignore_empty(true).source(Some(vars)))
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        let settings: EnvSettings = Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;

        Self::from_settings(settings)
    }

    fn from_settings(env: EnvSettings) -> Result<Self, ConfigError> {
        validate_table_name(&env.table_name)?;

        Ok(Self {
            server: ServerConfig {
                host: default_host(),
                port: env.port,
            },
            database: DatabaseConfig {
                host: env.db_host,
                name: env.db_name,
                table: env.table_name,
                user: env.db_user,
                password: env.db_pass,
            },
            probe: ProbeConfig {
                target: env.target,
                // Without TARGET_PORT the probe checks the service's own port
                port: env.target_port.unwrap_or(env.port),
                timeout_secs: default_probe_timeout(),
            },
            upstream: UpstreamConfig {
                url: env.ecsprivateservice,
            },
            secrets: SecretsConfig {
                managed: env.apprunnerservice.is_some(),
                secret_id: env.dbsecretsname,
            },
            observability: ObservabilityConfig {
                log_level: env.log_level,
                json_logging: env.log_json,
                metrics_port: env.metrics_port,
            },
        })
    }

    /// Get the probe timeout as Duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_secs)
    }
}

/// The table name is interpolated into SQL, so it must be a plain identifier
/// (optionally schema-qualified).
fn validate_table_name(name: &str) -> Result<(), ConfigError> {
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|p| valid_part(p)) {
        Ok(())
    } else {
        Err(ConfigError::Message(format!(
            "TABLE_NAME '{}' is not a valid SQL identifier",
            name
        )))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            database: DatabaseConfig {
                host: None,
                name: default_db_name(),
                table: default_table_name(),
                user: None,
                password: None,
            },
            probe: ProbeConfig {
                target: default_target(),
                port: default_port(),
                timeout_secs: default_probe_timeout(),
            },
            upstream: UpstreamConfig { url: None },
            secrets: SecretsConfig {
                managed: false,
                secret_id: None,
            },
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logging: default_json_logging(),
                metrics_port: 0,
            },
        }
    }
}
