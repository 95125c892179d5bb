//! Database credentials from a managed secret store
//!
//! In managed-secret mode (`APPRUNNERSERVICE` set) the database username and
//! password come from a JSON secret `{"username": ..., "password": ...}`
//! fetched once at startup. Any failure here is fatal to startup.

use crate::config::AppConfig;
use crate::db::DatabaseCredentials;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use serde::Deserialize;
use tracing::info;

/// Source of secret payloads
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Current value of the secret as a string
    async fn secret_string(&self, secret_id: &str) -> Result<String>;
}

/// AWS Secrets Manager backed store
pub struct AwsSecretsManager {
    client: SecretsManagerClient,
}

impl AwsSecretsManager {
    /// Create a client from the default AWS provider chain
    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: SecretsManagerClient::new(&aws_config),
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManager {
    async fn secret_string(&self, secret_id: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| AppError::SecretStore {
                message: format!(
                    "GetSecretValue failed for '{}': {}",
                    secret_id,
                    DisplayErrorContext(&e)
                ),
            })?;

        output
            .secret_string()
            .map(str::to_owned)
            .ok_or_else(|| AppError::SecretStore {
                message: format!("secret '{}' has no string value", secret_id),
            })
    }
}

#[derive(Deserialize)]
struct SecretBundle {
    username: String,
    password: String,
}

/// Fetch and parse the credential bundle named by `secret_id`
pub async fn resolve_credentials(
    store: &dyn SecretStore,
    secret_id: Option<&str>,
) -> Result<DatabaseCredentials> {
    let secret_id = secret_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Configuration {
            message: "DBSECRETSNAME must be set when APPRUNNERSERVICE is enabled".to_string(),
        })?;

    let payload = store.secret_string(secret_id).await?;

    // The payload itself is never logged or echoed
    let bundle: SecretBundle = serde_json::from_str(&payload).map_err(|e| AppError::SecretStore {
        message: format!(
            "secret '{}' is not a JSON object with username and password: {}",
            secret_id,
            json_problem(&e)
        ),
    })?;

    info!(secret_id, username = %bundle.username, "Database credentials resolved from secret store");

    Ok(DatabaseCredentials::new(bundle.username, bundle.password))
}

/// Credentials used for the process lifetime: from the secret store in
/// managed-secret mode, otherwise from `DB_USER`/`DB_PASS`.
pub async fn startup_credentials(
    config: &AppConfig,
    store: Option<&dyn SecretStore>,
) -> Result<DatabaseCredentials> {
    if !config.secrets.managed {
        return Ok(DatabaseCredentials::from_config(&config.database));
    }

    let store = store.ok_or_else(|| AppError::Configuration {
        message: "managed-secret mode requires a secret store".to_string(),
    })?;

    resolve_credentials(store, config.secrets.secret_id.as_deref()).await
}

fn json_problem(err: &serde_json::Error) -> &'static str {
    use serde_json::error::Category;

    match err.classify() {
        Category::Io => "io error",
        Category::Syntax => "invalid JSON",
        Category::Data => "missing or mistyped field",
        Category::Eof => "truncated JSON",
    }
}
