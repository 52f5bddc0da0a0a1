use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquiaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unable to find a database backup to download")]
    NoBackupFound,

    #[error("Task {uuid} failed")]
    OperationFailed { uuid: String },

    #[error("Task {uuid} did not complete within {waited_secs} seconds")]
    OperationTimeout { uuid: String, waited_secs: u64 },

    #[error("Unable to write configuration file {}: {reason}", path.display())]
    ConfigWriteFailure { path: PathBuf, reason: String },

    #[error("Environment '{environment}' not found in application {application}")]
    EnvironmentNotFound {
        application: String,
        environment: String,
    },

    #[error("No Acquia key/secret configured. Run `acquiacli setup` first")]
    MissingCredentials,

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Response carried no usable notification link: {0}")]
    InvalidNotificationLink(String),
}

pub type Result<T> = std::result::Result<T, AcquiaError>;
