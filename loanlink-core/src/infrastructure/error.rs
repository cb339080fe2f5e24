// loanlink-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::error::DomainError;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("PostgreSQL Error: {0}")]
    #[diagnostic(
        code(loanlink::infra::database::postgres),
        help("An error was returned by the driver or the server.")
    )]
    Postgres(#[from] sqlx::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("No session connection is checked out")]
    #[diagnostic(code(loanlink::infra::no_session))]
    NoSession,

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(loanlink::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Cannot read '{path}': {source}")]
    #[diagnostic(code(loanlink::infra::script_read))]
    ScriptRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Table '{0}' does not exist")]
    #[diagnostic(code(loanlink::infra::missing_table))]
    MissingTable(String),

    #[error("Script '{0}' is empty")]
    #[diagnostic(code(loanlink::infra::empty_script))]
    EmptyScript(String),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(loanlink::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(loanlink::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(loanlink::infra::config_invalid))]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(loanlink::infra::config))]
    ConfigError(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),
}

// Shortcut for `?` on sqlx calls
impl From<sqlx::Error> for InfrastructureError {
    fn from(err: sqlx::Error) -> Self {
        InfrastructureError::Database(DatabaseError::Postgres(err))
    }
}
