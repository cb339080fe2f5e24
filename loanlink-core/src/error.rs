// loanlink-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

/// Failures raised while verifying the effect of a script.
#[derive(Error, Debug, Diagnostic)]
pub enum VerificationError {
    #[error("Expected tables are missing: {}", .0.join(", "))]
    #[diagnostic(code(loanlink::verify::missing_tables))]
    MissingTables(Vec<String>),

    #[error("Verification query failed ({what}): {source}")]
    #[diagnostic(code(loanlink::verify::query))]
    Query {
        what: String,
        #[source]
        source: InfrastructureError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),
}

/// One variant per failure class of a runner invocation.
/// Each maps to its own process exit code.
#[derive(Error, Debug, Diagnostic)]
pub enum LoanlinkError {
    #[error("Configuration Error: {0}")]
    #[diagnostic(
        code(loanlink::config),
        help("Check loanlink.yaml and the LOANLINK_* environment variables.")
    )]
    Configuration(#[source] InfrastructureError),

    #[error("Connection Error: {0}")]
    #[diagnostic(
        code(loanlink::connection),
        help(
            "Troubleshooting:\n  1. Is PostgreSQL running and reachable?\n  2. Is DATABASE_URL correct (host, port, database name)?\n  3. Are the credentials valid?\n  4. Does the server require TLS? Hosted databases need the provider marker in the URL."
        )
    )]
    Connection(#[source] InfrastructureError),

    #[error("Script Read Error: {0}")]
    #[diagnostic(
        code(loanlink::script_read),
        help(
            "Troubleshooting:\n  1. Does the file exist in the scripts directory?\n  2. Is --scripts-dir (or scripts-dir in loanlink.yaml) pointing at the right folder?\n  3. Is the file readable and non-empty?"
        )
    )]
    ScriptRead(#[source] InfrastructureError),

    #[error("Script Execution Error in '{script}': {source}")]
    #[diagnostic(
        code(loanlink::execution),
        help(
            "Troubleshooting:\n  1. Look for SQL syntax errors near the reported position.\n  2. Check that referenced tables exist (run 'loanlink setup' first).\n  3. A uniqueness violation usually means the script already ran."
        )
    )]
    Execution {
        script: String,
        #[source]
        source: InfrastructureError,
    },

    #[error("Verification Error: {0}")]
    #[diagnostic(
        code(loanlink::verification),
        help(
            "The script ran, but the database does not look as expected.\nRun 'loanlink check' to inspect the current schema."
        )
    )]
    Verification(#[from] VerificationError),

    #[error("Internal Error: {0}")]
    Internal(String),
}

/// Exit code for command-line usage errors (BSD `EX_USAGE`), kept apart from
/// the runner failure codes.
pub const USAGE_EXIT_CODE: u8 = 64;

impl LoanlinkError {
    pub fn exit_code(&self) -> u8 {
        match self {
            LoanlinkError::Internal(_) => 1,
            LoanlinkError::Configuration(_) => 2,
            LoanlinkError::Connection(_) => 3,
            LoanlinkError::ScriptRead(_) => 4,
            LoanlinkError::Execution { .. } => 5,
            LoanlinkError::Verification(_) => 6,
        }
    }
}
