// loanlink-core/src/domain/execution.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// How a multi-statement script is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// `BEGIN … COMMIT` around the script; a failure rolls everything back.
    #[default]
    Transactional,
    /// Statements apply as they run; a failure partway leaves earlier ones in place.
    Autocommit,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Transactional => write!(f, "transactional"),
            ExecutionMode::Autocommit => write!(f, "autocommit"),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" | "transaction" | "tx" => Ok(ExecutionMode::Transactional),
            "autocommit" | "auto" => Ok(ExecutionMode::Autocommit),
            other => Err(DomainError::UnknownExecutionMode(other.to_string())),
        }
    }
}
