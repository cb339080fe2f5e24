// loanlink-core/src/domain/schema.rs

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::domain::error::DomainError;

/// Tables the LoanLink dashboard expects in the `public` schema.
pub const EXPECTED_TABLES: [&str; 5] = ["companies", "loans", "repayments", "payments", "users"];

#[allow(clippy::expect_used)]
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("identifier pattern is valid")
});

/// Table and column names are interpolated into count/sum queries,
/// so only plain identifiers are accepted.
pub fn validate_identifier(name: &str) -> Result<&str, DomainError> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(DomainError::InvalidIdentifier(name.to_string()))
    }
}

/// One row of `information_schema.columns`, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumnDescriptor {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

/// Row count of a table after the script, compared with the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowCountDelta {
    pub table: String,
    /// `None` when no baseline was taken. A table created by the script has `Some(0)`.
    pub before: Option<i64>,
    pub after: i64,
}

impl RowCountDelta {
    pub fn added(&self) -> Option<i64> {
        self.before.map(|before| self.after - before)
    }
}
