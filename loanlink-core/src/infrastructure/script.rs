// loanlink-core/src/infrastructure/script.rs

use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;

/// A SQL file read into memory.
#[derive(Debug, Clone)]
pub struct SqlScript {
    pub path: PathBuf,
    pub sql: String,
    /// Best-effort; `None` when the PostgreSQL dialect parser gives up
    /// (e.g. on `DO $$ … $$` blocks).
    pub statement_count: Option<usize>,
}

impl SqlScript {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn size_bytes(&self) -> usize {
        self.sql.len()
    }
}

#[instrument]
pub fn load_script(path: &Path) -> Result<SqlScript, InfrastructureError> {
    let sql = fs::read_to_string(path).map_err(|source| InfrastructureError::ScriptRead {
        path: path.display().to_string(),
        source,
    })?;

    if sql.trim().is_empty() {
        return Err(InfrastructureError::EmptyScript(path.display().to_string()));
    }

    let statement_count = count_statements(&sql);
    debug!(bytes = sql.len(), statements = ?statement_count, "Script loaded");

    Ok(SqlScript {
        path: path.to_path_buf(),
        sql,
        statement_count,
    })
}

fn count_statements(sql: &str) -> Option<usize> {
    split_statements(sql).map(|statements| statements.len())
}

/// Splits a script into standalone statements, re-rendered by the parser.
/// `None` when the dialect parser cannot handle the script.
pub fn split_statements(sql: &str) -> Option<Vec<String>> {
    match Parser::parse_sql(&PostgreSqlDialect {}, sql) {
        Ok(statements) => Some(statements.iter().map(ToString::to_string).collect()),
        Err(e) => {
            debug!(error = %e, "Script could not be split into statements");
            None
        }
    }
}
