// loanlink-core/src/domain/report.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::battery::ScriptKind;
use crate::domain::execution::ExecutionMode;
use crate::domain::portfolio::LoanPortfolioSummary;
use crate::domain::schema::{RowCountDelta, TableColumnDescriptor};

/// Everything one verification battery produced.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub runner: ScriptKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<ExecutionMode>,
    pub generated_at: DateTime<Utc>,
    pub tables_present: Vec<String>,
    pub missing_tables: Vec<String>,
    pub counts: Vec<RowCountDelta>,
    pub columns: BTreeMap<String, Vec<TableColumnDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<LoanPortfolioSummary>,
}

impl VerificationReport {
    pub fn new(runner: ScriptKind) -> Self {
        Self {
            runner,
            script: None,
            statements: None,
            execution_mode: None,
            generated_at: Utc::now(),
            tables_present: Vec::new(),
            missing_tables: Vec::new(),
            counts: Vec::new(),
            columns: BTreeMap::new(),
            portfolio: None,
        }
    }

    pub fn is_schema_complete(&self) -> bool {
        self.missing_tables.is_empty()
    }

    pub fn rows_added(&self) -> i64 {
        self.counts.iter().filter_map(RowCountDelta::added).sum()
    }
}
