// loanlink-core/src/application/mock.rs
//
// In-memory Connector with fault injection, shared by the application tests.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::domain::execution::ExecutionMode;
use crate::domain::schema::TableColumnDescriptor;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::connector::Connector;

#[derive(Default)]
pub struct MockConnector {
    /// table -> row count
    pub tables: Mutex<BTreeMap<String, i64>>,
    pub sums: Mutex<HashMap<(String, String), String>>,
    pub columns: HashMap<String, Vec<TableColumnDescriptor>>,
    pub on_execute_insert: Vec<(String, i64)>,
    pub on_execute_drop: Vec<String>,
    pub fail_acquire: bool,
    pub fail_execute: bool,
    pub fail_release: bool,
    /// Lifecycle calls in order: acquire, execute, release, close.
    pub calls: Mutex<Vec<&'static str>>,
    pub executed_modes: Mutex<Vec<ExecutionMode>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(self, tables: &[(&str, i64)]) -> Self {
        {
            let mut map = self.tables.lock().unwrap();
            for (name, rows) in tables {
                map.insert(name.to_string(), *rows);
            }
        }
        self
    }

    pub fn with_sum(self, table: &str, column: &str, total: &str) -> Self {
        self.sums
            .lock()
            .unwrap()
            .insert((table.to_string(), column.to_string()), total.to_string());
        self
    }

    pub fn with_columns(mut self, table: &str, cols: &[(&str, &str)]) -> Self {
        let descriptors = cols
            .iter()
            .map(|(name, ty)| TableColumnDescriptor {
                column_name: name.to_string(),
                data_type: ty.to_string(),
                is_nullable: false,
            })
            .collect();
        self.columns.insert(table.to_string(), descriptors);
        self
    }

    pub fn inserting(mut self, table: &str, rows: i64) -> Self {
        self.on_execute_insert.push((table.to_string(), rows));
        self
    }

    pub fn dropping(mut self, table: &str) -> Self {
        self.on_execute_drop.push(table.to_string());
        self
    }

    pub fn failing_acquire(mut self) -> Self {
        self.fail_acquire = true;
        self
    }

    pub fn failing_execute(mut self) -> Self {
        self.fail_execute = true;
        self
    }

    pub fn failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    pub fn rows(&self, table: &str) -> Option<i64> {
        self.tables.lock().unwrap().get(table).copied()
    }

    fn missing_relation(table: &str) -> InfrastructureError {
        sqlx::Error::Protocol(format!("relation \"{table}\" does not exist")).into()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn acquire(&self) -> Result<(), InfrastructureError> {
        self.calls.lock().unwrap().push("acquire");
        if self.fail_acquire {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }

    async fn execute_script(
        &self,
        _sql: &str,
        mode: ExecutionMode,
    ) -> Result<(), InfrastructureError> {
        self.calls.lock().unwrap().push("execute");
        self.executed_modes.lock().unwrap().push(mode);
        if self.fail_execute {
            return Err(sqlx::Error::Protocol("syntax error at or near \"SELEC\"".into()).into());
        }

        let mut tables = self.tables.lock().unwrap();
        for (table, rows) in &self.on_execute_insert {
            *tables.entry(table.clone()).or_insert(0) += rows;
        }
        for table in &self.on_execute_drop {
            tables.remove(table);
        }
        Ok(())
    }

    async fn existing_tables(
        &self,
        candidates: &[String],
    ) -> Result<Vec<String>, InfrastructureError> {
        let tables = self.tables.lock().unwrap();
        Ok(candidates
            .iter()
            .filter(|t| tables.contains_key(*t))
            .cloned()
            .collect())
    }

    async fn count_rows(&self, table: &str) -> Result<i64, InfrastructureError> {
        self.rows(table).ok_or_else(|| Self::missing_relation(table))
    }

    async fn fetch_columns(
        &self,
        table: &str,
    ) -> Result<Vec<TableColumnDescriptor>, InfrastructureError> {
        if self.rows(table).is_none() {
            return Err(InfrastructureError::MissingTable(table.to_string()));
        }
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn sum_as_text(&self, table: &str, column: &str) -> Result<String, InfrastructureError> {
        if self.rows(table).is_none() {
            return Err(Self::missing_relation(table));
        }
        Ok(self
            .sums
            .lock()
            .unwrap()
            .get(&(table.to_string(), column.to_string()))
            .cloned()
            .unwrap_or_else(|| "0".to_string()))
    }

    async fn release(&self) -> Result<(), InfrastructureError> {
        self.calls.lock().unwrap().push("release");
        if self.fail_release {
            return Err(sqlx::Error::PoolClosed.into());
        }
        Ok(())
    }

    async fn close(&self) {
        self.calls.lock().unwrap().push("close");
    }

    fn engine_name(&self) -> &str {
        "mock"
    }
}
