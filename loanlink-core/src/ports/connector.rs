// loanlink-core/src/ports/connector.rs
//
// What the runner needs from a database, without knowing which one.

use async_trait::async_trait;

use crate::domain::execution::ExecutionMode;
use crate::domain::schema::TableColumnDescriptor;
use crate::infrastructure::error::InfrastructureError;

/// A pooled database handle with one checked-out session connection.
///
/// Scripts run on the session connection. Read-only verification queries may
/// go through the pool and run concurrently.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Checks out the session connection. First point where network errors surface.
    async fn acquire(&self) -> Result<(), InfrastructureError>;

    /// Runs a (possibly multi-statement) script on the session connection.
    async fn execute_script(&self, sql: &str, mode: ExecutionMode)
    -> Result<(), InfrastructureError>;

    /// Returns the subset of `candidates` that exist in the `public` schema.
    async fn existing_tables(&self, candidates: &[String])
    -> Result<Vec<String>, InfrastructureError>;

    async fn count_rows(&self, table: &str) -> Result<i64, InfrastructureError>;

    async fn fetch_columns(
        &self,
        table: &str,
    ) -> Result<Vec<TableColumnDescriptor>, InfrastructureError>;

    /// `COALESCE(SUM(column), 0)` as text, so no precision is lost on the wire.
    async fn sum_as_text(&self, table: &str, column: &str) -> Result<String, InfrastructureError>;

    /// Returns the session connection to the pool. No-op if none is held.
    async fn release(&self) -> Result<(), InfrastructureError>;

    /// Closes the pool. Waits for checked-out connections to come back.
    async fn close(&self);

    fn engine_name(&self) -> &str;
}
