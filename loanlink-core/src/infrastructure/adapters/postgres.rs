// loanlink-core/src/infrastructure/adapters/postgres.rs

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Connection, Executor, Postgres};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::execution::ExecutionMode;
use crate::domain::schema::{TableColumnDescriptor, validate_identifier};
use crate::infrastructure::config::connection::ConnectionSettings;
use crate::infrastructure::config::runner::RunnerConfig;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::script::split_statements;
use crate::ports::connector::Connector;

/// The session connection holds one slot for the whole run; verification
/// reads need at least one more.
pub const MIN_POOL_CONNECTIONS: u32 = 2;

#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&RunnerConfig> for PoolSettings {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            acquire_timeout: config.acquire_timeout(),
        }
    }
}

/// PostgreSQL through a lazily connected sqlx pool.
///
/// Building the connector never touches the network. The session connection
/// is checked out by `acquire` and handed back by `release`.
pub struct PostgresConnector {
    pool: PgPool,
    session: Mutex<Option<PoolConnection<Postgres>>>,
}

impl PostgresConnector {
    /// Fails only on a malformed connection string.
    pub fn new(
        settings: &ConnectionSettings,
        pool: PoolSettings,
    ) -> Result<Self, InfrastructureError> {
        let options = settings.connect_options()?;
        let max_connections = if pool.max_connections < MIN_POOL_CONNECTIONS {
            warn!(
                requested = pool.max_connections,
                used = MIN_POOL_CONNECTIONS,
                "Pool too small for a session plus verification reads"
            );
            MIN_POOL_CONNECTIONS
        } else {
            pool.max_connections
        };
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(pool.acquire_timeout)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            session: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn acquire(&self) -> Result<(), InfrastructureError> {
        let mut session = self.session.lock().await;
        if session.is_none() {
            *session = Some(self.pool.acquire().await?);
            debug!("Session connection checked out");
        }
        Ok(())
    }

    async fn execute_script(
        &self,
        sql: &str,
        mode: ExecutionMode,
    ) -> Result<(), InfrastructureError> {
        let mut session = self.session.lock().await;
        let conn = session.as_mut().ok_or(InfrastructureError::NoSession)?;

        match mode {
            ExecutionMode::Transactional => {
                let mut tx = Connection::begin(&mut **conn).await?;
                // Dropping `tx` on error issues the ROLLBACK.
                tx.execute(sqlx::raw_sql(sql)).await?;
                tx.commit().await?;
            }
            ExecutionMode::Autocommit => match split_statements(sql) {
                // Sent as one string the server would run the batch as a
                // single implicit transaction; one round trip per statement
                // lets each commit on its own.
                Some(statements) => {
                    for statement in &statements {
                        conn.execute(sqlx::raw_sql(statement.as_str())).await?;
                    }
                }
                None => {
                    warn!("Script could not be split; sending it as one batch");
                    conn.execute(sqlx::raw_sql(sql)).await?;
                }
            },
        }
        Ok(())
    }

    async fn existing_tables(
        &self,
        candidates: &[String],
    ) -> Result<Vec<String>, InfrastructureError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name::text = ANY($1) \
             ORDER BY table_name",
        )
        .bind(candidates)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn count_rows(&self, table: &str) -> Result<i64, InfrastructureError> {
        let table = validate_identifier(table)?;
        let sql = format!("SELECT count(*) FROM \"{table}\"");
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn fetch_columns(
        &self,
        table: &str,
    ) -> Result<Vec<TableColumnDescriptor>, InfrastructureError> {
        // information_schema uses domain types; cast to text for decoding.
        let rows: Vec<(String, String, bool)> = sqlx::query_as(
            "SELECT column_name::text, data_type::text, (is_nullable = 'YES') \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name::text = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() && self.existing_tables(&[table.to_string()]).await?.is_empty() {
            return Err(InfrastructureError::MissingTable(table.to_string()));
        }

        Ok(rows
            .into_iter()
            .map(|(column_name, data_type, is_nullable)| TableColumnDescriptor {
                column_name,
                data_type,
                is_nullable,
            })
            .collect())
    }

    async fn sum_as_text(&self, table: &str, column: &str) -> Result<String, InfrastructureError> {
        let table = validate_identifier(table)?;
        let column = validate_identifier(column)?;
        let sql = format!("SELECT COALESCE(SUM(\"{column}\"), 0)::text FROM \"{table}\"");
        let total: String = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn release(&self) -> Result<(), InfrastructureError> {
        match self.session.lock().await.take() {
            Some(conn) => {
                drop(conn);
                debug!("Session connection returned to the pool");
            }
            None => warn!("Release requested but no session connection was held"),
        }
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("Pool closed");
    }

    fn engine_name(&self) -> &str {
        "postgresql"
    }
}
