// loanlink-core/src/application/runner.rs
//
// load -> connect -> baseline -> execute -> verify, then release + close no matter what.

use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::application::{engine, verification};
use crate::domain::battery::ScriptKind;
use crate::domain::execution::ExecutionMode;
use crate::domain::report::VerificationReport;
use crate::error::LoanlinkError;
use crate::infrastructure::script::{SqlScript, load_script};
use crate::ports::connector::Connector;

#[derive(Debug, Clone)]
pub struct RunJob {
    pub kind: ScriptKind,
    /// Required for every kind except `Check`.
    pub script_path: Option<PathBuf>,
    pub mode: ExecutionMode,
    /// Print progress lines to stdout. Off for JSON output.
    pub announce: bool,
}

impl RunJob {
    pub fn check() -> Self {
        Self {
            kind: ScriptKind::Check,
            script_path: None,
            mode: ExecutionMode::default(),
            announce: true,
        }
    }

    pub fn script(kind: ScriptKind, path: PathBuf, mode: ExecutionMode) -> Self {
        Self {
            kind,
            script_path: Some(path),
            mode,
            announce: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.announce = false;
        self
    }

    /// Reads the job's script. `Ok(None)` for runners that execute nothing.
    pub fn load(&self) -> Result<Option<SqlScript>, LoanlinkError> {
        if !self.kind.executes_script() {
            return Ok(None);
        }
        let path = self.script_path.as_ref().ok_or_else(|| {
            LoanlinkError::Internal(format!("runner '{}' needs a script path", self.kind))
        })?;

        let script = load_script(path).map_err(LoanlinkError::ScriptRead)?;
        self.say(format!(
            "📄 Loaded {} ({:.1} KB)",
            script.name(),
            script.size_bytes() as f64 / 1024.0
        ));
        Ok(Some(script))
    }

    fn say(&self, line: impl AsRef<str>) {
        if self.announce {
            println!("{}", line.as_ref());
        }
    }
}

/// Runs one job against `connector`, loading its script first.
///
/// The session connection is released once if it was acquired, and the pool
/// is closed once, on every path. A cleanup failure after a failed run is
/// logged and the original error is returned.
pub async fn run_job(
    connector: &dyn Connector,
    job: &RunJob,
) -> Result<VerificationReport, LoanlinkError> {
    let script = job.load();
    guarded(connector, job, script).await
}

/// Like [`run_job`] for a script already read with [`RunJob::load`], so a
/// missing file can be reported before any connector is built.
pub async fn run_loaded(
    connector: &dyn Connector,
    job: &RunJob,
    script: Option<SqlScript>,
) -> Result<VerificationReport, LoanlinkError> {
    guarded(connector, job, Ok(script)).await
}

#[instrument(skip_all, fields(runner = %job.kind))]
async fn guarded(
    connector: &dyn Connector,
    job: &RunJob,
    script: Result<Option<SqlScript>, LoanlinkError>,
) -> Result<VerificationReport, LoanlinkError> {
    let start = Instant::now();
    let mut acquired = false;

    let outcome = drive(connector, job, script, &mut acquired).await;

    let released = if acquired {
        connector.release().await.map_err(LoanlinkError::Connection)
    } else {
        Ok(())
    };
    connector.close().await;
    info!(elapsed = ?start.elapsed(), acquired, "Connection released, pool closed");

    match (outcome, released) {
        (Ok(report), Ok(())) => {
            job.say(format!("🔒 Connection closed ({:.2?})", start.elapsed()));
            Ok(report)
        }
        (Ok(_), Err(cleanup)) => Err(cleanup),
        (Err(e), Err(cleanup)) => {
            error!(error = %cleanup, "Cleanup failed after an earlier error");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
    }
}

async fn drive(
    connector: &dyn Connector,
    job: &RunJob,
    script: Result<Option<SqlScript>, LoanlinkError>,
    acquired: &mut bool,
) -> Result<VerificationReport, LoanlinkError> {
    let plan = job.kind.battery();
    let mut report = VerificationReport::new(job.kind);

    // 1. Load: must fail before the database is touched.
    let script = script?;

    // 2. Connect
    connector.acquire().await.map_err(LoanlinkError::Connection)?;
    *acquired = true;
    job.say(format!("✅ Connected to {}", connector.engine_name()));

    // 3. Baseline + Execute
    let baseline = match &script {
        Some(script) => {
            let baseline = verification::capture_baseline(connector, &plan).await?;

            job.say(format!("⚡ Executing {} ({})...", script.name(), job.mode));
            engine::execute_script(connector, script, job.mode).await?;
            job.say("✅ Script applied");

            report.script = Some(script.name());
            report.statements = script.statement_count;
            report.execution_mode = Some(job.mode);
            Some(baseline)
        }
        None => None,
    };

    // 4. Verify
    job.say("🔍 Running verification battery...");
    let report = verification::run_battery(connector, &plan, baseline.as_ref(), report).await?;

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::mock::MockConnector;
    use crate::error::VerificationError;
    use anyhow::Result;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    const ALL_TABLES: [(&str, i64); 5] = [
        ("companies", 0),
        ("loans", 0),
        ("repayments", 0),
        ("payments", 0),
        ("users", 1),
    ];

    fn write_script(dir: &TempDir, name: &str) -> Result<PathBuf> {
        let path = dir.path().join(name);
        fs::write(&path, "INSERT INTO companies (name) VALUES ('Acme');")?;
        Ok(path)
    }

    fn seeded_mock() -> MockConnector {
        MockConnector::new()
            .with_tables(&ALL_TABLES)
            .inserting("companies", 3)
            .inserting("loans", 5)
            .inserting("repayments", 10)
            .inserting("payments", 4)
            .with_sum("loans", "principal", "1250000.00")
            .with_sum("payments", "amount", "310500.25")
    }

    #[tokio::test]
    async fn test_seed_reports_rows_added_and_portfolio() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Seed,
            write_script(&dir, "add-demo-data.sql")?,
            ExecutionMode::Transactional,
        )
        .quiet();
        let connector = seeded_mock();

        let report = run_job(&connector, &job).await?;

        let added: Vec<(String, Option<i64>)> = report
            .counts
            .iter()
            .map(|c| (c.table.clone(), c.added()))
            .collect();
        assert_eq!(
            added,
            vec![
                ("companies".to_string(), Some(3)),
                ("loans".to_string(), Some(5)),
                ("repayments".to_string(), Some(10)),
                ("payments".to_string(), Some(4)),
            ]
        );
        assert_eq!(report.portfolio.unwrap().outstanding, 939_499.75);
        assert_eq!(report.script.as_deref(), Some("add-demo-data.sql"));
        assert_eq!(connector.calls(), vec!["acquire", "execute", "release", "close"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_second_seed_run_doubles_counts() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Seed,
            write_script(&dir, "add-demo-data.sql")?,
            ExecutionMode::Transactional,
        )
        .quiet();
        let connector = seeded_mock();

        run_job(&connector, &job).await?;
        let second = run_job(&connector, &job).await?;

        let loans = second.counts.iter().find(|c| c.table == "loans").unwrap();
        assert_eq!(loans.before, Some(5));
        assert_eq!(loans.after, 10);
        assert_eq!(loans.added(), Some(5));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_script_fails_before_connecting() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Migrate,
            dir.path().join("migrate-database.sql"),
            ExecutionMode::Transactional,
        )
        .quiet();
        let connector = seeded_mock();

        let err = run_job(&connector, &job).await.unwrap_err();

        assert!(matches!(err, LoanlinkError::ScriptRead(_)));
        assert_eq!(err.exit_code(), 4);
        assert_eq!(connector.call_count("acquire"), 0);
        assert_eq!(connector.calls(), vec!["close"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_connection_failure_still_closes_pool() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Setup,
            write_script(&dir, "schema.sql")?,
            ExecutionMode::Transactional,
        )
        .quiet();
        let connector = MockConnector::new().failing_acquire();

        let err = run_job(&connector, &job).await.unwrap_err();

        assert!(matches!(err, LoanlinkError::Connection(_)));
        assert_eq!(connector.call_count("close"), 1);
        assert_eq!(connector.call_count("release"), 0);
        assert_eq!(connector.call_count("execute"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_execution_failure_releases_and_closes() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Seed,
            write_script(&dir, "add-demo-data.sql")?,
            ExecutionMode::Transactional,
        )
        .quiet();
        let connector = seeded_mock().failing_execute();

        let err = run_job(&connector, &job).await.unwrap_err();

        assert_eq!(err.exit_code(), 5);
        assert_eq!(connector.rows("loans"), Some(0));
        assert_eq!(connector.calls(), vec!["acquire", "execute", "release", "close"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_dropped_table_surfaces_on_verification_count() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Migrate,
            write_script(&dir, "migrate-database.sql")?,
            ExecutionMode::Autocommit,
        )
        .quiet();
        let connector = MockConnector::new()
            .with_tables(&ALL_TABLES)
            .dropping("loans");

        let err = run_job(&connector, &job).await.unwrap_err();

        match &err {
            LoanlinkError::Verification(VerificationError::Query { what, .. }) => {
                assert_eq!(what, "row count of 'loans'");
            }
            other => panic!("expected a verification query failure, got {other:?}"),
        }
        assert_eq!(err.exit_code(), 6);
        assert_eq!(connector.call_count("execute"), 1);
        assert_eq!(connector.call_count("release"), 1);
        assert_eq!(connector.call_count("close"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_check_runs_no_script() -> Result<()> {
        let connector = MockConnector::new().with_tables(&[("companies", 2), ("users", 1)]);

        let report = run_job(&connector, &RunJob::check().quiet()).await?;

        assert_eq!(report.missing_tables, vec!["loans", "repayments", "payments"]);
        assert!(report.portfolio.is_none());
        assert!(report.script.is_none());
        assert_eq!(connector.calls(), vec!["acquire", "release", "close"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_release_failure_after_success_is_reported() -> Result<()> {
        let connector = MockConnector::new()
            .with_tables(&ALL_TABLES)
            .failing_release();

        let err = run_job(&connector, &RunJob::check().quiet())
            .await
            .unwrap_err();

        assert!(matches!(err, LoanlinkError::Connection(_)));
        assert_eq!(connector.call_count("close"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_release_failure_does_not_mask_execution_error() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Setup,
            write_script(&dir, "schema.sql")?,
            ExecutionMode::Transactional,
        )
        .quiet();
        let connector = seeded_mock().failing_execute().failing_release();

        let err = run_job(&connector, &job).await.unwrap_err();

        assert!(matches!(err, LoanlinkError::Execution { .. }));
        assert_eq!(connector.call_count("close"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_preloaded_script_runs_the_same_pipeline() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Seed,
            write_script(&dir, "add-demo-data.sql")?,
            ExecutionMode::Transactional,
        )
        .quiet();
        let script = job.load()?;
        let connector = seeded_mock();

        let report = run_loaded(&connector, &job, script).await?;

        assert_eq!(report.script.as_deref(), Some("add-demo-data.sql"));
        assert_eq!(connector.calls(), vec!["acquire", "execute", "release", "close"]);
        Ok(())
    }

    #[test]
    fn test_load_reports_missing_file_without_a_connector() -> Result<()> {
        let dir = tempdir()?;
        let job = RunJob::script(
            ScriptKind::Seed,
            dir.path().join("add-demo-data.sql"),
            ExecutionMode::Transactional,
        )
        .quiet();

        let err = job.load().unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(RunJob::check().quiet().load()?.is_none());
        Ok(())
    }
}
