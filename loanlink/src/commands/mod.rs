// loanlink/src/commands/mod.rs

pub mod apply;
pub mod check;
pub mod run;

use std::path::PathBuf;
use tracing::info;

use loanlink_core::LoanlinkError;
use loanlink_core::application::{RunJob, render_json, render_text, run_loaded};
use loanlink_core::domain::{ScriptKind, VerificationReport};
use loanlink_core::infrastructure::adapters::postgres::{PoolSettings, PostgresConnector};
use loanlink_core::infrastructure::config::{ConnectionSettings, RunnerConfig, load_runner_config};
use loanlink_core::infrastructure::fs::write_json_atomic;

use crate::cli::{Cli, Commands, OutputFormat};

/// What every runner needs once the command line and the config file are read.
pub struct Context {
    pub project_dir: PathBuf,
    pub database_url: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: RunnerConfig,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self, LoanlinkError> {
        let config =
            load_runner_config(&cli.project_dir).map_err(LoanlinkError::Configuration)?;

        Ok(Self {
            project_dir: cli.project_dir.clone(),
            database_url: cli.database_url.clone(),
            format: cli.format,
            output: cli.output.clone(),
            config,
        })
    }

    fn is_text(&self) -> bool {
        self.format == OutputFormat::Text
    }

    fn connector(&self) -> Result<PostgresConnector, LoanlinkError> {
        let settings =
            ConnectionSettings::resolve(self.database_url.as_deref(), &self.config.provider_marker);
        if self.is_text() {
            println!("🔌 Database: {} (TLS: {})", settings.redacted_url(), settings.tls);
        }
        info!(url = %settings.redacted_url(), tls = ?settings.tls, "Connection settings resolved");

        PostgresConnector::new(&settings, PoolSettings::from(&self.config))
            .map_err(LoanlinkError::Connection)
    }

    /// Loads the script, builds the connector, runs the job, then prints or
    /// writes the report. A bad script is reported before the URL is parsed.
    pub async fn execute(&self, job: RunJob) -> Result<(), LoanlinkError> {
        let job = if self.is_text() { job } else { job.quiet() };
        let script = job.load()?;
        let connector = self.connector()?;

        let report = run_loaded(&connector, &job, script).await?;
        self.emit(&report)
    }

    fn emit(&self, report: &VerificationReport) -> Result<(), LoanlinkError> {
        match self.format {
            OutputFormat::Text => print!("\n{}", render_text(report)),
            OutputFormat::Json => println!("{}", render_json(report)?),
        }

        if let Some(path) = &self.output {
            write_json_atomic(path, report).map_err(|e| {
                LoanlinkError::Internal(format!("Cannot write report to {}: {e}", path.display()))
            })?;
            if self.is_text() {
                println!("📝 Report written to {}", path.display());
            }
        }

        if self.is_text() {
            println!("\n✨ SUCCESS! {} finished", report.runner);
        }
        Ok(())
    }
}

pub async fn dispatch(cli: Cli) -> Result<(), LoanlinkError> {
    let ctx = Context::load(&cli)?;

    match cli.command {
        Commands::Check => check::execute(&ctx).await,
        Commands::Setup(args) => apply::execute(&ctx, ScriptKind::Setup, args).await,
        Commands::Migrate(args) => apply::execute(&ctx, ScriptKind::Migrate, args).await,
        Commands::Seed(args) => apply::execute(&ctx, ScriptKind::Seed, args).await,
        Commands::Run {
            path,
            execution_mode,
        } => run::execute(&ctx, path, execution_mode).await,
    }
}
