// loanlink/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use loanlink_core::domain::ExecutionMode;

#[derive(Parser)]
#[command(name = "loanlink")]
#[command(about = "Bootstraps and verifies the LoanLink PostgreSQL database", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory (holds loanlink.yaml and the scripts folder)
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Output format: text | json
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔍 Inspects the schema: expected tables, row counts, loan columns
    Check,

    /// 🏗️  Applies the base schema (schema.sql) and checks every table exists
    Setup(ScriptArgs),

    /// 🔧 Applies migrate-database.sql and shows the migrated columns
    Migrate(ScriptArgs),

    /// 🌱 Loads demo data (add-demo-data.sql) and reports rows added
    Seed(ScriptArgs),

    /// ⚡ Applies an arbitrary SQL file
    Run {
        /// Path to the SQL file
        path: PathBuf,

        /// transactional | autocommit
        #[arg(long)]
        execution_mode: Option<ExecutionMode>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ScriptArgs {
    /// Script file name inside the scripts directory
    #[arg(long)]
    pub script: Option<String>,

    /// Scripts directory relative to the project (default: "db")
    #[arg(long)]
    pub scripts_dir: Option<String>,

    /// transactional | autocommit
    #[arg(long)]
    pub execution_mode: Option<ExecutionMode>,
}
