// loanlink/src/commands/run.rs
//
// USE CASE: Apply an arbitrary SQL file, resolved against the working directory.

use std::path::PathBuf;

use loanlink_core::LoanlinkError;
use loanlink_core::application::RunJob;
use loanlink_core::domain::{ExecutionMode, ScriptKind};

use super::Context;
use crate::cli::OutputFormat;

pub async fn execute(
    ctx: &Context,
    path: PathBuf,
    execution_mode: Option<ExecutionMode>,
) -> Result<(), LoanlinkError> {
    let mode = execution_mode.unwrap_or(ctx.config.execution_mode);

    if ctx.format == OutputFormat::Text {
        println!("⚡ Applying {}", path.display());
    }
    ctx.execute(RunJob::script(ScriptKind::Custom, path, mode)).await
}
