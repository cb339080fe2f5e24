// loanlink/src/commands/apply.rs
//
// USE CASE: setup / migrate / seed. Each applies one script from the scripts
// directory and then runs its own verification battery.

use std::path::PathBuf;

use loanlink_core::LoanlinkError;
use loanlink_core::application::RunJob;
use loanlink_core::domain::ScriptKind;

use super::Context;
use crate::cli::{OutputFormat, ScriptArgs};

pub async fn execute(
    ctx: &Context,
    kind: ScriptKind,
    args: ScriptArgs,
) -> Result<(), LoanlinkError> {
    let path = script_path(ctx, kind, &args)?;
    let mode = args.execution_mode.unwrap_or(ctx.config.execution_mode);

    if ctx.format == OutputFormat::Text {
        println!("⚙️  Runner: {kind} ({})", path.display());
    }
    ctx.execute(RunJob::script(kind, path, mode)).await
}

/// `--script` wins over the runner's default file name; `--scripts-dir` wins
/// over `scripts-dir` from the config.
fn script_path(
    ctx: &Context,
    kind: ScriptKind,
    args: &ScriptArgs,
) -> Result<PathBuf, LoanlinkError> {
    let name = args
        .script
        .as_deref()
        .or(kind.default_script())
        .ok_or_else(|| {
            LoanlinkError::Internal(format!("runner '{kind}' has no default script"))
        })?;

    let mut config = ctx.config.clone();
    if let Some(dir) = &args.scripts_dir {
        config.scripts_dir = dir.clone();
    }
    Ok(config.scripts_path(&ctx.project_dir).join(name))
}
