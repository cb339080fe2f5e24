// loanlink/src/commands/check.rs
//
// USE CASE: Inspect the current schema without changing anything.

use loanlink_core::LoanlinkError;
use loanlink_core::application::RunJob;

use super::Context;
use crate::cli::OutputFormat;

pub async fn execute(ctx: &Context) -> Result<(), LoanlinkError> {
    if ctx.format == OutputFormat::Text {
        println!("🔍 Checking database schema...");
    }
    ctx.execute(RunJob::check()).await
}
