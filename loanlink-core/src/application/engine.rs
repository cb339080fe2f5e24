// loanlink-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument, warn};

use crate::domain::execution::ExecutionMode;
use crate::error::LoanlinkError;
use crate::infrastructure::script::SqlScript;
use crate::ports::connector::Connector;

/// Runs a loaded script once, with timing. No retry.
#[instrument(skip(connector, script), fields(script = %script.name(), bytes = script.size_bytes()))]
pub async fn execute_script(
    connector: &dyn Connector,
    script: &SqlScript,
    mode: ExecutionMode,
) -> Result<(), LoanlinkError> {
    if mode == ExecutionMode::Autocommit {
        warn!("Autocommit mode: a failure partway leaves earlier statements applied");
    }

    let start = Instant::now();
    debug!("⚡ Executing script");

    let result = connector.execute_script(&script.sql, mode).await;
    let duration = start.elapsed();

    match result {
        Ok(()) => {
            debug!("✅ Script finished in {:.2?}", duration);
            Ok(())
        }
        Err(e) => {
            error!("❌ Script failed after {:.2?}: {}", duration, e);
            Err(LoanlinkError::Execution {
                script: script.name(),
                source: e,
            })
        }
    }
}
