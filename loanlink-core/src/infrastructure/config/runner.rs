// loanlink-core/src/infrastructure/config/runner.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::execution::ExecutionMode;
use crate::infrastructure::config::connection::DEFAULT_PROVIDER_MARKER;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["loanlink.yaml", "loanlink.yml"];

#[derive(Debug, Deserialize, Serialize, Clone, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    #[serde(rename = "scripts-dir", default = "default_scripts_dir")]
    #[validate(length(min = 1, message = "scripts-dir cannot be empty"))]
    pub scripts_dir: String,

    #[serde(rename = "execution-mode", default)]
    pub execution_mode: ExecutionMode,

    #[serde(rename = "provider-marker", default = "default_provider_marker")]
    #[validate(length(min = 1, message = "provider-marker cannot be empty"))]
    pub provider_marker: String,

    #[serde(rename = "max-connections", default = "default_max_connections")]
    #[validate(range(
        min = 2,
        max = 64,
        message = "max-connections must leave room for verification reads (2..=64)"
    ))]
    pub max_connections: u32,

    #[serde(rename = "acquire-timeout-secs", default = "default_acquire_timeout")]
    #[validate(range(min = 1, max = 300))]
    pub acquire_timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            execution_mode: ExecutionMode::default(),
            provider_marker: default_provider_marker(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

impl RunnerConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// `scripts-dir` resolved against the project directory unless absolute.
    pub fn scripts_path(&self, project_dir: &Path) -> PathBuf {
        let dir = Path::new(&self.scripts_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            project_dir.join(dir)
        }
    }

    /// Applies `LOANLINK_*` overrides. `lookup` is `std::env::var` in production.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), InfrastructureError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("LOANLINK_SCRIPTS_DIR") {
            info!(old = ?self.scripts_dir, new = ?val, "Overriding scripts dir via ENV");
            self.scripts_dir = val;
        }
        if let Some(val) = lookup("LOANLINK_EXECUTION_MODE") {
            info!(old = %self.execution_mode, new = ?val, "Overriding execution mode via ENV");
            self.execution_mode = val.parse()?;
        }
        if let Some(val) = lookup("LOANLINK_PROVIDER_MARKER") {
            info!(old = ?self.provider_marker, new = ?val, "Overriding provider marker via ENV");
            self.provider_marker = val;
        }
        Ok(())
    }
}

fn default_scripts_dir() -> String {
    "db".to_string()
}
fn default_provider_marker() -> String {
    DEFAULT_PROVIDER_MARKER.to_string()
}
fn default_max_connections() -> u32 {
    5
}
fn default_acquire_timeout() -> u64 {
    10
}

/// Defaults → `loanlink.yaml` → environment. The file is optional.
#[instrument(skip(project_dir))]
pub fn load_runner_config(project_dir: &Path) -> Result<RunnerConfig, InfrastructureError> {
    let mut config = match find_config(project_dir) {
        Some(path) => {
            info!(path = ?path, "Loading runner configuration");
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                RunnerConfig::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        }
        None => RunnerConfig::default(),
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}
