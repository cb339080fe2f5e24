// loanlink-core/src/application/mod.rs

pub mod engine;
pub mod report;
pub mod runner;
pub mod verification;

#[cfg(test)]
pub(crate) mod mock;

pub use engine::execute_script;
pub use report::{render_json, render_text};
pub use runner::{RunJob, run_job, run_loaded};
pub use verification::{Baseline, capture_baseline, run_battery};
