pub mod connection;
pub mod runner;

pub use connection::{ConnectionSettings, DEFAULT_DATABASE_URL, TlsPolicy};
pub use runner::{RunnerConfig, load_runner_config};
