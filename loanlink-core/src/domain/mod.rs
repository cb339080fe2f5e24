pub mod amount;
pub mod battery;
pub mod error;
pub mod execution;
pub mod portfolio;
pub mod report;
pub mod schema;

pub use battery::{BatteryPlan, CountTables, PortfolioMode, ScriptKind};
pub use error::DomainError;
pub use execution::ExecutionMode;
pub use portfolio::LoanPortfolioSummary;
pub use report::VerificationReport;
pub use schema::{RowCountDelta, TableColumnDescriptor};
