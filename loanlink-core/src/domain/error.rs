// loanlink-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, PartialEq)]
pub enum DomainError {
    #[error("Invalid amount '{0}' returned by the database")]
    #[diagnostic(
        code(loanlink::domain::amount),
        help("Aggregates are expected to be numeric text, e.g. '1250000.00'.")
    )]
    InvalidAmount(String),

    #[error("'{0}' is not a plain SQL identifier")]
    #[diagnostic(code(loanlink::domain::identifier))]
    InvalidIdentifier(String),

    #[error("Unknown execution mode '{0}' (expected 'transactional' or 'autocommit')")]
    #[diagnostic(code(loanlink::domain::execution_mode))]
    UnknownExecutionMode(String),
}
