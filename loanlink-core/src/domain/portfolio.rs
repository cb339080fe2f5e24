// loanlink-core/src/domain/portfolio.rs

use serde::Serialize;

use crate::domain::amount::parse_amount;
use crate::domain::error::DomainError;

/// Derived on every report, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanPortfolioSummary {
    pub total_principal: f64,
    pub total_repaid: f64,
    pub outstanding: f64,
}

impl LoanPortfolioSummary {
    pub fn from_totals(total_principal: f64, total_repaid: f64) -> Self {
        Self {
            total_principal,
            total_repaid,
            outstanding: total_principal - total_repaid,
        }
    }

    /// Builds the summary from the textual `SUM(...)` results of
    /// `loans.principal` and `payments.amount`.
    pub fn from_text(principal: &str, repaid: &str) -> Result<Self, DomainError> {
        Ok(Self::from_totals(
            parse_amount(principal)?,
            parse_amount(repaid)?,
        ))
    }
}
