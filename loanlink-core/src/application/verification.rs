// loanlink-core/src/application/verification.rs

use futures::future::try_join_all;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::domain::battery::BatteryPlan;
use crate::domain::portfolio::LoanPortfolioSummary;
use crate::domain::report::VerificationReport;
use crate::domain::schema::{RowCountDelta, TableColumnDescriptor};
use crate::error::VerificationError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::connector::Connector;

const PRINCIPAL: (&str, &str) = ("loans", "principal");
const REPAID: (&str, &str) = ("payments", "amount");

/// Row counts taken before the script ran. Tables that did not exist yet are recorded as 0.
pub type Baseline = HashMap<String, i64>;

fn query_failed(what: impl Into<String>) -> impl FnOnce(InfrastructureError) -> VerificationError {
    let what = what.into();
    move |source| VerificationError::Query { what, source }
}

#[instrument(skip_all)]
pub async fn capture_baseline(
    connector: &dyn Connector,
    plan: &BatteryPlan,
) -> Result<Baseline, VerificationError> {
    let candidates = plan.tables_to_count(&plan.expected_tables);
    let existing = connector
        .existing_tables(&candidates)
        .await
        .map_err(query_failed("baseline table lookup"))?;

    let counts = try_join_all(existing.iter().map(|t| count_table(connector, t))).await?;

    let mut baseline: Baseline = candidates.into_iter().map(|t| (t, 0)).collect();
    baseline.extend(counts);
    debug!(?baseline, "Baseline captured");
    Ok(baseline)
}

/// Runs the battery described by `plan` and fills `report`.
///
/// The existence check runs first because the check runner derives its
/// counts from it. Counts, column introspection and portfolio sums are then
/// issued together and joined.
#[instrument(skip_all, fields(runner = %report.runner))]
pub async fn run_battery(
    connector: &dyn Connector,
    plan: &BatteryPlan,
    baseline: Option<&Baseline>,
    mut report: VerificationReport,
) -> Result<VerificationReport, VerificationError> {
    let present = connector
        .existing_tables(&plan.expected_tables)
        .await
        .map_err(query_failed("table existence"))?;
    let missing: Vec<String> = plan
        .expected_tables
        .iter()
        .filter(|t| !present.contains(t))
        .cloned()
        .collect();

    let count_tables = plan.tables_to_count(&present);
    let describe_tables = plan.tables_to_describe(&present);
    let wants_portfolio = plan.wants_portfolio(&present);

    let counts = try_join_all(count_tables.iter().map(|t| count_table(connector, t)));
    let columns = try_join_all(describe_tables.iter().map(|t| describe_table(connector, t)));
    let portfolio = async {
        if wants_portfolio {
            portfolio_summary(connector).await.map(Some)
        } else {
            Ok(None)
        }
    };

    let (counts, columns, portfolio) = futures::try_join!(counts, columns, portfolio)?;

    if plan.missing_tables_fatal && !missing.is_empty() {
        return Err(VerificationError::MissingTables(missing));
    }

    report.counts = counts
        .into_iter()
        .map(|(table, after)| RowCountDelta {
            before: baseline.map(|b| b.get(&table).copied().unwrap_or(0)),
            table,
            after,
        })
        .collect();
    report.columns = columns.into_iter().collect();
    report.portfolio = portfolio;
    report.tables_present = present;
    report.missing_tables = missing;

    Ok(report)
}

async fn count_table(
    connector: &dyn Connector,
    table: &str,
) -> Result<(String, i64), VerificationError> {
    let rows = connector
        .count_rows(table)
        .await
        .map_err(query_failed(format!("row count of '{table}'")))?;
    Ok((table.to_string(), rows))
}

async fn describe_table(
    connector: &dyn Connector,
    table: &str,
) -> Result<(String, Vec<TableColumnDescriptor>), VerificationError> {
    let columns = connector
        .fetch_columns(table)
        .await
        .map_err(query_failed(format!("columns of '{table}'")))?;
    Ok((table.to_string(), columns))
}

async fn portfolio_summary(
    connector: &dyn Connector,
) -> Result<LoanPortfolioSummary, VerificationError> {
    let (principal, repaid) = futures::try_join!(
        async {
            connector
                .sum_as_text(PRINCIPAL.0, PRINCIPAL.1)
                .await
                .map_err(query_failed("total principal"))
        },
        async {
            connector
                .sum_as_text(REPAID.0, REPAID.1)
                .await
                .map_err(query_failed("total repaid"))
        },
    )?;

    Ok(LoanPortfolioSummary::from_text(&principal, &repaid)?)
}
