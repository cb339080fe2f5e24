// loanlink-core/src/application/report.rs
//
// Human-readable and JSON renderings of a VerificationReport.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use std::fmt::Write;

use crate::domain::amount::format_amount;
use crate::domain::report::VerificationReport;
use crate::error::LoanlinkError;
use crate::infrastructure::error::InfrastructureError;

pub fn render_text(report: &VerificationReport) -> String {
    let mut out = String::new();
    let expected = report.tables_present.len() + report.missing_tables.len();

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "📋 Expected tables: {}/{} present",
        report.tables_present.len(),
        expected
    );
    for table in &report.tables_present {
        let _ = writeln!(out, "   ✅ {table}");
    }
    for table in &report.missing_tables {
        let _ = writeln!(out, "   ❌ {table} (missing)");
    }

    if let Some(script) = &report.script {
        let statements = report
            .statements
            .map(|n| format!("{n} statements"))
            .unwrap_or_else(|| "statement count unknown".to_string());
        let mode = report
            .execution_mode
            .map(|m| m.to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "\n📄 Applied {script} ({statements}, {mode})");
    }

    if !report.counts.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Table", "Before", "After", "Added"]);
        for count in &report.counts {
            let or_dash = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
            table.add_row(vec![
                Cell::new(&count.table),
                Cell::new(or_dash(count.before)).set_alignment(CellAlignment::Right),
                Cell::new(count.after).set_alignment(CellAlignment::Right),
                Cell::new(or_dash(count.added())).set_alignment(CellAlignment::Right),
            ]);
        }
        let _ = writeln!(out, "\n📊 Row counts\n{table}");
    }

    for (name, columns) in &report.columns {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Column", "Type", "Nullable"]);
        for col in columns {
            table.add_row(vec![
                col.column_name.as_str(),
                col.data_type.as_str(),
                if col.is_nullable { "yes" } else { "no" },
            ]);
        }
        let _ = writeln!(out, "\n🧱 Columns of '{name}'\n{table}");
    }

    if let Some(portfolio) = &report.portfolio {
        let _ = writeln!(out, "\n💰 Loan portfolio");
        let _ = writeln!(
            out,
            "   Total principal : {}",
            format_amount(portfolio.total_principal)
        );
        let _ = writeln!(
            out,
            "   Total repaid    : {}",
            format_amount(portfolio.total_repaid)
        );
        let _ = writeln!(
            out,
            "   Outstanding     : {}",
            format_amount(portfolio.outstanding)
        );
    }

    out
}

pub fn render_json(report: &VerificationReport) -> Result<String, LoanlinkError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| LoanlinkError::Internal(InfrastructureError::JsonError(e).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::battery::ScriptKind;
    use crate::domain::execution::ExecutionMode;
    use crate::domain::portfolio::LoanPortfolioSummary;
    use crate::domain::schema::{RowCountDelta, TableColumnDescriptor};
    use anyhow::Result;

    fn seeded_report() -> VerificationReport {
        let mut report = VerificationReport::new(ScriptKind::Seed);
        report.script = Some("add-demo-data.sql".into());
        report.statements = Some(12);
        report.execution_mode = Some(ExecutionMode::Transactional);
        report.tables_present = vec!["companies".into(), "loans".into()];
        report.missing_tables = vec!["users".into()];
        report.counts = vec![RowCountDelta {
            table: "loans".into(),
            before: Some(2),
            after: 9,
        }];
        report.columns.insert(
            "loans".into(),
            vec![TableColumnDescriptor {
                column_name: "principal".into(),
                data_type: "numeric".into(),
                is_nullable: false,
            }],
        );
        report.portfolio = Some(LoanPortfolioSummary::from_totals(1_250_000.0, 310_500.25));
        report
    }

    #[test]
    fn test_text_report_sections() {
        let text = render_text(&seeded_report());

        assert!(text.contains("Expected tables: 2/3 present"));
        assert!(text.contains("❌ users (missing)"));
        assert!(text.contains("Applied add-demo-data.sql (12 statements, transactional)"));
        assert!(text.contains("Row counts"));
        assert!(text.contains("Columns of 'loans'"));
        assert!(text.contains("principal"));
        assert!(text.contains("Total principal : 1,250,000"));
        assert!(text.contains("Total repaid    : 310,500.25"));
        assert!(text.contains("Outstanding     : 939,499.75"));
    }

    #[test]
    fn test_check_report_has_no_script_line() {
        let report = VerificationReport::new(ScriptKind::Check);
        let text = render_text(&report);
        assert!(!text.contains("Applied"));
        assert!(!text.contains("Loan portfolio"));
    }

    #[test]
    fn test_json_report_parses_back() -> Result<()> {
        let json = render_json(&seeded_report())?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["counts"][0]["after"], 9);
        assert_eq!(value["columns"]["loans"][0]["data_type"], "numeric");
        Ok(())
    }
}
