// loanlink-core/src/domain/battery.rs
//
// The verification battery each runner issues after its script.

use serde::Serialize;
use std::fmt;

use crate::domain::schema::EXPECTED_TABLES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    /// Inspects catalog state only. No script is executed.
    Check,
    Setup,
    Migrate,
    Seed,
    /// An arbitrary script given on the command line.
    Custom,
}

impl ScriptKind {
    /// File name looked up in the scripts directory when `--script` is not given.
    pub fn default_script(&self) -> Option<&'static str> {
        match self {
            ScriptKind::Check | ScriptKind::Custom => None,
            ScriptKind::Setup => Some("schema.sql"),
            ScriptKind::Migrate => Some("migrate-database.sql"),
            ScriptKind::Seed => Some("add-demo-data.sql"),
        }
    }

    pub fn executes_script(&self) -> bool {
        !matches!(self, ScriptKind::Check)
    }

    pub fn battery(&self) -> BatteryPlan {
        let all = || EXPECTED_TABLES.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        let some = |names: &[&str]| names.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        match self {
            ScriptKind::Check => BatteryPlan {
                expected_tables: all(),
                count_tables: CountTables::Present,
                column_tables: some(&["loans"]),
                portfolio: PortfolioMode::WhenPresent,
                missing_tables_fatal: false,
            },
            ScriptKind::Setup | ScriptKind::Custom => BatteryPlan {
                expected_tables: all(),
                count_tables: CountTables::Listed(all()),
                column_tables: vec![],
                portfolio: PortfolioMode::Skip,
                missing_tables_fatal: true,
            },
            ScriptKind::Migrate => BatteryPlan {
                expected_tables: all(),
                count_tables: CountTables::Listed(some(&["companies", "loans"])),
                column_tables: some(&["companies", "loans"]),
                portfolio: PortfolioMode::Skip,
                missing_tables_fatal: true,
            },
            ScriptKind::Seed => BatteryPlan {
                expected_tables: all(),
                count_tables: CountTables::Listed(some(&[
                    "companies",
                    "loans",
                    "repayments",
                    "payments",
                ])),
                column_tables: vec![],
                portfolio: PortfolioMode::Always,
                missing_tables_fatal: true,
            },
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptKind::Check => "check",
            ScriptKind::Setup => "setup",
            ScriptKind::Migrate => "migrate",
            ScriptKind::Seed => "seed",
            ScriptKind::Custom => "run",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountTables {
    /// Count every expected table that turned out to exist.
    Present,
    /// Count exactly these; a missing one fails the count query.
    Listed(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioMode {
    Skip,
    Always,
    /// Only when both `loans` and `payments` exist.
    WhenPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryPlan {
    pub expected_tables: Vec<String>,
    pub count_tables: CountTables,
    pub column_tables: Vec<String>,
    pub portfolio: PortfolioMode,
    pub missing_tables_fatal: bool,
}

impl BatteryPlan {
    /// Tables to count, given which expected tables exist.
    pub fn tables_to_count(&self, present: &[String]) -> Vec<String> {
        match &self.count_tables {
            CountTables::Present => self
                .expected_tables
                .iter()
                .filter(|t| present.contains(t))
                .cloned()
                .collect(),
            CountTables::Listed(tables) => tables.clone(),
        }
    }

    /// Tables to introspect. Missing ones are skipped only when missing tables are tolerated.
    pub fn tables_to_describe(&self, present: &[String]) -> Vec<String> {
        if self.missing_tables_fatal {
            return self.column_tables.clone();
        }
        self.column_tables
            .iter()
            .filter(|t| present.contains(t))
            .cloned()
            .collect()
    }

    pub fn wants_portfolio(&self, present: &[String]) -> bool {
        match self.portfolio {
            PortfolioMode::Skip => false,
            PortfolioMode::Always => true,
            PortfolioMode::WhenPresent => {
                present.iter().any(|t| t == "loans") && present.iter().any(|t| t == "payments")
            }
        }
    }
}
