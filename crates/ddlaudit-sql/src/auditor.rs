//! Schema auditor: extract once, then run every enabled check

use ddlaudit_core::{Category, CheckResult, Config, InventoryCounts, Report, SourceInfo};

use crate::checks;
use crate::inventory::Inventory;

/// Audits one DDL document.
///
/// The inventory is built in [`SchemaAuditor::new`]; nothing is mutated
/// afterwards, so auditing the same input twice yields the same findings.
#[derive(Debug, Clone)]
pub struct SchemaAuditor<'a> {
    content: &'a str,
    lines: Vec<&'a str>,
    source: String,
    inventory: Inventory,
}

impl<'a> SchemaAuditor<'a> {
    /// Parse `content`, naming it `source` in locations
    pub fn new(source: impl Into<String>, content: &'a str) -> Self {
        Self {
            content,
            lines: content.lines().collect(),
            source: source.into(),
            inventory: Inventory::extract(content),
        }
    }

    /// What the scanner recognized
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Run one category regardless of configuration
    pub fn run_check(&self, category: Category, config: &Config) -> CheckResult {
        let diagnostics = match category {
            Category::PrimaryKey => checks::check_primary_keys(&self.lines, &self.source),
            Category::DataType => checks::check_data_types(&self.lines, &self.source),
            Category::FkIndex => {
                checks::check_fk_indexes(&self.inventory, &config.allowlist, &self.source)
            }
            Category::Naming => checks::check_naming(&self.lines, &self.source),
        };

        CheckResult::checked(category, diagnostics)
    }

    /// Run every category in report order, skipping disabled ones
    pub fn audit(&self, config: &Config) -> Vec<CheckResult> {
        Category::ALL
            .iter()
            .map(|&category| {
                if config.checks.is_enabled(category) {
                    self.run_check(category, config)
                } else {
                    tracing::debug!(%category, "check disabled by configuration");
                    CheckResult::skipped(category)
                }
            })
            .collect()
    }

    /// Audit and wrap the results in a versioned report
    pub fn report(&self, config: &Config) -> Report {
        let counts = InventoryCounts {
            tables: self.inventory.tables.len(),
            indexes: self.inventory.indexes.len(),
            foreign_keys: self.inventory.foreign_keys.len(),
        };

        Report::from_checks(
            SourceInfo::from_content(self.source.clone(), self.content),
            counts,
            self.audit(config),
        )
    }
}
