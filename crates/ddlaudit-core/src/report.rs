//! Report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use crate::diagnostic::{Category, Diagnostic, Severity};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The audited input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// File path, or `<stdin>`
    pub name: String,

    /// Hex SHA-256 of the raw input
    pub sha256: String,

    /// Number of lines in the input
    pub lines: usize,
}

impl SourceInfo {
    /// Fingerprint `content` read from `name`
    pub fn from_content(name: impl Into<String>, content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes());

        Self {
            name: name.into(),
            sha256: hex::encode(digest),
            lines: content.lines().count(),
        }
    }
}

/// Sizes of the extracted inventory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCounts {
    pub tables: usize,
    pub indexes: usize,
    pub foreign_keys: usize,
}

/// Outcome of one rule category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Rule category
    pub category: Category,

    /// True when the category was disabled by configuration
    #[serde(default)]
    pub skipped: bool,

    /// Findings in source order
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    /// A category that ran and produced `diagnostics`
    pub fn checked(category: Category, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            category,
            skipped: false,
            diagnostics,
        }
    }

    /// A category disabled by configuration
    pub fn skipped(category: Category) -> Self {
        Self {
            category,
            skipped: true,
            diagnostics: Vec::new(),
        }
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of diagnostics
    pub total: usize,

    /// Number of warnings
    pub warnings: usize,

    /// Diagnostics per category
    pub primary_keys: usize,
    pub data_types: usize,
    pub fk_indexes: usize,
    pub naming: usize,

    /// What the scanner recognized
    pub inventory: InventoryCounts,
}

impl ReportSummary {
    fn count(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Warn => self.warnings += 1,
        }

        match diagnostic.category {
            Category::PrimaryKey => self.primary_keys += 1,
            Category::DataType => self.data_types += 1,
            Category::FkIndex => self.fk_indexes += 1,
            Category::Naming => self.naming += 1,
        }

        self.total += 1;
    }
}

/// Audit report (report.json v1)
///
/// This is the stable output format.
/// All fields are versioned and backward-compatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Audited input
    pub source: SourceInfo,

    /// Summary statistics
    pub summary: ReportSummary,

    /// One entry per category, in report order
    pub checks: Vec<CheckResult>,
}

impl Report {
    /// Create a report from per-category results
    pub fn from_checks(
        source: SourceInfo,
        inventory: InventoryCounts,
        checks: Vec<CheckResult>,
    ) -> Self {
        let mut summary = ReportSummary {
            inventory,
            ..ReportSummary::default()
        };

        for diagnostic in checks.iter().flat_map(|c| &c.diagnostics) {
            summary.count(diagnostic);
        }

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source,
            summary,
            checks,
        }
    }

    /// All diagnostics in report order
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.checks.iter().flat_map(|c| c.diagnostics.iter())
    }

    /// Result for one category, if present
    pub fn check(&self, category: Category) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.category == category)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use pretty_assertions::assert_eq;

    fn sample_checks() -> Vec<CheckResult> {
        vec![
            CheckResult::checked(
                Category::PrimaryKey,
                vec![Diagnostic::new(DiagnosticCode::PkSerial, "serial")],
            ),
            CheckResult::checked(
                Category::DataType,
                vec![
                    Diagnostic::new(DiagnosticCode::TypeVarcharLength, "varchar"),
                    Diagnostic::new(DiagnosticCode::TypeTimestampWithoutTz, "timestamp"),
                ],
            ),
            CheckResult::checked(Category::FkIndex, Vec::new()),
            CheckResult::skipped(Category::Naming),
        ]
    }

    #[test]
    fn empty_report() {
        let source = SourceInfo::from_content("empty.sql", "");
        let report = Report::from_checks(source, InventoryCounts::default(), Vec::new());
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.diagnostics().count(), 0);
    }

    #[test]
    fn summary_counts_per_category() {
        let source = SourceInfo::from_content("schema.sql", "create table t (id serial);\n");
        let counts = InventoryCounts { tables: 1, indexes: 0, foreign_keys: 0 };
        let report = Report::from_checks(source, counts, sample_checks());

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.warnings, 3);
        assert_eq!(report.summary.primary_keys, 1);
        assert_eq!(report.summary.data_types, 2);
        assert_eq!(report.summary.fk_indexes, 0);
        assert_eq!(report.summary.inventory.tables, 1);
        assert!(report.check(Category::Naming).unwrap().skipped);
    }

    #[test]
    fn diagnostics_follow_category_order() {
        let source = SourceInfo::from_content("schema.sql", "");
        let report = Report::from_checks(source, InventoryCounts::default(), sample_checks());
        let codes: Vec<_> = report.diagnostics().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::PkSerial,
                DiagnosticCode::TypeVarcharLength,
                DiagnosticCode::TypeTimestampWithoutTz,
            ]
        );
    }

    #[test]
    fn source_fingerprint() {
        let source = SourceInfo::from_content("<stdin>", "abc");
        assert_eq!(
            source.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(source.lines, 1);
    }

    #[test]
    fn report_serialization() {
        let source = SourceInfo::from_content("schema.sql", "");
        let report = Report::from_checks(source, InventoryCounts::default(), sample_checks());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"checks\""));
        assert!(json.contains("\"sha256\""));
        assert!(json.contains("PK_SERIAL"));
    }
}
