//! ddlaudit Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the report format.

pub mod diagnostic;
pub mod report;
pub mod config;

pub use diagnostic::{Category, Diagnostic, DiagnosticCode, Location, Severity};
pub use report::{CheckResult, InventoryCounts, Report, ReportSummary, ReportVersion, SourceInfo};
pub use config::{AllowlistRules, CheckToggles, Config, ConfigError};
