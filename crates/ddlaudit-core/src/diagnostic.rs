//! Diagnostic codes and findings
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the report format.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Rule category a finding belongs to.
///
/// The declaration order is the order sections are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Legacy auto-increment keys and random UUID keys
    PrimaryKey,

    /// Length-bounded strings and timezone-naive timestamps
    DataType,

    /// Foreign keys without a leading-column index
    FkIndex,

    /// Mixed-case quoted identifiers
    Naming,
}

impl Category {
    /// Every category, in report order
    pub const ALL: [Category; 4] = [
        Category::PrimaryKey,
        Category::DataType,
        Category::FkIndex,
        Category::Naming,
    ];

    /// Section heading used by the human-readable report
    pub fn title(&self) -> &'static str {
        match self {
            Self::PrimaryKey => "Primary Keys",
            Self::DataType => "Data Types",
            Self::FkIndex => "Indexes on Foreign Keys",
            Self::Naming => "Naming Conventions",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrimaryKey => write!(f, "primary-key"),
            Self::DataType => write!(f, "data-type"),
            Self::FkIndex => write!(f, "fk-index"),
            Self::Naming => write!(f, "naming"),
        }
    }
}

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Primary keys
    /// `serial` / auto-increment column instead of an identity column
    PkSerial,

    /// UUID primary key with no time-ordered generator in sight
    PkUuidNotTimeOrdered,

    // Data types
    /// `varchar(n)` instead of `text`
    TypeVarcharLength,

    /// `char(n)` instead of `text`
    TypeCharLength,

    /// `timestamp` without a time zone
    TypeTimestampWithoutTz,

    // Foreign keys
    /// Foreign key column is not the leading column of any index
    FkUnindexed,

    // Naming
    /// Quoted identifier mixing upper and lower case
    NamingMixedCase,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PkSerial => "PK_SERIAL",
            Self::PkUuidNotTimeOrdered => "PK_UUID_NOT_TIME_ORDERED",
            Self::TypeVarcharLength => "TYPE_VARCHAR_LENGTH",
            Self::TypeCharLength => "TYPE_CHAR_LENGTH",
            Self::TypeTimestampWithoutTz => "TYPE_TIMESTAMP_WITHOUT_TZ",
            Self::FkUnindexed => "FK_UNINDEXED",
            Self::NamingMixedCase => "NAMING_MIXED_CASE",
        }
    }

    /// Category this code is reported under
    pub fn category(&self) -> Category {
        match self {
            Self::PkSerial | Self::PkUuidNotTimeOrdered => Category::PrimaryKey,
            Self::TypeVarcharLength | Self::TypeCharLength | Self::TypeTimestampWithoutTz => {
                Category::DataType
            }
            Self::FkUnindexed => Category::FkIndex,
            Self::NamingMixedCase => Category::Naming,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
///
/// The auditor is advisory: every finding is a warning and nothing it
/// reports should fail a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - should be reviewed but not blocking
    Warn,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
        }
    }
}

/// Source location of a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Input name (file path, or `<stdin>`)
    pub file: String,

    /// Optional line number (1-indexed)
    pub line: Option<usize>,
}

impl Location {
    /// Create a new location with just a file path
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }

    /// Create a location with file and line number
    pub fn with_line(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

/// A single finding with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Category the code belongs to
    pub category: Category,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location (best-effort)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Table the finding is about, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Column the finding is about, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Diagnostic {
    /// Create a new warning for `code`
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            category: code.category(),
            severity: Severity::Warn,
            message: message.into(),
            location: None,
            table: None,
            column: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the table/column the finding refers to
    pub fn with_subject(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self.column = Some(column.into());
        self
    }
}
