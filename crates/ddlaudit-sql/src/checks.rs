//! The four rule categories
//!
//! Each check is a read-only pass over the document lines or the extracted
//! inventory. None of them depends on another's output, so they can run in
//! any order.

use ddlaudit_core::{AllowlistRules, Diagnostic, DiagnosticCode, Location};
use regex::Regex;
use std::sync::LazyLock;

use crate::inventory::Inventory;

static SERIAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bserial\b").expect("valid regex"));
static UUID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\buuid\b").expect("valid regex"));
static DEFAULT_GEN_UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)default\s+gen_random_uuid\(\)").expect("valid regex")
});

static VARCHAR_N_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)varchar\s*\(").expect("valid regex"));
static CHAR_N_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bchar\s*\(").expect("valid regex"));
static TIMESTAMP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btimestamp\b").expect("valid regex"));
static TIMESTAMPTZ_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btimestamptz\b").expect("valid regex"));

static CREATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcreate\b").expect("valid regex"));
static QUOTED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("valid regex"));

fn at_line(diagnostic: Diagnostic, source: &str, line: usize) -> Diagnostic {
    diagnostic.with_location(Location::with_line(source, line))
}

/// Legacy `serial` keys, and UUID keys without a time-ordered generator.
///
/// A `default gen_random_uuid()` suppresses the UUID warning as well, even
/// though that function produces random (v4) values.
// TODO: decide with the rule owner whether gen_random_uuid() should keep
// suppressing PK_UUID_NOT_TIME_ORDERED.
pub fn check_primary_keys(lines: &[&str], source: &str) -> Vec<Diagnostic> {
    let mut issues = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;
        let lower = line.to_lowercase();

        if SERIAL_REGEX.is_match(line) {
            issues.push(at_line(
                Diagnostic::new(
                    DiagnosticCode::PkSerial,
                    format!(
                        "Line {n}: Usage of 'serial' detected. Prefer 'generated always as identity' (SQL Standard)."
                    ),
                ),
                source,
                n,
            ));
        }

        if UUID_REGEX.is_match(line)
            && lower.contains("primary key")
            && !DEFAULT_GEN_UUID_REGEX.is_match(line)
            && !lower.contains("uuid_generate_v7")
        {
            issues.push(at_line(
                Diagnostic::new(
                    DiagnosticCode::PkUuidNotTimeOrdered,
                    format!(
                        "Line {n}: UUID Primary Key detected without v7 function. Ensure you are using v7 or aware of fragmentation with v4."
                    ),
                ),
                source,
                n,
            ));
        }
    }

    tracing::debug!(issues = issues.len(), "primary key check");
    issues
}

/// `varchar(n)`, `char(n)` and timezone-naive `timestamp`; one line can
/// trigger all three.
pub fn check_data_types(lines: &[&str], source: &str) -> Vec<Diagnostic> {
    let mut issues = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;

        if VARCHAR_N_REGEX.is_match(line) {
            issues.push(at_line(
                Diagnostic::new(
                    DiagnosticCode::TypeVarcharLength,
                    format!(
                        "Line {n}: 'varchar(n)' detected. Prefer 'text' in Postgres (no performance diff, no arbitrary limits)."
                    ),
                ),
                source,
                n,
            ));
        }

        if CHAR_N_REGEX.is_match(line) {
            issues.push(at_line(
                Diagnostic::new(
                    DiagnosticCode::TypeCharLength,
                    format!("Line {n}: 'char(n)' detected. This pads with spaces. Prefer 'text'."),
                ),
                source,
                n,
            ));
        }

        if TIMESTAMP_REGEX.is_match(line)
            && !TIMESTAMPTZ_REGEX.is_match(line)
            && !line.to_lowercase().contains("with time zone")
        {
            issues.push(at_line(
                Diagnostic::new(
                    DiagnosticCode::TypeTimestampWithoutTz,
                    format!(
                        "Line {n}: 'timestamp' (no tz) detected. Almost always prefer 'timestamptz' to store UTC point-in-time."
                    ),
                ),
                source,
                n,
            ));
        }
    }

    tracing::debug!(issues = issues.len(), "data type check");
    issues
}

/// Foreign keys whose column is not the leading column of an index on the
/// same table. Names are compared with double quotes stripped. Only the
/// leftmost index column counts: a B-tree on `(a, b)` does not serve `b`.
pub fn check_fk_indexes(
    inventory: &Inventory,
    allowlist: &AllowlistRules,
    source: &str,
) -> Vec<Diagnostic> {
    let mut issues = Vec::new();

    for fk in &inventory.foreign_keys {
        if allowlist.is_fk_table_skipped(&fk.table) {
            tracing::debug!(table = %fk.table, column = %fk.column, "foreign key allowlisted");
            continue;
        }

        let fk_table = unquote(&fk.table);
        let fk_column = unquote(&fk.column);

        let is_indexed = inventory.indexes.iter().any(|idx| {
            unquote(&idx.table) == fk_table
                && idx.leading_column().map(unquote).as_deref() == Some(fk_column.as_str())
        });

        if !is_indexed {
            issues.push(at_line(
                Diagnostic::new(
                    DiagnosticCode::FkUnindexed,
                    format!(
                        "Table '{}', Column '{}': Foreign Key appears unindexed. This will cause slow JOINs and cascading deletes.",
                        fk.table, fk.column
                    ),
                )
                .with_subject(&fk.table, &fk.column),
                source,
                fk.line,
            ));
        }
    }

    tracing::debug!(issues = issues.len(), "foreign key index check");
    issues
}

fn unquote(name: &str) -> String {
    name.replace('"', "")
}

/// Quoted identifiers mixing cases on a `create` line.
pub fn check_naming(lines: &[&str], source: &str) -> Vec<Diagnostic> {
    let mut issues = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;

        if CREATE_REGEX.is_match(line) && has_mixed_case_identifier(line) {
            issues.push(at_line(
                Diagnostic::new(
                    DiagnosticCode::NamingMixedCase,
                    format!(
                        "Line {n}: Mixed-case quoted identifier detected. Prefer lowercase snake_case to avoid double-quoting hell."
                    ),
                ),
                source,
                n,
            ));
        }
    }

    tracing::debug!(issues = issues.len(), "naming check");
    issues
}

fn has_mixed_case_identifier(line: &str) -> bool {
    QUOTED_REGEX.captures_iter(line).any(|caps| {
        let ident = &caps[1];
        ident.chars().any(|c| c.is_ascii_lowercase())
            && ident.chars().any(|c| c.is_ascii_uppercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codes(issues: &[Diagnostic]) -> Vec<DiagnosticCode> {
        issues.iter().map(|d| d.code).collect()
    }

    fn lines(sql: &str) -> Vec<&str> {
        sql.lines().collect()
    }

    #[test]
    fn serial_is_whole_word_and_case_insensitive() {
        let sql = "id SERIAL primary key,\nn bigserial,\nserial_no int,\nx Serial";
        let issues = check_primary_keys(&lines(sql), "t.sql");

        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.starts_with("Line 1: Usage of 'serial'"));
        assert!(issues[1].message.starts_with("Line 4: "));
        assert_eq!(issues[1].location, Some(Location::with_line("t.sql", 4)));
    }

    #[test]
    fn uuid_primary_key_without_generator() {
        let sql = "\
id uuid primary key,
id uuid primary key default uuid_generate_v7(),
id uuid primary key default gen_random_uuid(),
ref uuid not null";
        let issues = check_primary_keys(&lines(sql), "t.sql");

        assert_eq!(codes(&issues), vec![DiagnosticCode::PkUuidNotTimeOrdered]);
        assert!(issues[0].message.starts_with("Line 1: UUID Primary Key"));
    }

    #[test]
    fn one_line_can_trigger_several_type_issues() {
        let sql = "email varchar(255), code char(2), created timestamp";
        let issues = check_data_types(&lines(sql), "t.sql");

        assert_eq!(
            codes(&issues),
            vec![
                DiagnosticCode::TypeVarcharLength,
                DiagnosticCode::TypeCharLength,
                DiagnosticCode::TypeTimestampWithoutTz,
            ]
        );
    }

    #[test]
    fn timestamp_with_zone_is_fine() {
        let sql = "\
a timestamptz,
b timestamp with time zone,
c timestamp without time zone,
d TIMESTAMP(3)";
        let issues = check_data_types(&lines(sql), "t.sql");

        let messages: Vec<_> = issues.iter().map(|d| &d.message[..7]).collect();
        assert_eq!(messages, vec!["Line 3:", "Line 4:"]);
    }

    #[test]
    fn varchar_does_not_count_as_char() {
        let issues = check_data_types(&lines("name varchar (40)"), "t.sql");
        assert_eq!(codes(&issues), vec![DiagnosticCode::TypeVarcharLength]);
    }

    #[test]
    fn mixed_case_requires_create() {
        let sql = "CREATE TABLE \"userAccounts\" (\n  \"firstName\" text\n);\ncreate index idx on \"lower_case\" (x);";
        let issues = check_naming(&lines(sql), "t.sql");

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.starts_with("Line 1: Mixed-case"));
    }

    #[test]
    fn capitalized_identifier_is_mixed_case() {
        assert!(has_mixed_case_identifier("create table \"Users\" ("));
        assert!(!has_mixed_case_identifier("create table \"USERS\" ("));
        assert!(!has_mixed_case_identifier("create table \"users\" (\"id\" Integer, \"x\" int)"));
    }
}
