//! Shallow DDL inventory
//!
//! Tables, indexes and inline foreign keys are recognized with regular
//! expressions over the raw text. This is a best-effort heuristic, not a SQL
//! grammar: unusual formatting (several tables on one line, nested
//! parentheses, dialect-specific syntax) can be missed or miscategorized, and
//! anything unrecognized is skipped silently.

use regex::Regex;
use std::sync::LazyLock;

static TABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)create\s+table\s+(?:if\s+not\s+exists\s+)?([a-zA-Z0-9_"\.]+)"#)
        .expect("valid regex")
});

static TABLE_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^create\s+table\b").expect("valid regex"));

static INDEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)create\s+(?:unique\s+)?index\s+(?:concurrently\s+)?(?:if\s+not\s+exists\s+)?"#,
        r#"([a-zA-Z0-9_"]+)\s+on\s+(?:only\s+)?([a-zA-Z0-9_"\.]+)\s*"#,
        r#"(?:using\s+\w+\s*)?\(([^)]+)\)"#,
    ))
    .expect("valid regex")
});

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static REFERENCES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\breferences\s+([a-zA-Z0-9_"\.]+)"#).expect("valid regex")
});

static FOREIGN_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bforeign\s+key\s*\(\s*([a-zA-Z0-9_"]+)"#).expect("valid regex")
});

static COLUMN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*([a-zA-Z0-9_"]+)\s"#).expect("valid regex"));

/// A `CREATE TABLE` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Name as written (may be schema-qualified and/or quoted)
    pub name: String,

    /// Line of the statement (1-indexed)
    pub line: usize,
}

/// A `CREATE INDEX` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,

    /// Table the index is built on, as written
    pub table: String,

    /// Indexed columns in declaration order, ordering modifiers dropped
    pub columns: Vec<String>,
}

impl Index {
    /// Leftmost column, the only one usable for a prefix lookup
    pub fn leading_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }
}

/// An inline `REFERENCES` clause found inside a table body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyReference {
    /// Table whose body contains the reference
    pub table: String,

    /// Referencing column
    pub column: String,

    /// Referenced table
    pub ref_table: String,

    /// Line of the reference (1-indexed)
    pub line: usize,
}

/// Everything recognized in one DDL document, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub tables: Vec<Table>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKeyReference>,
}

impl Inventory {
    /// Extract the inventory from a whole document
    pub fn extract(content: &str) -> Self {
        let lines: Vec<&str> = content.lines().collect();

        let inventory = Self {
            tables: extract_tables(&lines),
            indexes: extract_indexes(content),
            foreign_keys: extract_foreign_keys(&lines),
        };

        tracing::debug!(
            tables = inventory.tables.len(),
            indexes = inventory.indexes.len(),
            foreign_keys = inventory.foreign_keys.len(),
            "extracted inventory"
        );

        inventory
    }
}

fn extract_tables(lines: &[&str]) -> Vec<Table> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            TABLE_REGEX.captures(line).map(|caps| Table {
                name: caps[1].to_string(),
                line: i + 1,
            })
        })
        .collect()
}

/// Index definitions may span lines, so match against the whole document
/// with every whitespace run collapsed to one space.
fn extract_indexes(content: &str) -> Vec<Index> {
    let normalized = WHITESPACE_REGEX.replace_all(content, " ");

    INDEX_REGEX
        .captures_iter(&normalized)
        .map(|caps| Index {
            name: caps[1].to_string(),
            table: caps[2].to_string(),
            columns: caps[3]
                .split(',')
                .filter_map(|entry| entry.split_whitespace().next())
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// Line scan with a "current table" cursor: opened by a line starting with
/// `create table`, closed by a line that is just `);`. References outside a
/// table body are ignored.
fn extract_foreign_keys(lines: &[&str]) -> Vec<ForeignKeyReference> {
    let mut foreign_keys = Vec::new();
    let mut current_table: Option<String> = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        let opens_table = TABLE_START_REGEX.is_match(trimmed);

        if opens_table {
            if let Some(caps) = TABLE_REGEX.captures(trimmed) {
                current_table = Some(caps[1].to_string());
            }
        } else if closes_table_body(trimmed) {
            current_table = None;
        }

        let Some(table) = current_table.as_deref() else {
            continue;
        };

        if trimmed.starts_with("--") {
            continue;
        }

        let code = strip_trailing_comment(trimmed);
        for caps in REFERENCES_REGEX.captures_iter(code) {
            let Some(keyword) = caps.get(0) else { continue };
            let Some(column) = referencing_column(code, keyword.start()) else {
                continue;
            };

            foreign_keys.push(ForeignKeyReference {
                table: table.to_string(),
                column: column.to_string(),
                ref_table: caps[1].to_string(),
                line: i + 1,
            });
        }

        // A table created and closed on the same line
        if opens_table && code.trim_end().ends_with(");") {
            current_table = None;
        }
    }

    foreign_keys
}

fn closes_table_body(trimmed: &str) -> bool {
    strip_trailing_comment(trimmed).trim_end() == ");"
}

fn strip_trailing_comment(line: &str) -> &str {
    match line.find("--") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Column that owns the `references` keyword at `keyword_start`.
///
/// The owning column definition starts after the nearest `,` or `(` that is
/// not closed before the keyword. `foreign key (col)` constraints name their
/// column explicitly; otherwise the first token of the definition is taken.
fn referencing_column(code: &str, keyword_start: usize) -> Option<&str> {
    let segment = &code[definition_start(code, keyword_start)..keyword_start];

    if let Some(caps) = FOREIGN_KEY_REGEX.captures(segment) {
        return caps.get(1).map(|m| m.as_str());
    }

    COLUMN_REGEX
        .captures(segment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn definition_start(code: &str, end: usize) -> usize {
    let mut depth = 0usize;

    for (pos, byte) in code.as_bytes()[..end].iter().copied().enumerate().rev() {
        match byte {
            b')' => depth += 1,
            b'(' if depth == 0 => return pos + 1,
            b'(' => depth -= 1,
            b',' if depth == 0 => return pos + 1,
            _ => {}
        }
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tables_in_source_order() {
        let sql = "create table users (\n  id bigint\n);\nCREATE TABLE IF NOT EXISTS app.\"Orders\" (\n  id bigint\n);\n";
        let inventory = Inventory::extract(sql);

        assert_eq!(
            inventory.tables,
            vec![
                Table { name: "users".into(), line: 1 },
                Table { name: "app.\"Orders\"".into(), line: 4 },
            ]
        );
    }

    #[test]
    fn multi_line_index_is_normalized() {
        let sql = "CREATE UNIQUE INDEX IF NOT EXISTS idx_orders_user\n    ON orders\n    USING btree (user_id DESC, created_at);";
        let inventory = Inventory::extract(sql);

        assert_eq!(inventory.indexes.len(), 1);
        let index = &inventory.indexes[0];
        assert_eq!(index.name, "idx_orders_user");
        assert_eq!(index.table, "orders");
        assert_eq!(index.columns, vec!["user_id", "created_at"]);
        assert_eq!(index.leading_column(), Some("user_id"));
    }

    #[test]
    fn concurrent_index_on_only() {
        let sql = "create index concurrently idx_a on only public.a (b);";
        let inventory = Inventory::extract(sql);

        assert_eq!(inventory.indexes[0].name, "idx_a");
        assert_eq!(inventory.indexes[0].table, "public.a");
    }

    #[test]
    fn inline_foreign_keys_track_current_table() {
        let sql = "\
create table orders (
  id bigint primary key,
  user_id bigint not null references users(id) on delete cascade,
  -- note_id bigint references notes(id),
  shop_id bigint references shops
);
alter table orders add column x bigint references other(id);
";
        let inventory = Inventory::extract(sql);

        assert_eq!(
            inventory.foreign_keys,
            vec![
                ForeignKeyReference {
                    table: "orders".into(),
                    column: "user_id".into(),
                    ref_table: "users".into(),
                    line: 3,
                },
                ForeignKeyReference {
                    table: "orders".into(),
                    column: "shop_id".into(),
                    ref_table: "shops".into(),
                    line: 5,
                },
            ]
        );
    }

    #[test]
    fn single_line_table_attributes_the_right_column() {
        let sql = "CREATE TABLE orders (id uuid primary key default gen_random_uuid(), user_id uuid references users(id));\nfoo_id int references foo(id)";
        let inventory = Inventory::extract(sql);

        assert_eq!(inventory.foreign_keys.len(), 1);
        assert_eq!(inventory.foreign_keys[0].table, "orders");
        assert_eq!(inventory.foreign_keys[0].column, "user_id");
        assert_eq!(inventory.foreign_keys[0].ref_table, "users");
    }

    #[test]
    fn table_constraint_names_its_column() {
        let sql = "\
create table line_items (
  order_id bigint not null,
  numeric_total numeric(10, 2),
  constraint fk_order foreign key (order_id) references orders (id)
);
";
        let inventory = Inventory::extract(sql);

        assert_eq!(inventory.foreign_keys.len(), 1);
        assert_eq!(inventory.foreign_keys[0].column, "order_id");
        assert_eq!(inventory.foreign_keys[0].line, 4);
    }

    #[test]
    fn continuation_line_without_column_is_skipped() {
        let sql = "create table a (\n  b_id bigint not null\n    references b(id)\n);";
        let inventory = Inventory::extract(sql);

        assert!(inventory.foreign_keys.is_empty());
    }

    #[test]
    fn close_paren_with_trailing_comment_closes_table() {
        let sql = "create table a (\n  id int\n); -- end\nb_id int references b(id)\n";
        let inventory = Inventory::extract(sql);

        assert!(inventory.foreign_keys.is_empty());
    }

    #[test]
    fn definition_start_skips_balanced_parens() {
        let code = "create table t (a numeric(10,2) references x";
        let start = definition_start(code, code.find("references").unwrap());
        assert_eq!(&code[start..start + 2], "a ");
    }
}
