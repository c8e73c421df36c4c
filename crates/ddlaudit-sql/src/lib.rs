//! DDL scanning and rule checks
//!
//! This crate handles:
//! - Extracting a shallow inventory (tables, indexes, inline foreign keys)
//!   from raw DDL text with regular expressions
//! - Evaluating the primary-key, data-type, FK-index and naming rules
//! - Wrapping the findings into a versioned report
//!
//! It is a heuristic text scanner, not a SQL parser: no AST is built and
//! unrecognized constructs are skipped.

pub mod inventory;
pub mod checks;
pub mod auditor;

pub use inventory::{ForeignKeyReference, Index, Inventory, Table};
pub use checks::{check_data_types, check_fk_indexes, check_naming, check_primary_keys};
pub use auditor::SchemaAuditor;
