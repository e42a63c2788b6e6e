use crate::{TableRef, WrapError};
use std::fmt::{self, Display};
use thiserror::Error;

/// Operation on whose behalf values are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Hydrate,
    Insert,
    Update,
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Hydrate => "hydrate",
            Method::Insert => "insert",
            Method::Update => "update",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViolationKind {
    #[error("{0}")]
    Type(#[from] WrapError),
    #[error("failed the validity check, received: {received}")]
    Predicate { received: serde_json::Value },
    #[error("a value is required")]
    Required,
    #[error("no such column is defined")]
    UnknownColumn,
}

/// One column that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Index of the row when validating a batch.
    pub row: Option<usize>,
    pub column: String,
    pub kind: ViolationKind,
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "Row {} column {}: {}", row, self.column, self.kind),
            None => write!(f, "Column {}: {}", self.column, self.kind),
        }
    }
}

/// Every violation found while validating a batch of values.
///
/// Raised before any statement is issued.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "{table}.{method}() failed to validate:{}",
    .violations.iter().map(|v| format!("\n  {}", v)).collect::<String>()
)]
pub struct ValidationError {
    pub table: TableRef,
    pub method: Method,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Names of the offending columns, in reporting order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.column.as_str())
    }
    pub fn violation(&self, column: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.column == column)
    }
}

/// Entity definitions that cannot be trusted against the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error(
        "Table `{table}` keys ({}) do not match database keys ({})",
        .declared.join(", "),
        .actual.join(", ")
    )]
    PrimaryKeyMismatch {
        table: String,
        declared: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Entity `{table}` declares column `{column}` more than once")]
    DuplicateColumn { table: String, column: String },
    #[error("Table `{table}` is declared by more than one entity")]
    DuplicateDefinition { table: String },
}
