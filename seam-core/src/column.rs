use crate::{Kind, TableRef, Value};
use std::fmt::{self, Debug, Display};

/// Fully qualified reference to a table column.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnRef {
    /// Column name.
    pub name: &'static str,
    /// Table name.
    pub table: &'static str,
    /// Schema name (may be empty).
    pub schema: &'static str,
}

impl ColumnRef {
    pub const fn new(table: &TableRef, name: &'static str) -> Self {
        Self {
            name,
            table: table.name,
            schema: table.schema,
        }
    }
    pub fn table(&self) -> TableRef {
        TableRef {
            name: self.table,
            schema: self.schema,
        }
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.table.is_empty() {
            write!(f, "{}.", self.table())?;
        }
        f.write_str(self.name)
    }
}

/// Custom validity check applied to non null values after the kind check.
pub type Predicate = fn(&Value) -> bool;

/// Declarative description of an entity column.
///
/// Built with `const` methods so that entity definitions can live in a `static`:
/// ```rust
/// use seam_core::{ColumnDef, Kind};
/// static ID: ColumnDef = ColumnDef::new("id", Kind::Uuid).primary_key().required();
/// ```
#[derive(Clone, Copy)]
pub struct ColumnDef {
    /// Column name.
    pub name: &'static str,
    /// Expected kind of the values.
    pub kind: Kind,
    /// Member of the primary key.
    pub primary_key: bool,
    /// Must be present when inserting.
    pub required: bool,
    /// Accepts `NULL`.
    pub nullable: bool,
    /// Part of the default projection. Secret columns (tokens, hashes) are not.
    pub selectable: bool,
    /// Custom validity check.
    pub valid: Option<Predicate>,
    /// Optional human-readable comment.
    pub comment: &'static str,
}

impl ColumnDef {
    pub const fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            primary_key: false,
            required: false,
            nullable: false,
            selectable: true,
            valid: None,
            comment: "",
        }
    }
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
    /// Exclude the column from the default projection.
    pub const fn secret(mut self) -> Self {
        self.selectable = false;
        self
    }
    pub const fn valid(mut self, predicate: Predicate) -> Self {
        self.valid = Some(predicate);
        self
    }
    pub const fn comment(mut self, comment: &'static str) -> Self {
        self.comment = comment;
        self
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("primary_key", &self.primary_key)
            .field("required", &self.required)
            .field("nullable", &self.nullable)
            .field("selectable", &self.selectable)
            .field("valid", &self.valid.is_some())
            .field("comment", &self.comment)
            .finish()
    }
}
