use std::fmt::{self, Display};

/// Reference to a table, optionally qualified by its schema.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableRef {
    /// Table name.
    pub name: &'static str,
    /// Schema name (empty means the connection default).
    pub schema: &'static str,
}

impl TableRef {
    pub const fn new(name: &'static str) -> Self {
        Self { name, schema: "" }
    }
    pub const fn with_schema(schema: &'static str, name: &'static str) -> Self {
        Self { name, schema }
    }
    pub fn full_name(&self) -> String {
        let mut result = String::new();
        if !self.schema.is_empty() {
            result.push_str(self.schema);
            result.push('.');
        }
        result.push_str(self.name);
        result
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
