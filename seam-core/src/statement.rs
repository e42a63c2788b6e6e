use crate::{ColumnRef, TableRef, Value};

/// Conjunction of `column = value` equalities. A null value matches with `IS NULL`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Where(Vec<(ColumnRef, Value)>);

impl Where {
    pub fn new() -> Self {
        Self(Vec::new())
    }
    /// Add an equality, replacing the value if the column is already constrained.
    pub fn and(mut self, column: ColumnRef, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }
    pub fn push(&mut self, column: ColumnRef, value: impl Into<Value>) {
        let value = value.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.0.push((column, value)),
        }
    }
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.iter().find(|(c, _)| c.name == column).map(|(_, v)| v)
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &(ColumnRef, Value)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ColumnRef, Value)> for Where {
    fn from_iter<T: IntoIterator<Item = (ColumnRef, Value)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Where::new(), |result, (c, v)| result.and(c, v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// A `SELECT` statement. Passed to the entity engine as a pre-built query: when `columns` is
/// empty the entity's default projection is used, `from` is always set to the entity table.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: Vec<ColumnRef>,
    pub from: Option<TableRef>,
    pub condition: Where,
    pub order_by: Vec<(ColumnRef, Order)>,
    pub limit: Option<u32>,
}

impl Select {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn column(mut self, column: ColumnRef) -> Self {
        self.columns.push(column);
        self
    }
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnRef>) -> Self {
        self.columns.extend(columns);
        self
    }
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }
    pub fn filter(mut self, column: ColumnRef, value: impl Into<Value>) -> Self {
        self.condition.push(column, value);
        self
    }
    pub fn order_by(mut self, column: ColumnRef, order: Order) -> Self {
        self.order_by.push((column, order));
        self
    }
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A multi-row `INSERT`. A `None` cell is written as `DEFAULT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableRef,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Option<Value>>>,
    pub returning: Vec<ColumnRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: TableRef,
    pub values: Vec<(&'static str, Value)>,
    pub condition: Where,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: TableRef,
    pub condition: Where,
}
