use crate::{
    ColumnDef, ColumnRef, Driver, Error, Executor, Insert, Method, Record, Result, RowLabeled, Select,
    SqlWriter, TableRef, ValidValue, ValidationError, Value, Violation, ViolationKind,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::{collections::BTreeMap, pin::pin};

/// Validated values of one row, keyed by column name.
pub type ValidRow = BTreeMap<&'static str, ValidValue>;

/// Definition of an entity: the table and its column descriptors in declaration order.
///
/// Definitions are declared once as statics and every engine operation takes the definition
/// as data:
/// ```rust
/// use seam_core::{ColumnDef, EntityDef, Kind, TableRef};
/// static USER: EntityDef = EntityDef::new(
///     TableRef::new("user"),
///     &[
///         ColumnDef::new("id", Kind::Uuid).primary_key().required(),
///         ColumnDef::new("email", Kind::String).required(),
///         ColumnDef::new("avatar", Kind::String).nullable(),
///     ],
/// );
/// assert_eq!(USER.primary_key_def().count(), 1);
/// ```
#[derive(Debug)]
pub struct EntityDef {
    pub table: TableRef,
    pub columns: &'static [ColumnDef],
}

impl EntityDef {
    pub const fn new(table: TableRef, columns: &'static [ColumnDef]) -> Self {
        Self { table, columns }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_ref(&self, name: &str) -> Option<ColumnRef> {
        self.column(name).map(|c| ColumnRef::new(&self.table, c.name))
    }

    pub fn primary_key_def(&self) -> impl Iterator<Item = &'static ColumnDef> + Clone + use<> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Table qualified columns of the default projection, in declaration order.
    pub fn build_select(&self) -> Vec<ColumnRef> {
        self.columns
            .iter()
            .filter(|c| c.selectable)
            .map(|c| ColumnRef::new(&self.table, c.name))
            .collect()
    }

    /// Validate the supplied values, reporting every violation at once.
    ///
    /// Null is accepted only by nullable columns, any other value must match the column kind
    /// and then satisfy its custom check. Inserting additionally requires every required
    /// column. Unknown columns are rejected, except when hydrating where they are skipped.
    pub fn validate<I, K>(
        &self,
        method: Method,
        values: I,
    ) -> std::result::Result<ValidRow, ValidationError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut violations = Vec::new();
        let row = self.validate_row(method, None, values, &mut violations);
        if violations.is_empty() {
            Ok(row)
        } else {
            Err(self.validation_error(method, violations))
        }
    }

    fn validate_row<I, K>(
        &self,
        method: Method,
        index: Option<usize>,
        values: I,
        violations: &mut Vec<Violation>,
    ) -> ValidRow
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut found = Vec::new();
        let violation = |column: &str, kind: ViolationKind| Violation {
            row: index,
            column: column.to_string(),
            kind,
        };
        let mut row = ValidRow::new();
        for (name, value) in values {
            let name = name.as_ref();
            let Some(column) = self.column(name) else {
                if method == Method::Hydrate {
                    log::debug!("{}: skipping column `{}` with no definition", self.table, name);
                } else {
                    found.push(violation(name, ViolationKind::UnknownColumn));
                }
                continue;
            };
            let wrapped = if column.nullable {
                column.kind.wrap_or_null(value)
            } else {
                column.kind.wrap(value)
            };
            match wrapped {
                Ok(value) => {
                    if !value.is_null()
                        && let Some(valid) = column.valid
                        && !valid(value.value())
                    {
                        let received = value.value().to_json();
                        found.push(violation(column.name, ViolationKind::Predicate { received }));
                        continue;
                    }
                    row.insert(column.name, value);
                }
                Err(e) => found.push(violation(column.name, e.into())),
            }
        }
        if method == Method::Insert {
            for column in self.columns.iter().filter(|c| c.required) {
                // Supplied but invalid columns are already reported
                if !row.contains_key(column.name) && !found.iter().any(|v| v.column == column.name)
                {
                    found.push(violation(column.name, ViolationKind::Required));
                }
            }
        }
        violations.append(&mut found);
        row
    }

    fn validation_error(&self, method: Method, violations: Vec<Violation>) -> ValidationError {
        let error = ValidationError {
            table: self.table,
            method,
            violations,
        };
        log::debug!("{}", error);
        error
    }

    /// Build a record from a raw row, validating every value.
    pub fn hydrate<I, K>(&'static self, values: I) -> std::result::Result<Record, ValidationError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let values = self.validate(Method::Hydrate, values)?;
        Ok(Record::new(self, values))
    }

    pub fn hydrate_row(
        &'static self,
        row: RowLabeled,
    ) -> std::result::Result<Record, ValidationError> {
        let RowLabeled { labels, values } = row;
        self.hydrate(labels.iter().zip(values.into_vec()))
    }

    /// Scope a query to this entity: its table and, unless the caller chose columns, the
    /// default projection.
    fn scoped_select(&self, query: Option<Select>) -> Select {
        let mut query = query.unwrap_or_default();
        if query.columns.is_empty() {
            query.columns = self.build_select();
        }
        query.from = Some(self.table);
        query
    }

    /// Lazily stream the matching records, each row hydrated as it arrives.
    ///
    /// Dropping the stream abandons the underlying cursor.
    pub fn select<Exec: Executor>(
        &'static self,
        executor: &mut Exec,
        query: Option<Select>,
    ) -> impl Stream<Item = Result<Record>> + Send {
        let query = self.scoped_select(query);
        let mut sql = String::with_capacity(256);
        executor.driver().sql_writer().write_select(&mut sql, &query);
        executor
            .fetch(sql.into())
            .map(move |row| row.and_then(|row| self.hydrate_row(row).map_err(Error::from)))
    }

    /// The first matching record, `None` when nothing matches.
    pub async fn select_one<Exec: Executor>(
        &'static self,
        executor: &mut Exec,
        query: Option<Select>,
    ) -> Result<Option<Record>> {
        let query = self.scoped_select(query).limit(1);
        let mut stream = pin!(self.select(executor, Some(query)));
        stream.next().await.transpose()
    }

    /// Insert one row and return it as stored by the database.
    pub async fn insert<Exec, I, K>(&'static self, executor: &mut Exec, values: I) -> Result<Record>
    where
        Exec: Executor,
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut violations = Vec::new();
        let row = self.validate_row(Method::Insert, None, values, &mut violations);
        if !violations.is_empty() {
            return Err(self.validation_error(Method::Insert, violations).into());
        }
        let mut records = self.insert_rows(executor, vec![row]).await?;
        if records.is_empty() {
            return Err(Error::msg(format!(
                "{}: the insert did not return the inserted row",
                self.table
            )));
        }
        Ok(records.swap_remove(0))
    }

    /// Insert every row in a single statement. Nothing is issued unless all the rows are valid,
    /// violations carry the index of their row.
    pub async fn insert_many<Exec, R, I, K>(
        &'static self,
        executor: &mut Exec,
        rows: R,
    ) -> Result<Vec<Record>>
    where
        Exec: Executor,
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut violations = Vec::new();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, values)| self.validate_row(Method::Insert, Some(i), values, &mut violations))
            .collect::<Vec<_>>();
        if !violations.is_empty() {
            return Err(self.validation_error(Method::Insert, violations).into());
        }
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.insert_rows(executor, rows).await
    }

    async fn insert_rows<Exec: Executor>(
        &'static self,
        executor: &mut Exec,
        rows: Vec<ValidRow>,
    ) -> Result<Vec<Record>> {
        let mut columns = self
            .columns
            .iter()
            .map(|c| c.name)
            .filter(|c| rows.iter().any(|r| r.contains_key(c)))
            .collect::<Vec<_>>();
        // DEFAULT VALUES inserts a single row, list one column to keep every row
        if columns.is_empty() && rows.len() > 1 {
            let Some(first) = self.columns.first() else {
                return Err(Error::msg(format!(
                    "{}: the entity declares no columns",
                    self.table
                )));
            };
            columns.push(first.name);
        }
        let insert = Insert {
            table: self.table,
            rows: rows
                .into_iter()
                .map(|mut row| {
                    columns
                        .iter()
                        .map(|c| row.remove(c).map(ValidValue::into_value))
                        .collect()
                })
                .collect(),
            columns,
            returning: self.build_select(),
        };
        let mut sql = String::with_capacity(256);
        executor.driver().sql_writer().write_insert(&mut sql, &insert);
        executor
            .fetch(sql.into())
            .map(move |row| row.and_then(|row| self.hydrate_row(row).map_err(Error::from)))
            .try_collect::<Vec<_>>()
            .await
    }
}
