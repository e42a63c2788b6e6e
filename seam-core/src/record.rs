use crate::{
    AsValue, ColumnRef, Delete, Driver, EntityDef, Error, Executor, Method, Result, SqlWriter, Update,
    ValidRow, Value, Where,
};
use std::collections::BTreeMap;

/// A row of an entity, holding only values that passed validation.
///
/// Obtained from [`EntityDef::hydrate`], [`EntityDef::select`] or [`EntityDef::insert`].
/// Columns that were never loaded (secret columns, narrowed projections) are simply absent.
#[derive(Debug, Clone)]
pub struct Record {
    def: &'static EntityDef,
    values: ValidRow,
}

impl Record {
    pub(crate) fn new(def: &'static EntityDef, values: ValidRow) -> Self {
        Self { def, values }
    }

    pub fn definition(&self) -> &'static EntityDef {
        self.def
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column).map(|v| v.value())
    }

    /// Read a column converted to a native type. An absent column reads as null.
    pub fn get_as<T: AsValue>(&self, column: &str) -> Result<T> {
        let value = self.get(column).cloned().unwrap_or_default();
        T::try_from_value(value).map_err(|e| {
            e.context(format!(
                "While reading column `{}` of `{}`",
                column, self.def.table
            ))
        })
    }

    pub fn values(&self) -> &ValidRow {
        &self.values
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Plain row with every held value.
    pub fn to_row(&self) -> BTreeMap<String, Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.to_string(), v.value().clone()))
            .collect()
    }

    /// JSON object with every held value, the form handed to API consumers.
    pub fn to_json(&self) -> serde_json::Value {
        self.values
            .iter()
            .map(|(k, v)| (k.to_string(), v.value().to_json()))
            .collect::<serde_json::Map<_, _>>()
            .into()
    }

    /// Condition matching this record by its primary key.
    pub fn build_where(&self) -> Result<Where> {
        let mut condition = Where::new();
        for column in self.def.primary_key_def() {
            let Some(value) = self.values.get(column.name) else {
                return Err(Error::msg(format!(
                    "{}: the record does not hold a value for the primary key column `{}`",
                    self.def.table, column.name
                )));
            };
            condition.push(
                ColumnRef::new(&self.def.table, column.name),
                value.value().clone(),
            );
        }
        if condition.is_empty() {
            return Err(Error::msg(format!(
                "{}: the entity has no primary key, its records cannot be addressed",
                self.def.table
            )));
        }
        Ok(condition)
    }

    /// Validate and persist the given values, then apply them to this record.
    ///
    /// The record is matched by the primary key values it held before the call. Supplying no
    /// values issues no statement.
    pub async fn update<Exec, I, K>(&mut self, executor: &mut Exec, values: I) -> Result<()>
    where
        Exec: Executor,
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let values = self.def.validate(Method::Update, values)?;
        if values.is_empty() {
            log::debug!("{}: nothing to update", self.def.table);
            return Ok(());
        }
        let update = Update {
            table: self.def.table,
            values: values
                .iter()
                .map(|(k, v)| (*k, v.value().clone()))
                .collect(),
            condition: self.build_where()?,
        };
        let mut sql = String::with_capacity(128);
        executor.driver().sql_writer().write_update(&mut sql, &update);
        let affected = executor.execute(sql.into()).await?;
        self.log_affected("update", affected.rows_affected);
        self.values.extend(values);
        Ok(())
    }

    /// Remove the record from its table.
    pub async fn delete<Exec: Executor>(&self, executor: &mut Exec) -> Result<()> {
        let delete = Delete {
            table: self.def.table,
            condition: self.build_where()?,
        };
        let mut sql = String::with_capacity(128);
        executor.driver().sql_writer().write_delete(&mut sql, &delete);
        let affected = executor.execute(sql.into()).await?;
        self.log_affected("delete", affected.rows_affected);
        Ok(())
    }

    fn log_affected(&self, operation: &str, rows: u64) {
        match rows {
            1 => {}
            0 => log::info!(
                "{}: {} matched no row, the record may have been removed",
                self.def.table,
                operation
            ),
            n => log::warn!(
                "{}: {} affected {} rows while addressing one record",
                self.def.table,
                operation,
                n
            ),
        }
    }
}
