use crate::{
    AsValue, Context, Driver, Error, Executor, Result, RowLabeled, SqlWriter,
    stream::TryStreamExt,
};

/// Column as described by the database catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub name: String,
    pub data_type: String,
    pub default: Option<String>,
    pub nullable: bool,
    /// Member of the table's primary key constraint.
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTable {
    pub name: String,
    /// Columns in ordinal position.
    pub columns: Vec<CatalogColumn>,
}

impl CatalogTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }
    pub fn column(mut self, column: CatalogColumn) -> Self {
        self.columns.push(column);
        self
    }
    pub fn primary_key(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }
}

impl CatalogColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            default: None,
            nullable: true,
            primary_key: false,
        }
    }
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Tables and columns of one schema, read once and then checked without further queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub schema: String,
    /// Tables in catalog order.
    pub tables: Vec<CatalogTable>,
}

impl CatalogSnapshot {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            tables: Vec::new(),
        }
    }

    pub fn table(mut self, table: CatalogTable) -> Self {
        self.tables.push(table);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CatalogTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Read the tables of `schema` and their columns.
    pub async fn load<Exec: Executor>(executor: &mut Exec, schema: &str) -> Result<Self> {
        let writer = executor.driver().sql_writer();
        let mut sql = String::with_capacity(256);
        writer.write_catalog_tables(&mut sql, schema);
        let tables = executor
            .fetch(sql.into())
            .try_collect::<Vec<_>>()
            .await
            .with_context(|| format!("While listing the tables of schema `{}`", schema))?;
        let mut snapshot = Self::new(schema);
        for row in tables {
            snapshot.tables.push(CatalogTable::new(field::<String>(&row, "table_name")?));
        }

        let mut sql = String::with_capacity(1024);
        writer.write_catalog_columns(&mut sql, schema);
        let columns = executor
            .fetch(sql.into())
            .try_collect::<Vec<_>>()
            .await
            .with_context(|| format!("While listing the columns of schema `{}`", schema))?;
        for row in columns {
            let table = field::<String>(&row, "table_name")?;
            let column = CatalogColumn {
                name: field::<String>(&row, "column_name")?,
                data_type: field::<String>(&row, "data_type")?,
                default: field(&row, "column_default")?,
                nullable: field(&row, "nullable")?,
                primary_key: field(&row, "primary_key")?,
            };
            // Views and foreign tables have columns but may be absent from the table list
            match snapshot.tables.iter_mut().find(|t| t.name == table) {
                Some(entry) => entry.columns.push(column),
                None => log::debug!("Catalog column `{}.{}` has no table", table, column.name),
            }
        }
        log::debug!(
            "Loaded {} tables from schema `{}`",
            snapshot.tables.len(),
            schema
        );
        Ok(snapshot)
    }
}

fn field<T: AsValue>(row: &RowLabeled, name: &str) -> Result<T> {
    let value = row
        .get_column(name)
        .cloned()
        .ok_or_else(|| Error::msg(format!("The catalog row has no column `{}`", name)))?;
    T::try_from_value(value).with_context(|| format!("While reading catalog column `{}`", name))
}
