use crate::{CatalogSnapshot, EntityDef, Executor, Result, SchemaError};
use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

/// Non fatal finding of a schema check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    TableWithoutDefinition { table: String },
    ColumnWithoutDefinition { table: String, column: String },
    DefinitionWithoutTable { table: String },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TableWithoutDefinition { table } => {
                write!(f, "Table `{}` has no entity definition", table)
            }
            Diagnostic::ColumnWithoutDefinition { table, column } => write!(
                f,
                "Column `{}` of table `{}` has no definition",
                column, table
            ),
            Diagnostic::DefinitionWithoutTable { table } => {
                write!(f, "Entity `{}` has no table in the database", table)
            }
        }
    }
}

/// Cross check the entity definitions against a catalog snapshot.
///
/// Tables and columns the definitions do not know about, and definitions without a table, are
/// reported as diagnostics. A primary key that differs from the database one is fatal and stops
/// the check at the first offending table, as is a malformed set of definitions.
pub fn reconcile(
    definitions: &[&EntityDef],
    snapshot: &CatalogSnapshot,
) -> std::result::Result<Vec<Diagnostic>, SchemaError> {
    check_definitions(definitions, &snapshot.schema)?;
    let definitions = definitions
        .iter()
        .filter(|d| d.table.schema.is_empty() || d.table.schema == snapshot.schema)
        .collect::<Vec<_>>();
    let mut diagnostics = Vec::new();
    for table in &snapshot.tables {
        let Some(def) = definitions.iter().find(|d| d.table.name == table.name) else {
            diagnostics.push(Diagnostic::TableWithoutDefinition {
                table: table.name.clone(),
            });
            continue;
        };
        for column in &table.columns {
            if def.column(&column.name).is_none() {
                diagnostics.push(Diagnostic::ColumnWithoutDefinition {
                    table: table.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        let declared = def
            .primary_key_def()
            .map(|c| c.name)
            .collect::<BTreeSet<_>>();
        let actual = table.primary_key().collect::<BTreeSet<_>>();
        if declared != actual {
            return Err(SchemaError::PrimaryKeyMismatch {
                table: table.name.clone(),
                declared: declared.into_iter().map(String::from).collect(),
                actual: actual.into_iter().map(String::from).collect(),
            });
        }
    }
    for def in definitions {
        if snapshot.get(def.table.name).is_none() {
            diagnostics.push(Diagnostic::DefinitionWithoutTable {
                table: def.table.name.to_string(),
            });
        }
    }
    Ok(diagnostics)
}

fn check_definitions(
    definitions: &[&EntityDef],
    schema: &str,
) -> std::result::Result<(), SchemaError> {
    let mut tables = BTreeSet::new();
    for def in definitions {
        // An empty schema is the one being checked
        let resolved = match def.table.schema {
            "" => schema,
            other => other,
        };
        if !tables.insert((resolved, def.table.name)) {
            return Err(SchemaError::DuplicateDefinition {
                table: def.table.full_name(),
            });
        }
        let mut columns = BTreeSet::new();
        for column in def.columns {
            if !columns.insert(column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: def.table.full_name(),
                    column: column.name.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Load the catalog of `schema` and reconcile the definitions against it, logging every finding.
///
/// Meant to run once at startup: an error means the definitions cannot be trusted against
/// this database.
pub async fn check_schema<Exec: Executor>(
    executor: &mut Exec,
    schema: &str,
    definitions: &[&EntityDef],
) -> Result<Vec<Diagnostic>> {
    log::info!(
        "Checking {} entity definitions against schema `{}`",
        definitions.len(),
        schema
    );
    let snapshot = CatalogSnapshot::load(executor, schema).await?;
    match reconcile(definitions, &snapshot) {
        Ok(diagnostics) => {
            for diagnostic in &diagnostics {
                log::warn!("{}", diagnostic);
            }
            log::info!(
                "Schema `{}` checked, {} tables and {} diagnostics",
                schema,
                snapshot.tables.len(),
                diagnostics.len()
            );
            Ok(diagnostics)
        }
        Err(e) => {
            log::error!("{}", e);
            Err(e.into())
        }
    }
}
