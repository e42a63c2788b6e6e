#[cfg(test)]
mod tests {
    use seam::{
        CatalogColumn, CatalogSnapshot, CatalogTable, ColumnDef, Diagnostic, EntityDef, Kind,
        SchemaError, TableRef, Value, check_schema, reconcile,
    };
    use seam_tests::{MockExecutor, row, silent_logs};

    static ACCOUNT: EntityDef = EntityDef::new(
        TableRef::new("account"),
        &[
            ColumnDef::new("id", Kind::Uuid).primary_key().required(),
            ColumnDef::new("name", Kind::String).required(),
        ],
    );

    static INVOICE: EntityDef = EntityDef::new(
        TableRef::new("invoice"),
        &[
            ColumnDef::new("id", Kind::Number).primary_key(),
            ColumnDef::new("total", Kind::Number),
        ],
    );

    static ARCHIVED: EntityDef = EntityDef::new(
        TableRef::with_schema("archive", "invoice"),
        &[ColumnDef::new("serial", Kind::Number).primary_key()],
    );

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new("public")
            .table(
                CatalogTable::new("account")
                    .column(CatalogColumn::new("id", "uuid").primary_key())
                    .column(CatalogColumn::new("name", "text").not_null())
                    .column(CatalogColumn::new("created_at", "timestamp").default("now()")),
            )
            .table(
                CatalogTable::new("migrations")
                    .column(CatalogColumn::new("version", "integer").primary_key()),
            )
    }

    #[test]
    fn diagnostics_are_not_fatal() {
        let diagnostics = reconcile(&[&ACCOUNT, &INVOICE, &ARCHIVED], &catalog()).unwrap();
        assert_eq!(
            diagnostics,
            [
                Diagnostic::ColumnWithoutDefinition {
                    table: "account".into(),
                    column: "created_at".into(),
                },
                Diagnostic::TableWithoutDefinition {
                    table: "migrations".into(),
                },
                Diagnostic::DefinitionWithoutTable {
                    table: "invoice".into(),
                },
            ]
        );
        assert_eq!(
            diagnostics[1].to_string(),
            "Table `migrations` has no entity definition"
        );
    }

    #[test]
    fn unknown_table_only() {
        let snapshot = CatalogSnapshot::new("public").table(
            CatalogTable::new("legacy").column(CatalogColumn::new("id", "integer").primary_key()),
        );
        assert_eq!(
            reconcile(&[], &snapshot).unwrap(),
            [Diagnostic::TableWithoutDefinition {
                table: "legacy".into()
            }]
        );
    }

    #[test]
    fn primary_key_mismatch_is_fatal() {
        let snapshot = CatalogSnapshot::new("public")
            .table(
                CatalogTable::new("account")
                    .column(CatalogColumn::new("id", "uuid").primary_key())
                    .column(CatalogColumn::new("tenant_id", "uuid").primary_key())
                    .column(CatalogColumn::new("name", "text")),
            )
            .table(CatalogTable::new("unrelated"));
        let error = reconcile(&[&ACCOUNT], &snapshot).unwrap_err();
        assert_eq!(
            error,
            SchemaError::PrimaryKeyMismatch {
                table: "account".into(),
                declared: vec!["id".into()],
                actual: vec!["id".into(), "tenant_id".into()],
            }
        );
        assert_eq!(
            error.to_string(),
            "Table `account` keys (id) do not match database keys (id, tenant_id)"
        );
    }

    #[test]
    fn primary_key_order_does_not_matter() {
        static PAIR: EntityDef = EntityDef::new(
            TableRef::new("pair"),
            &[
                ColumnDef::new("b", Kind::Number).primary_key(),
                ColumnDef::new("a", Kind::Number).primary_key(),
            ],
        );
        let snapshot = CatalogSnapshot::new("public").table(
            CatalogTable::new("pair")
                .column(CatalogColumn::new("a", "integer").primary_key())
                .column(CatalogColumn::new("b", "integer").primary_key()),
        );
        assert!(reconcile(&[&PAIR], &snapshot).unwrap().is_empty());
    }

    #[test]
    fn malformed_definitions() {
        static TWICE: EntityDef = EntityDef::new(
            TableRef::new("twice"),
            &[
                ColumnDef::new("id", Kind::Number).primary_key(),
                ColumnDef::new("id", Kind::String),
            ],
        );
        assert_eq!(
            reconcile(&[&TWICE], &catalog()).unwrap_err(),
            SchemaError::DuplicateColumn {
                table: "twice".into(),
                column: "id".into(),
            }
        );
        assert_eq!(
            reconcile(&[&ACCOUNT, &INVOICE, &ACCOUNT], &catalog()).unwrap_err(),
            SchemaError::DuplicateDefinition {
                table: "account".into(),
            }
        );

        static PUBLIC_ACCOUNT: EntityDef = EntityDef::new(
            TableRef::with_schema("public", "account"),
            &[ColumnDef::new("id", Kind::Uuid).primary_key()],
        );
        assert_eq!(
            reconcile(&[&ACCOUNT, &PUBLIC_ACCOUNT], &catalog()).unwrap_err(),
            SchemaError::DuplicateDefinition {
                table: "public.account".into(),
            }
        );
        static BILLING_ACCOUNT: EntityDef = EntityDef::new(
            TableRef::with_schema("billing", "account"),
            &[ColumnDef::new("id", Kind::Uuid).primary_key()],
        );
        assert!(reconcile(&[&ACCOUNT, &BILLING_ACCOUNT], &catalog()).is_ok());
    }

    #[tokio::test]
    async fn check_schema_loads_the_catalog() {
        let mut executor = MockExecutor::new();
        executor
            .respond_rows([row([("table_name", Value::from("account"))])])
            .respond_rows([
                row([
                    ("table_name", Value::from("account")),
                    ("column_name", Value::from("id")),
                    ("data_type", Value::from("uuid")),
                    ("column_default", Value::Varchar(None)),
                    ("nullable", Value::Boolean(Some(false))),
                    ("primary_key", Value::Boolean(Some(true))),
                ]),
                row([
                    ("table_name", Value::from("account")),
                    ("column_name", Value::from("name")),
                    ("data_type", Value::from("text")),
                    ("column_default", Value::from("'anonymous'::text")),
                    ("nullable", Value::Boolean(Some(true))),
                    ("primary_key", Value::Boolean(Some(false))),
                ]),
            ]);
        let diagnostics = check_schema(&mut executor, "public", &[&ACCOUNT])
            .await
            .unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(executor.queries().len(), 2);
        assert!(executor.queries()[0].contains("information_schema.tables"));
        assert!(executor.queries()[1].contains("information_schema.columns"));

        executor
            .respond_rows([row([("table_name", Value::from("account"))])])
            .respond_rows([row([
                ("table_name", Value::from("account")),
                ("column_name", Value::from("name")),
                ("data_type", Value::from("text")),
                ("column_default", Value::Varchar(None)),
                ("nullable", Value::Boolean(Some(false))),
                ("primary_key", Value::Boolean(Some(true))),
            ])]);
        silent_logs! {
            let error = check_schema(&mut executor, "public", &[&ACCOUNT])
                .await
                .unwrap_err();
            assert!(matches!(
                error.downcast_ref::<SchemaError>(),
                Some(SchemaError::PrimaryKeyMismatch { .. })
            ));
        }

        executor.respond_error("permission denied for schema public");
        silent_logs! {
            let error = check_schema(&mut executor, "public", &[&ACCOUNT])
                .await
                .unwrap_err();
            assert!(format!("{:#}", error).contains("permission denied"));
        }
    }
}
