use crate::{USER_PROFILE, execute_all, silent_logs};
use seam::{
    CatalogSnapshot, ColumnDef, Diagnostic, EntityDef, Executor, Kind, SchemaError, TableRef,
    check_schema,
};

static MEMBERSHIP: EntityDef = EntityDef::new(
    TableRef::with_schema("seam_testing", "membership"),
    &[
        ColumnDef::new("user_id", Kind::Uuid).primary_key().required(),
        ColumnDef::new("tenant_id", Kind::Uuid).required(),
        ColumnDef::new("role", Kind::String).required(),
    ],
);

static INVOICE: EntityDef = EntityDef::new(
    TableRef::with_schema("seam_testing", "invoice"),
    &[ColumnDef::new("id", Kind::Number).primary_key()],
);

/// Expects the tables created by the user suite.
pub async fn schema<E: Executor>(executor: &mut E) {
    execute_all(
        executor,
        &[
            "CREATE TABLE seam_testing.membership (
                user_id UUID NOT NULL,
                tenant_id UUID NOT NULL,
                role TEXT NOT NULL,
                PRIMARY KEY (user_id, tenant_id)
            );",
            "CREATE TABLE seam_testing.audit_log (
                id BIGSERIAL PRIMARY KEY,
                message TEXT
            );",
            "ALTER TABLE seam_testing.user_profile ADD COLUMN created_at TIMESTAMP DEFAULT now();",
        ],
    )
    .await;

    // Snapshot
    let snapshot = CatalogSnapshot::load(executor, "seam_testing")
        .await
        .expect("Failed to load the catalog");
    let names = snapshot
        .tables
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["audit_log", "membership", "user_profile"]);
    let membership = snapshot.get("membership").unwrap();
    assert_eq!(
        membership.primary_key().collect::<Vec<_>>(),
        ["user_id", "tenant_id"]
    );
    let user_profile = snapshot.get("user_profile").unwrap();
    let id = &user_profile.columns[0];
    assert_eq!(id.name, "id");
    assert_eq!(id.data_type, "uuid");
    assert!(id.primary_key);
    assert!(!id.nullable);
    let follower_count = user_profile
        .columns
        .iter()
        .find(|c| c.name == "follower_count")
        .unwrap();
    assert_eq!(follower_count.default.as_deref(), Some("0"));

    // Diagnostics only
    let diagnostics = check_schema(executor, "seam_testing", &[&USER_PROFILE, &INVOICE])
        .await
        .expect("The schema check should not fail");
    assert_eq!(
        diagnostics,
        [
            Diagnostic::TableWithoutDefinition {
                table: "audit_log".into()
            },
            Diagnostic::TableWithoutDefinition {
                table: "membership".into()
            },
            Diagnostic::ColumnWithoutDefinition {
                table: "user_profile".into(),
                column: "created_at".into(),
            },
            Diagnostic::DefinitionWithoutTable {
                table: "invoice".into()
            },
        ]
    );

    // Primary key drift
    let error;
    silent_logs! {
        error = check_schema(executor, "seam_testing", &[&USER_PROFILE, &MEMBERSHIP])
            .await
            .expect_err("The primary key mismatch should be fatal");
    }
    let error = error
        .downcast_ref::<SchemaError>()
        .expect("Expected a schema error");
    assert_eq!(
        *error,
        SchemaError::PrimaryKeyMismatch {
            table: "membership".into(),
            declared: vec!["user_id".into()],
            actual: vec!["tenant_id".into(), "user_id".into()],
        }
    );
}
