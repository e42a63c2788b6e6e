use crate::execute_all;
use seam::{
    ColumnDef, EntityDef, Executor, Kind, Order, Select, TableRef, ValidationError, Value,
    stream::TryStreamExt,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;
use uuid::Uuid;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn is_email(value: &Value) -> bool {
    matches!(value, Value::Varchar(Some(v)) if v.contains('@'))
}

pub static USER_PROFILE: EntityDef = EntityDef::new(
    TableRef::with_schema("seam_testing", "user_profile"),
    &[
        ColumnDef::new("id", Kind::Uuid).primary_key().required(),
        ColumnDef::new("email", Kind::String).required().valid(is_email),
        ColumnDef::new("display_name", Kind::String).nullable(),
        ColumnDef::new("follower_count", Kind::Number),
        ColumnDef::new("is_active", Kind::Boolean),
        ColumnDef::new("last_login", Kind::Date).nullable(),
        ColumnDef::new("api_token", Kind::String).nullable().secret(),
    ],
);

const ALICE: &str = "a1a1a1a1-a1a1-a1a1-a1a1-a1a1a1a1a1a1";
const BOB: &str = "b2b2b2b2-b2b2-b2b2-b2b2-b2b2b2b2b2b2";
const CHARLIE: &str = "c3c3c3c3-c3c3-c3c3-c3c3-c3c3c3c3c3c3";

pub async fn users<E: Executor>(executor: &mut E) {
    let _lock = MUTEX.lock().await;

    // Setup
    execute_all(
        executor,
        &[
            "DROP SCHEMA IF EXISTS seam_testing CASCADE;",
            "CREATE SCHEMA seam_testing;",
            "CREATE TABLE seam_testing.user_profile (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL,
                display_name TEXT,
                follower_count INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT true,
                last_login TIMESTAMP WITH TIME ZONE,
                api_token TEXT
            );",
        ],
    )
    .await;

    // Insert one
    let alice = USER_PROFILE
        .insert(
            executor,
            [
                ("id", Value::from(ALICE)),
                ("email", Value::from("alice@example.com")),
                ("last_login", Value::from("2025-07-15T10:00:00Z")),
                ("api_token", Value::from("alice-token")),
            ],
        )
        .await
        .expect("Failed to insert alice");
    assert_eq!(
        alice.get_as::<Uuid>("id").expect("Alice has no id"),
        Uuid::parse_str(ALICE).unwrap()
    );
    assert_eq!(alice.get("display_name"), Some(&Value::Null));
    assert_eq!(alice.get_as::<i32>("follower_count").unwrap(), 0);
    assert!(alice.get_as::<bool>("is_active").unwrap());
    assert_eq!(
        alice
            .get_as::<time::OffsetDateTime>("last_login")
            .unwrap()
            .unix_timestamp(),
        1752573600
    );
    assert!(
        !alice.contains("api_token"),
        "Secret columns must not be returned"
    );

    // Insert many
    let inserted = USER_PROFILE
        .insert_many(
            executor,
            [
                vec![
                    ("id", Value::from(BOB)),
                    ("email", Value::from("bob@example.com")),
                    ("follower_count", Value::from(99)),
                ],
                vec![
                    ("id", Value::from(CHARLIE)),
                    ("email", Value::from("charlie@example.com")),
                    ("display_name", Value::from("Charlie")),
                    ("is_active", Value::from(false)),
                ],
            ],
        )
        .await
        .expect("Failed to insert bob and charlie");
    assert_eq!(inserted.len(), 2);
    assert_eq!(inserted[0].get_as::<i32>("follower_count").unwrap(), 99);
    assert!(!inserted[1].get_as::<bool>("is_active").unwrap());

    // Invalid insert issues nothing
    let error = USER_PROFILE
        .insert(
            executor,
            [
                ("id", Value::from("not-a-uuid")),
                ("email", Value::from("nobody")),
            ],
        )
        .await
        .expect_err("The insert should fail to validate");
    let error = error
        .downcast_ref::<ValidationError>()
        .expect("Expected a validation error");
    assert_eq!(error.columns().collect::<Vec<_>>(), ["id", "email"]);

    // Select
    let email = USER_PROFILE.column_ref("email").unwrap();
    let users = USER_PROFILE
        .select(
            executor,
            Some(Select::new().order_by(email, Order::Desc)),
        )
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select the users");
    assert_eq!(
        users
            .iter()
            .map(|v| v.get_as::<String>("email").unwrap())
            .collect::<Vec<_>>(),
        ["charlie@example.com", "bob@example.com", "alice@example.com"]
    );

    // Update
    let mut bob = USER_PROFILE
        .select_one(executor, Some(Select::new().filter(email, "bob@example.com")))
        .await
        .expect("Failed to query bob")
        .expect("Bob was not found");
    bob.update(
        executor,
        [
            ("display_name", Value::from("Bob Builder")),
            ("follower_count", Value::from(100)),
        ],
    )
    .await
    .expect("Failed to update bob");
    assert_eq!(bob.get_as::<String>("display_name").unwrap(), "Bob Builder");
    let id = USER_PROFILE.column_ref("id").unwrap();
    let bob = USER_PROFILE
        .select_one(
            executor,
            Some(Select::new().filter(id, Uuid::parse_str(BOB).unwrap())),
        )
        .await
        .expect("Failed to query bob again")
        .expect("Bob disappeared");
    assert_eq!(bob.get_as::<String>("display_name").unwrap(), "Bob Builder");
    assert_eq!(bob.get_as::<i32>("follower_count").unwrap(), 100);
    assert!(bob.get_as::<bool>("is_active").unwrap());

    // Secret columns can still be requested explicitly
    let alice = USER_PROFILE
        .select_one(
            executor,
            Some(
                Select::new()
                    .columns(USER_PROFILE.build_select())
                    .column(USER_PROFILE.column_ref("api_token").unwrap())
                    .filter(email, "alice@example.com"),
            ),
        )
        .await
        .expect("Failed to query alice")
        .expect("Alice was not found");
    assert_eq!(alice.get_as::<String>("api_token").unwrap(), "alice-token");

    // Delete
    let charlie = inserted
        .into_iter()
        .nth(1)
        .expect("Charlie was inserted");
    charlie.delete(executor).await.expect("Failed to delete charlie");
    let charlie = USER_PROFILE
        .select_one(executor, Some(Select::new().filter(email, "charlie@example.com")))
        .await
        .expect("Failed to query charlie");
    assert!(charlie.is_none());
    let count = USER_PROFILE
        .select(executor, None)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select the users")
        .len();
    assert_eq!(count, 2);
}
