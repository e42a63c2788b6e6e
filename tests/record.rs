#[cfg(test)]
mod tests {
    use indoc::indoc;
    use seam::{ColumnDef, EntityDef, Kind, Method, TableRef, ValidationError, Value};
    use seam_tests::{MockExecutor, silent_logs};
    use serde_json::json;
    use std::collections::BTreeMap;
    use time::macros::date;

    fn positive(value: &Value) -> bool {
        value.as_integer().is_some_and(|v| v > 0)
    }

    static MEMBERSHIP: EntityDef = EntityDef::new(
        TableRef::with_schema("app", "membership"),
        &[
            ColumnDef::new("tenant_id", Kind::Number).primary_key().required(),
            ColumnDef::new("user_id", Kind::Uuid).primary_key().required(),
            ColumnDef::new("role", Kind::String).required(),
            ColumnDef::new("seats", Kind::Number).valid(positive),
            ColumnDef::new("expires", Kind::Date).nullable(),
        ],
    );

    static LOG_LINE: EntityDef = EntityDef::new(
        TableRef::new("log_line"),
        &[ColumnDef::new("message", Kind::String)],
    );

    fn raw_membership() -> BTreeMap<String, Value> {
        BTreeMap::from_iter([
            ("tenant_id".to_string(), Value::Int32(Some(7))),
            (
                "user_id".to_string(),
                Value::from("5e915574-bb30-4430-98cf-c5854f61fbbd"),
            ),
            ("role".to_string(), Value::from("owner")),
            ("seats".to_string(), Value::Int64(Some(3))),
            ("expires".to_string(), Value::Null),
        ])
    }

    #[test]
    fn hydrate_round_trip() {
        let row = raw_membership();
        let membership = MEMBERSHIP.hydrate(row.clone()).unwrap();
        assert_eq!(membership.to_row(), row);
        assert_eq!(
            membership.to_json(),
            json!({
                "tenant_id": 7,
                "user_id": "5e915574-bb30-4430-98cf-c5854f61fbbd",
                "role": "owner",
                "seats": 3,
                "expires": null,
            })
        );
    }

    #[test]
    fn hydrate_keeps_dates() {
        for expires in [
            Value::from("2024-01-01 10:00:00"),
            Value::from("2024-01-01T10:00:00+02:00"),
            Value::from("2024-01-01"),
            Value::Date(Some(date!(2024-01-01))),
        ] {
            let mut row = raw_membership();
            row.insert("expires".to_string(), expires.clone());
            let membership = MEMBERSHIP.hydrate(row.clone()).unwrap();
            assert_eq!(membership.get("expires"), Some(&expires));
            assert_eq!(membership.to_row(), row);
        }
        let mut row = raw_membership();
        row.insert("expires".to_string(), Value::from("2024-01-01 10:00:00"));
        assert_eq!(
            MEMBERSHIP.hydrate(row).unwrap().to_json()["expires"],
            json!("2024-01-01 10:00:00")
        );
    }

    #[test]
    fn validate_collects_everything() {
        let error = MEMBERSHIP
            .validate(
                Method::Update,
                [
                    ("tenant_id", Value::from("7")),
                    ("role", Value::Null),
                    ("seats", Value::Int32(Some(0))),
                    ("expires", Value::from("someday")),
                    ("colour", Value::from("red")),
                ],
            )
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            indoc! {r#"
                app.membership.update() failed to validate:
                  Column tenant_id: expected a number, received: "7"
                  Column role: expected a string, received: null
                  Column seats: failed the validity check, received: 0
                  Column expires: expected a date or null, received: "someday"
                  Column colour: no such column is defined
            "#}
            .trim_end()
        );
    }

    #[test]
    fn validate_update_skips_required() {
        let values = MEMBERSHIP
            .validate(Method::Update, [("seats", Value::Int32(Some(4)))])
            .unwrap();
        assert_eq!(values.len(), 1);
        let values = MEMBERSHIP
            .validate(Method::Insert, [("seats", Value::Int32(Some(4)))])
            .unwrap_err();
        assert_eq!(
            values.columns().collect::<Vec<_>>(),
            ["tenant_id", "user_id", "role"]
        );
    }

    #[test]
    fn nullable_and_not_nullable() {
        for value in [None, Some(Value::Null), Some(Value::Date(None))] {
            let values = MEMBERSHIP
                .validate(Method::Update, value.map(|v| ("expires", v)))
                .unwrap();
            assert!(values.get("expires").is_none_or(|v| v.is_null()));
        }
        let error = MEMBERSHIP
            .validate(Method::Update, [("seats", Value::Null)])
            .unwrap_err();
        assert_eq!(error.columns().collect::<Vec<_>>(), ["seats"]);
    }

    #[tokio::test]
    async fn update_mutates_only_the_given_columns() {
        let mut executor = MockExecutor::new();
        executor.respond_affected(1);
        let mut membership = MEMBERSHIP.hydrate(raw_membership()).unwrap();
        membership
            .update(
                &mut executor,
                [
                    ("tenant_id", Value::Int32(Some(8))),
                    ("seats", Value::Int32(Some(10))),
                ],
            )
            .await
            .unwrap();
        assert_eq!(
            executor.last_query().unwrap(),
            indoc! {r#"
                UPDATE "app"."membership" SET
                "seats" = 10,
                "tenant_id" = 8
                WHERE "app"."membership"."tenant_id" = 7 AND "app"."membership"."user_id" = '5e915574-bb30-4430-98cf-c5854f61fbbd';
            "#}
            .trim()
        );
        let mut expected = raw_membership();
        expected.insert("tenant_id".into(), Value::Int32(Some(8)));
        expected.insert("seats".into(), Value::Int32(Some(10)));
        assert_eq!(membership.to_row(), expected);

        // The next statement is scoped by the new key
        membership.delete(&mut executor).await.unwrap();
        assert_eq!(
            executor.last_query().unwrap(),
            indoc! {r#"
                DELETE FROM "app"."membership"
                WHERE "app"."membership"."tenant_id" = 8 AND "app"."membership"."user_id" = '5e915574-bb30-4430-98cf-c5854f61fbbd';
            "#}
            .trim()
        );
    }

    #[tokio::test]
    async fn update_rejected_leaves_the_record() {
        let mut executor = MockExecutor::new();
        let mut membership = MEMBERSHIP.hydrate(raw_membership()).unwrap();
        let error = membership
            .update(&mut executor, [("role", Value::Int32(Some(1)))])
            .await
            .unwrap_err();
        assert!(error.downcast_ref::<ValidationError>().is_some());
        assert_eq!(membership.to_row(), raw_membership());
        assert!(executor.queries().is_empty());

        membership
            .update(&mut executor, Vec::<(&str, Value)>::new())
            .await
            .unwrap();
        assert!(executor.queries().is_empty());
    }

    #[tokio::test]
    async fn update_failure_keeps_old_values() {
        let mut executor = MockExecutor::new();
        executor.respond_error("canceling statement due to statement timeout");
        let mut membership = MEMBERSHIP.hydrate(raw_membership()).unwrap();
        silent_logs! {
            assert!(
                membership
                    .update(&mut executor, [("role", Value::from("admin"))])
                    .await
                    .is_err()
            );
        }
        assert_eq!(membership.get("role"), Some(&Value::from("owner")));
    }

    #[tokio::test]
    async fn unexpected_affected_rows_are_not_errors() {
        let mut executor = MockExecutor::new();
        executor.respond_affected(0).respond_affected(3);
        let mut membership = MEMBERSHIP.hydrate(raw_membership()).unwrap();
        silent_logs! {
            membership
                .update(&mut executor, [("role", Value::from("admin"))])
                .await
                .unwrap();
            membership.delete(&mut executor).await.unwrap();
        }
        assert_eq!(executor.queries().len(), 2);
    }

    #[tokio::test]
    async fn records_need_a_key() {
        let mut executor = MockExecutor::new();
        let line = LOG_LINE
            .hydrate([("message", Value::from("hello"))])
            .unwrap();
        assert!(line.build_where().is_err());
        assert!(line.delete(&mut executor).await.is_err());

        let partial = MEMBERSHIP
            .hydrate([("tenant_id", Value::Int32(Some(7)))])
            .unwrap();
        let error = partial.build_where().unwrap_err();
        assert!(error.to_string().contains("`user_id`"));
        assert!(executor.queries().is_empty());
    }
}
