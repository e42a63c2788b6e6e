#[cfg(test)]
mod tests {
    use indoc::indoc;
    use seam_core::{
        ColumnRef, Delete, GenericSqlWriter, Insert, Order, Select, SqlWriter, TableRef, Update,
        Value, Where,
    };
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();
    const ITEM: TableRef = TableRef::new("item");
    const ID: ColumnRef = ColumnRef::new(&ITEM, "id");
    const NAME: ColumnRef = ColumnRef::new(&ITEM, "name");

    fn literal(value: Value) -> String {
        let mut out = String::new();
        WRITER.write_value(&mut out, &value);
        out
    }

    #[test]
    fn literals() {
        assert_eq!(literal(Value::Null), "NULL");
        assert_eq!(literal(Value::Int32(None)), "NULL");
        assert_eq!(literal(Value::Boolean(Some(true))), "true");
        assert_eq!(literal(Value::Int64(Some(-42))), "-42");
        assert_eq!(literal(Value::UInt64(Some(u64::MAX))), "18446744073709551615");
        assert_eq!(literal(Value::Float64(Some(1.5))), "1.5");
        assert_eq!(literal(Value::Float64(Some(f64::NAN))), "'NaN'");
        assert_eq!(literal(Value::Float32(Some(f32::NEG_INFINITY))), "'-Infinity'");
        assert_eq!(literal(Value::from("it's")), "'it''s'");
        assert_eq!(literal(Value::Date(Some(date!(2025-07-05)))), "'2025-07-05'");
        assert_eq!(literal(Value::Time(Some(time!(08:09:10.25)))), "'08:09:10.25'");
        assert_eq!(
            literal(Value::Timestamp(Some(datetime!(2025-07-05 08:09:10)))),
            "'2025-07-05T08:09:10.0'"
        );
        assert_eq!(
            literal(Value::TimestampWithTimezone(Some(
                datetime!(2025-07-05 08:09:10 -03:30)
            ))),
            "'2025-07-05T08:09:10.0-03:30'"
        );
        assert_eq!(
            literal(Value::Uuid(Some(Uuid::nil()))),
            "'00000000-0000-0000-0000-000000000000'"
        );
        assert_eq!(
            literal(Value::Json(Some(serde_json::json!({"k": "o'k"})))),
            r#"'{"k":"o''k"}'"#
        );
    }

    #[test]
    fn identifiers() {
        let mut out = String::new();
        WRITER.write_table_ref(&mut out, &TableRef::with_schema("my schema", "we\"ird"));
        assert_eq!(out, r#""my schema"."we""ird""#);
    }

    #[test]
    fn select() {
        let mut out = String::new();
        WRITER.write_select(
            &mut out,
            &Select::new()
                .columns([ID, NAME])
                .from(ITEM)
                .filter(NAME, "bolt")
                .filter(ID, Value::Null)
                .order_by(NAME, Order::Desc)
                .limit(10),
        );
        assert_eq!(
            out,
            indoc! {r#"
                SELECT "item"."id", "item"."name"
                FROM "item"
                WHERE "item"."name" = 'bolt' AND "item"."id" IS NULL
                ORDER BY "item"."name" DESC
                LIMIT 10;
            "#}
            .trim()
        );

        let mut out = String::new();
        WRITER.write_select(&mut out, &Select::new().from(ITEM));
        assert_eq!(out, "SELECT *\nFROM \"item\";");
    }

    #[test]
    fn insert() {
        let mut out = String::new();
        WRITER.write_insert(
            &mut out,
            &Insert {
                table: ITEM,
                columns: vec!["id", "name"],
                rows: vec![
                    vec![Some(Value::Int32(Some(1))), Some(Value::from("bolt"))],
                    vec![Some(Value::Int32(Some(2))), None],
                ],
                returning: vec![ID, NAME],
            },
        );
        assert_eq!(
            out,
            indoc! {r#"
                INSERT INTO "item" ("id", "name") VALUES
                (1, 'bolt'),
                (2, DEFAULT)
                RETURNING "item"."id", "item"."name";
            "#}
            .trim()
        );

        let mut out = String::new();
        WRITER.write_insert(
            &mut out,
            &Insert {
                table: ITEM,
                columns: vec![],
                rows: vec![vec![]],
                returning: vec![],
            },
        );
        assert_eq!(out, r#"INSERT INTO "item" DEFAULT VALUES;"#);
    }

    #[test]
    fn update_and_delete() {
        let condition = Where::new().and(ID, 7);
        let mut out = String::new();
        WRITER.write_update(
            &mut out,
            &Update {
                table: ITEM,
                values: vec![("name", Value::from("nut")), ("price", Value::Null)],
                condition: condition.clone(),
            },
        );
        assert_eq!(
            out,
            indoc! {r#"
                UPDATE "item" SET
                "name" = 'nut',
                "price" = NULL
                WHERE "item"."id" = 7;
            "#}
            .trim()
        );

        let mut out = String::new();
        WRITER.write_delete(
            &mut out,
            &Delete {
                table: ITEM,
                condition,
            },
        );
        assert_eq!(out, "DELETE FROM \"item\"\nWHERE \"item\".\"id\" = 7;");
    }

    #[test]
    fn where_replaces_repeated_columns() {
        let condition = Where::new().and(ID, 1).and(NAME, "a").and(ID, 2);
        assert_eq!(condition.len(), 2);
        assert_eq!(condition.get("id"), Some(&Value::Int32(Some(2))));
        let mut out = String::new();
        WRITER.write_where(&mut out, &condition, false);
        assert_eq!(out, r#""id" = 2 AND "name" = 'a'"#);
        let mut out = String::new();
        WRITER.write_where(&mut out, &Where::new(), true);
        assert_eq!(out, "true");
    }

    #[test]
    fn catalog_queries() {
        let mut out = String::new();
        WRITER.write_catalog_tables(&mut out, "public");
        assert!(out.contains("FROM information_schema.tables t"));
        assert!(out.contains("WHERE t.table_schema = 'public'"));
        let mut out = String::new();
        WRITER.write_catalog_columns(&mut out, "o'neil");
        assert!(out.contains("tc.constraint_type = 'PRIMARY KEY'"));
        assert!(out.contains("WHERE c.table_schema = 'o''neil'"));
        assert!(out.ends_with("ORDER BY c.table_name, c.ordinal_position;"));
    }
}
