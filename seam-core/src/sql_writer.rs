use crate::{
    ColumnRef, Delete, Insert, Order, Select, TableRef, Update, Value, Where, separated_by,
};
use std::fmt::Write;
use time::{Date, Time, UtcOffset};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Renders statements as SQL text. Every method has an ANSI default, drivers override what
/// their dialect spells differently.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    fn write_table_ref(&self, out: &mut String, value: &TableRef) {
        if !value.schema.is_empty() {
            self.write_identifier_quoted(out, value.schema);
            out.push('.');
        }
        self.write_identifier_quoted(out, value.name);
    }

    fn write_column_ref(&self, out: &mut String, value: &ColumnRef, qualify: bool) {
        if qualify && !value.table.is_empty() {
            self.write_table_ref(out, &value.table());
            out.push('.');
        }
        self.write_identifier_quoted(out, value.name);
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        if value.is_null() {
            return self.write_value_none(out);
        }
        match value {
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => self.write_value_float(out, *v as f64),
            Value::Float64(Some(v)) => self.write_value_float(out, *v),
            Value::Decimal(Some(v)) => drop(write!(out, "{}", v)),
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Date(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, v);
                out.push('\'');
            }
            Value::Time(Some(v)) => {
                out.push('\'');
                self.write_value_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push('T');
                self.write_value_time(out, &v.time());
                out.push('\'');
            }
            Value::TimestampWithTimezone(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push('T');
                self.write_value_time(out, &v.time());
                self.write_value_offset(out, &v.offset());
                out.push('\'');
            }
            Value::Uuid(Some(v)) => drop(write!(out, "'{}'", v)),
            Value::Json(Some(v)) => self.write_value_string(out, &v.to_string()),
            _ => self.write_value_none(out),
        };
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL")
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize])
    }

    fn write_value_float(&self, out: &mut String, value: f64) {
        if value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            out.push_str(buffer.format(value));
        } else if value.is_nan() {
            out.push_str("'NaN'");
        } else if value > 0.0 {
            out.push_str("'Infinity'");
        } else {
            out.push_str("'-Infinity'");
        }
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        let mut subsecond = value.nanosecond();
        let mut width = 9;
        while width > 1 && subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}.{:0width$}",
            value.hour(),
            value.minute(),
            value.second(),
            subsecond
        );
    }

    fn write_value_offset(&self, out: &mut String, value: &UtcOffset) {
        let (hours, minutes, _) = value.as_hms();
        let sign = if value.is_negative() { '-' } else { '+' };
        let _ = write!(out, "{}{:02}:{:02}", sign, hours.abs(), minutes.abs());
    }

    fn write_where(&self, out: &mut String, condition: &Where, qualify: bool) {
        if condition.is_empty() {
            out.push_str("true");
            return;
        }
        separated_by(
            out,
            condition.iter(),
            |out, (column, value)| {
                self.write_column_ref(out, column, qualify);
                if value.is_null() {
                    out.push_str(" IS NULL");
                } else {
                    out.push_str(" = ");
                    self.write_value(out, value);
                }
            },
            " AND ",
        );
    }

    fn write_select(&self, out: &mut String, select: &Select) {
        out.push_str("SELECT ");
        if select.columns.is_empty() {
            out.push('*');
        } else {
            separated_by(
                out,
                &select.columns,
                |out, v| self.write_column_ref(out, v, true),
                ", ",
            );
        }
        if let Some(from) = &select.from {
            out.push_str("\nFROM ");
            self.write_table_ref(out, from);
        }
        if !select.condition.is_empty() {
            out.push_str("\nWHERE ");
            self.write_where(out, &select.condition, true);
        }
        if !select.order_by.is_empty() {
            out.push_str("\nORDER BY ");
            separated_by(
                out,
                &select.order_by,
                |out, (column, order)| {
                    self.write_column_ref(out, column, true);
                    out.push_str(match order {
                        Order::Asc => " ASC",
                        Order::Desc => " DESC",
                    });
                },
                ", ",
            );
        }
        if let Some(limit) = select.limit {
            let _ = write!(out, "\nLIMIT {}", limit);
        }
        out.push(';');
    }

    fn write_insert(&self, out: &mut String, insert: &Insert) {
        if insert.rows.is_empty() {
            return;
        }
        out.push_str("INSERT INTO ");
        self.write_table_ref(out, &insert.table);
        if insert.columns.is_empty() {
            // Single row with every default
            out.push_str(" DEFAULT VALUES");
        } else {
            out.push_str(" (");
            separated_by(
                out,
                &insert.columns,
                |out, v| self.write_identifier_quoted(out, v),
                ", ",
            );
            out.push_str(") VALUES\n");
            separated_by(
                out,
                &insert.rows,
                |out, row| {
                    out.push('(');
                    separated_by(
                        out,
                        row,
                        |out, v| match v {
                            Some(v) => self.write_value(out, v),
                            None => out.push_str("DEFAULT"),
                        },
                        ", ",
                    );
                    out.push(')');
                },
                ",\n",
            );
        }
        if !insert.returning.is_empty() {
            out.push_str("\nRETURNING ");
            separated_by(
                out,
                &insert.returning,
                |out, v| self.write_column_ref(out, v, true),
                ", ",
            );
        }
        out.push(';');
    }

    fn write_update(&self, out: &mut String, update: &Update) {
        out.push_str("UPDATE ");
        self.write_table_ref(out, &update.table);
        out.push_str(" SET\n");
        separated_by(
            out,
            &update.values,
            |out, (column, value)| {
                self.write_identifier_quoted(out, column);
                out.push_str(" = ");
                self.write_value(out, value);
            },
            ",\n",
        );
        out.push_str("\nWHERE ");
        self.write_where(out, &update.condition, true);
        out.push(';');
    }

    fn write_delete(&self, out: &mut String, delete: &Delete) {
        out.push_str("DELETE FROM ");
        self.write_table_ref(out, &delete.table);
        out.push_str("\nWHERE ");
        self.write_where(out, &delete.condition, true);
        out.push(';');
    }

    /// Every table of `schema`, one row per table labeled `table_name`.
    fn write_catalog_tables(&self, out: &mut String, schema: &str) {
        out.push_str(
            "SELECT t.table_name::text AS table_name\n\
             FROM information_schema.tables t\n\
             WHERE t.table_schema = ",
        );
        self.write_value_string(out, schema);
        out.push_str("\nORDER BY t.table_name;");
    }

    /// Every column of `schema` labeled `table_name`, `column_name`, `data_type`,
    /// `column_default`, `nullable` and `primary_key`.
    fn write_catalog_columns(&self, out: &mut String, schema: &str) {
        out.push_str(
            "SELECT c.table_name::text AS table_name, c.column_name::text AS column_name, \
             c.data_type::text AS data_type, c.column_default::text AS column_default, \
             c.is_nullable = 'YES' AS nullable, EXISTS (\n\
             SELECT 1 FROM information_schema.table_constraints tc\n\
             JOIN information_schema.key_column_usage kcu ON \
             kcu.constraint_schema = tc.constraint_schema AND \
             kcu.constraint_name = tc.constraint_name AND \
             kcu.table_name = tc.table_name\n\
             WHERE tc.constraint_type = 'PRIMARY KEY' AND \
             tc.table_schema = c.table_schema AND \
             tc.table_name = c.table_name AND \
             kcu.column_name = c.column_name\n\
             ) AS primary_key\n\
             FROM information_schema.columns c\n\
             WHERE c.table_schema = ",
        );
        self.write_value_string(out, schema);
        out.push_str("\nORDER BY c.table_name, c.ordinal_position;");
    }
}

pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
