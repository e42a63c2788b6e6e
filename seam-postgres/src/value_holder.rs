use postgres_types::{FromSql, Type};
use rust_decimal::Decimal;
use seam_core::Value;
use std::{error::Error, io::Read};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Decodes any column of a result row into a [`Value`].
#[derive(Debug)]
pub(crate) struct ValueHolder(pub(crate) Value);

impl<'a> FromSql<'a> for ValueHolder {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, Some(raw))
    }
    fn from_sql_null(ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, None)
    }
    fn from_sql_nullable(
        ty: &Type,
        raw: Option<&'a [u8]>,
    ) -> Result<Self, Box<dyn Error + Sync + Send>> {
        macro_rules! to_value {
            ($ty_var:ident, $raw:ident, $($($ty:path)|+ => ($value:path, $source:ty),)+) => {
                match *$ty_var {
                    $($($ty)|+ => $value(match $raw {
                        Some($raw) => Some(<$source>::from_sql($ty_var, $raw)?.into()),
                        None => None,
                    }),)+
                    _ => {
                        if let Some(mut raw) = $raw {
                            let mut buf = String::new();
                            let _ = raw.read_to_string(&mut buf);
                            return Err(seam_core::Error::msg(format!(
                                "Cannot decode sql type: `{}`, value: `{}`",
                                $ty_var, buf
                            ))
                            .into());
                        }
                        Value::Null
                    }
                }
            };
        }
        let value = to_value!(ty, raw,
            Type::BOOL => (Value::Boolean, bool),
            Type::CHAR => (Value::Int8, i8),
            Type::INT2 => (Value::Int16, i16),
            Type::INT4 => (Value::Int32, i32),
            Type::INT8 => (Value::Int64, i64),
            Type::FLOAT4 => (Value::Float32, f32),
            Type::FLOAT8 => (Value::Float64, f64),
            Type::NUMERIC => (Value::Decimal, Decimal),
            Type::OID => (Value::UInt32, u32),
            Type::VARCHAR | Type::TEXT | Type::NAME | Type::BPCHAR | Type::XML => (Value::Varchar, String),
            Type::JSON | Type::JSONB => (Value::Json, serde_json::Value),
            Type::DATE => (Value::Date, Date),
            Type::TIME => (Value::Time, Time),
            Type::TIMESTAMP => (Value::Timestamp, PrimitiveDateTime),
            Type::TIMESTAMPTZ => (Value::TimestampWithTimezone, OffsetDateTime),
            Type::UUID => (Value::Uuid, Uuid),
        );
        Ok(ValueHolder(value))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}
