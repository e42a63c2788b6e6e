use rust_decimal::Decimal;
use serde_json::Number;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};
use uuid::Uuid;

/// Dynamically typed value exchanged between application code, the entity engine and the driver.
///
/// Every typed variant carries an `Option`, `None` is a typed SQL `NULL`.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
    Json(Option<serde_json::Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Value::Null
                | Value::Boolean(None)
                | Value::Int8(None)
                | Value::Int16(None)
                | Value::Int32(None)
                | Value::Int64(None)
                | Value::UInt8(None)
                | Value::UInt16(None)
                | Value::UInt32(None)
                | Value::UInt64(None)
                | Value::Float32(None)
                | Value::Float64(None)
                | Value::Decimal(None)
                | Value::Varchar(None)
                | Value::Date(None)
                | Value::Time(None)
                | Value::Timestamp(None)
                | Value::TimestampWithTimezone(None)
                | Value::Uuid(None)
                | Value::Json(None)
        )
    }

    /// Integer payload widened to `i128`, if this is a non null integer variant.
    pub fn as_integer(&self) -> Option<i128> {
        Some(match self {
            Value::Int8(Some(v)) => *v as i128,
            Value::Int16(Some(v)) => *v as i128,
            Value::Int32(Some(v)) => *v as i128,
            Value::Int64(Some(v)) => *v as i128,
            Value::UInt8(Some(v)) => *v as i128,
            Value::UInt16(Some(v)) => *v as i128,
            Value::UInt32(Some(v)) => *v as i128,
            Value::UInt64(Some(v)) => *v as i128,
            _ => return None,
        })
    }

    /// JSON snapshot of the value, used when reporting rejected input.
    ///
    /// Non finite floats become `null`, decimals, temporal values and UUIDs become strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        if self.is_null() {
            return Json::Null;
        }
        if let Some(v) = self.as_integer() {
            return match i64::try_from(v) {
                Ok(v) => Json::Number(v.into()),
                Err(..) => Json::Number((v as u64).into()),
            };
        }
        match self {
            Value::Boolean(Some(v)) => Json::Bool(*v),
            Value::Float32(Some(v)) => {
                Number::from_f64(*v as f64).map_or(Json::Null, Json::Number)
            }
            Value::Float64(Some(v)) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
            Value::Decimal(Some(v)) => Json::String(v.to_string()),
            Value::Varchar(Some(v)) => Json::String(v.clone()),
            Value::Date(Some(v)) => Json::String(
                v.format(format_description!("[year]-[month]-[day]"))
                    .unwrap_or_else(|_| v.to_string()),
            ),
            Value::Time(Some(v)) => Json::String(
                v.format(format_description!(
                    "[hour]:[minute]:[second].[subsecond digits:3]"
                ))
                .unwrap_or_else(|_| v.to_string()),
            ),
            Value::Timestamp(Some(v)) => Json::String(
                v.format(format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"
                ))
                .unwrap_or_else(|_| v.to_string()),
            ),
            Value::TimestampWithTimezone(Some(v)) => {
                Json::String(v.format(&Rfc3339).unwrap_or_else(|_| v.to_string()))
            }
            Value::Uuid(Some(v)) => Json::String(v.to_string()),
            Value::Json(Some(v)) => v.clone(),
            _ => Json::Null,
        }
    }
}
