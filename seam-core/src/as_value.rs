use crate::{Error, Result, Value};
use rust_decimal::Decimal;
use std::any;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// Used to build input rows for the entity engine and to read typed values back out of a
/// [`Record`](crate::Record).
///
/// # Examples
/// ```rust
/// use seam_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The typed `NULL` of this type.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    ///
    /// Integers accept every integer variant that fits the target range.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {} to {}",
        value.to_json(),
        any::type_name::<T>(),
    ))
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let $destination(Some(v)) = value {
                    return Ok(v);
                }
                let Some(v) = value.as_integer() else {
                    return Err(mismatch::<Self>(&value));
                };
                <$source>::try_from(v).map_err(|_| {
                    Error::msg(format!(
                        "Value {v} is out of range for {}",
                        any::type_name::<Self>(),
                    ))
                })
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

macro_rules! impl_as_value {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    $($pat_rest => $expr_rest,)*
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}

impl_as_value!(bool, Value::Boolean);
impl_as_value!(f32, Value::Float32);
impl_as_value!(f64, Value::Float64, Value::Float32(Some(v)) => Ok(v as f64));
impl_as_value!(Decimal, Value::Decimal);
impl_as_value!(String, Value::Varchar);
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    Value::Date(Some(v)) => Ok(v.midnight()),
);
impl_as_value!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
);
impl_as_value!(
    Uuid,
    Value::Uuid,
    Value::Varchar(Some(ref v)) => Uuid::parse_str(v).map_err(|e| {
        Error::new(e).context(format!("Cannot convert `{v}` to {}", any::type_name::<Uuid>()))
    }),
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}

/// JSON input converts into the matching native variant, arrays and objects stay [`Value::Json`].
impl AsValue for serde_json::Value {
    fn as_empty_value() -> Value {
        Value::Json(None)
    }
    fn as_value(self) -> Value {
        use serde_json::Value as Json;
        match self {
            Json::Null => Value::Null,
            Json::Bool(v) => Value::Boolean(Some(v)),
            Json::Number(v) => {
                if let Some(v) = v.as_i64() {
                    Value::Int64(Some(v))
                } else if let Some(v) = v.as_u64() {
                    Value::UInt64(Some(v))
                } else {
                    Value::Float64(v.as_f64())
                }
            }
            Json::String(v) => Value::Varchar(Some(v)),
            v @ (Json::Array(..) | Json::Object(..)) => Value::Json(Some(v)),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value.to_json())
    }
}
