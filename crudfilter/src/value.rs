//! Filter values and the type categories that govern which operations a
//! statement may use.
//!
//! A statement carries its operands as [`Value`]s. The generic parameter of
//! the typed constructors ([`FilterValue`] / [`DeclaredType`]) only exists to
//! pick a [`PropertyType`] at construction time, so that an operation which is
//! meaningless for the declared type is rejected before anything is compiled.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::FilterError;

/// Category of a scalar property, used as the key of the allowed-operations table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Number,
    Date,
    Boolean,
    Uuid,
    /// A nested record. Only null checks apply.
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Uuid => "uuid",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

/// Declared type of a statement's property: its category plus whether it is
/// nullable and whether it is an array of that category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyType {
    pub kind: ValueKind,
    pub nullable: bool,
    pub array: bool,
}

impl PropertyType {
    #[must_use]
    pub const fn scalar(kind: ValueKind) -> Self {
        Self {
            kind,
            nullable: false,
            array: false,
        }
    }

    #[must_use]
    pub const fn record() -> Self {
        Self::scalar(ValueKind::Record)
    }

    #[must_use]
    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    #[must_use]
    pub const fn array(self) -> Self {
        Self {
            array: true,
            ..self
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("nullable ")?;
        }
        write!(f, "{}", self.kind)?;
        if self.array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// An operand of a filter statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
    /// Candidate values for membership tests.
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Category inferred from the runtime shape. Lists report the category of
    /// their first non-null element.
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(ValueKind::Boolean),
            Self::Int(_) | Self::Float(_) | Self::Decimal(_) => Some(ValueKind::Number),
            Self::Text(_) => Some(ValueKind::Text),
            Self::DateTime(_) | Self::Date(_) => Some(ValueKind::Date),
            Self::Uuid(_) => Some(ValueKind::Uuid),
            Self::List(items) => items.iter().find_map(Self::kind),
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::DateTime(_) => "datetime",
            Self::Date(_) => "date",
            Self::Uuid(_) => "uuid",
            Self::List(_) => "list",
        }
    }

    /// Converts the operand to a representation comparable with a member of
    /// `kind`. Returns `None` when no sensible conversion exists.
    #[must_use]
    pub fn coerce(&self, kind: ValueKind) -> Option<Value> {
        match (self, kind) {
            (Self::Null, _) => Some(Self::Null),
            (Self::List(items), _) => items
                .iter()
                .map(|item| item.coerce(kind))
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            (Self::Text(_), ValueKind::Text)
            | (Self::Bool(_), ValueKind::Boolean)
            | (Self::Int(_) | Self::Float(_) | Self::Decimal(_), ValueKind::Number)
            | (Self::DateTime(_) | Self::Date(_), ValueKind::Date)
            | (Self::Uuid(_), ValueKind::Uuid) => Some(self.clone()),
            (Self::Text(s), ValueKind::Number) => parse_number(s.trim()),
            (Self::Text(s), ValueKind::Date) => parse_date(s.trim()),
            (Self::Text(s), ValueKind::Uuid) => Uuid::parse_str(s.trim()).ok().map(Self::Uuid),
            (Self::Text(s), ValueKind::Boolean) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Self::Bool(true)),
                "false" => Some(Self::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(int) = s.parse::<i64>() {
        return Some(Value::Int(int));
    }
    if let Ok(decimal) = Decimal::from_str(s) {
        return Some(Value::Decimal(decimal));
    }
    s.parse::<f64>().ok().map(Value::Float)
}

fn parse_date(s: &str) -> Option<Value> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        return Some(Value::DateTime(datetime.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Value::Date)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Decimal(d) => serializer.serialize_str(&d.to_string()),
            Self::Text(s) => serializer.serialize_str(s),
            Self::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Self::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Self::Uuid(u) => serializer.serialize_str(&u.to_string()),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Self::try_from(json).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = FilterError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(int) = n.as_i64() {
                    Self::Int(int)
                } else if let Some(float) = n.as_f64() {
                    Self::Float(float)
                } else {
                    return Err(FilterError::InvalidFilter(format!(
                        "number {n} is out of range"
                    )));
                }
            }
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            serde_json::Value::Object(_) => {
                return Err(FilterError::InvalidFilter(
                    "objects are not valid filter values".to_string(),
                ));
            }
        })
    }
}

/// Types that can be used as the declared type of a statement's property.
pub trait DeclaredType {
    fn property_type() -> PropertyType;
}

/// Types that can be passed as a statement operand.
pub trait FilterValue: DeclaredType {
    fn into_value(self) -> Value;
}

macro_rules! impl_filter_value {
    ($kind:expr => $($ty:ty: |$v:ident| $convert:expr),+ $(,)?) => {
        $(
            impl DeclaredType for $ty {
                fn property_type() -> PropertyType {
                    PropertyType::scalar($kind)
                }
            }

            impl FilterValue for $ty {
                fn into_value(self) -> Value {
                    let $v = self;
                    $convert
                }
            }
        )+
    };
}

impl_filter_value!(ValueKind::Number =>
    i8: |v| Value::Int(i64::from(v)),
    i16: |v| Value::Int(i64::from(v)),
    i32: |v| Value::Int(i64::from(v)),
    i64: |v| Value::Int(v),
    u8: |v| Value::Int(i64::from(v)),
    u16: |v| Value::Int(i64::from(v)),
    u32: |v| Value::Int(i64::from(v)),
    f32: |v| Value::Float(f64::from(v)),
    f64: |v| Value::Float(v),
    Decimal: |v| Value::Decimal(v),
);
impl_filter_value!(ValueKind::Text =>
    String: |v| Value::Text(v),
    &str: |v| Value::Text(v.to_string()),
);
impl_filter_value!(ValueKind::Boolean => bool: |v| Value::Bool(v));
impl_filter_value!(ValueKind::Date =>
    DateTime<Utc>: |v| Value::DateTime(v),
    NaiveDate: |v| Value::Date(v),
);
impl_filter_value!(ValueKind::Uuid => Uuid: |v| Value::Uuid(v));

impl<T: DeclaredType> DeclaredType for Option<T> {
    fn property_type() -> PropertyType {
        T::property_type().nullable()
    }
}

impl<T: FilterValue> FilterValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, FilterValue::into_value)
    }
}

impl<T: DeclaredType> DeclaredType for Vec<T> {
    fn property_type() -> PropertyType {
        T::property_type().array()
    }
}

impl<T: FilterValue> FilterValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(FilterValue::into_value).collect())
    }
}

impl<T: DeclaredType, const N: usize> DeclaredType for [T; N] {
    fn property_type() -> PropertyType {
        T::property_type().array()
    }
}

impl<T: FilterValue, const N: usize> FilterValue for [T; N] {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(FilterValue::into_value).collect())
    }
}

impl<T: DeclaredType> DeclaredType for &[T] {
    fn property_type() -> PropertyType {
        T::property_type().array()
    }
}

impl<T: FilterValue + Clone> FilterValue for &[T] {
    fn into_value(self) -> Value {
        Value::List(self.iter().cloned().map(FilterValue::into_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_types() {
        assert_eq!(i32::property_type(), PropertyType::scalar(ValueKind::Number));
        assert_eq!(
            Option::<String>::property_type(),
            PropertyType::scalar(ValueKind::Text).nullable()
        );
        assert_eq!(
            Vec::<&str>::property_type(),
            PropertyType::scalar(ValueKind::Text).array()
        );
        assert_eq!(format!("{}", Option::<Vec<i64>>::property_type()), "nullable number[]");
    }

    #[test]
    fn test_into_value() {
        assert_eq!(7_u8.into_value(), Value::Int(7));
        assert_eq!(None::<i32>.into_value(), Value::Null);
        assert_eq!(
            ["a", "b"].into_value(),
            Value::List(vec![Value::Text("a".into()), Value::Text("b".into())])
        );
    }

    #[test]
    fn test_coerce_text_into_typed_values() {
        assert_eq!(
            Value::Text(" 42 ".into()).coerce(ValueKind::Number),
            Some(Value::Int(42))
        );
        assert_eq!(
            Value::Text("2024-03-01".into()).coerce(ValueKind::Date),
            Some(Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
        );
        assert!(matches!(
            Value::Text("2024-03-01T10:00:00Z".into()).coerce(ValueKind::Date),
            Some(Value::DateTime(_))
        ));
        assert_eq!(
            Value::Text("TRUE".into()).coerce(ValueKind::Boolean),
            Some(Value::Bool(true))
        );
        assert_eq!(Value::Text("nope".into()).coerce(ValueKind::Uuid), None);
    }

    #[test]
    fn test_coerce_rejects_mismatches() {
        assert_eq!(Value::Int(1).coerce(ValueKind::Text), None);
        assert_eq!(Value::Bool(true).coerce(ValueKind::Number), None);
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Text("x".into())]).coerce(ValueKind::Number),
            None
        );
    }

    #[test]
    fn test_kind_of_list_uses_first_element() {
        let list = Value::List(vec![Value::Null, Value::Text("a".into())]);
        assert_eq!(list.kind(), Some(ValueKind::Text));
        assert_eq!(Value::List(Vec::new()).kind(), None);
    }

    #[test]
    fn test_json_conversion() {
        let value: Value = serde_json::from_str(r#"[1, 2.5, "x", true, null]"#).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::Text("x".into()),
                Value::Bool(true),
                Value::Null,
            ])
        );
        assert!(serde_json::from_str::<Value>(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_serialize_typed_values_as_strings() {
        let id = Uuid::nil();
        assert_eq!(
            serde_json::to_string(&Value::Uuid(id)).unwrap(),
            format!("\"{id}\"")
        );
        assert_eq!(
            serde_json::to_string(&Value::Decimal(Decimal::new(150, 2))).unwrap(),
            "\"1.50\""
        );
    }
}
