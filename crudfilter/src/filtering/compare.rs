use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::cmp::Ordering;

use crate::record::ScalarRef;
use crate::value::Value;

/// Projection applied to both sides of every text comparison.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Orders a member value against an operand of the same category.
///
/// Numbers compare by value across `i64`, `f64` and `Decimal`; a `NaiveDate`
/// compares as midnight UTC against a `DateTime<Utc>`. Returns `None` when
/// the two are not comparable (different categories, `NaN`, null operand).
pub(crate) fn compare_scalars(member: &ScalarRef<'_>, operand: &Value) -> Option<Ordering> {
    match (member, operand) {
        (ScalarRef::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (ScalarRef::Text(a), Value::Text(b)) => Some((*a).cmp(b.as_str())),
        (ScalarRef::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
        (ScalarRef::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (ScalarRef::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (ScalarRef::Int(_) | ScalarRef::Float(_) | ScalarRef::Decimal(_), _) => {
            compare_numbers(member_number(member)?, operand_number(operand)?)
        }
        (ScalarRef::DateTime(a), _) => operand_instant(operand).map(|b| a.cmp(&b)),
        (ScalarRef::Date(a), _) => operand_instant(operand).map(|b| midnight(*a).cmp(&b)),
        _ => None,
    }
}

/// Equality through [`compare_scalars`].
pub(crate) fn scalar_equals(member: &ScalarRef<'_>, operand: &Value) -> bool {
    compare_scalars(member, operand) == Some(Ordering::Equal)
}

#[derive(Clone, Copy)]
enum Number {
    Exact(Decimal),
    Float(f64),
}

fn member_number(member: &ScalarRef<'_>) -> Option<Number> {
    match member {
        ScalarRef::Int(i) => Some(Number::Exact(Decimal::from(*i))),
        ScalarRef::Decimal(d) => Some(Number::Exact(*d)),
        ScalarRef::Float(f) => Some(Number::Float(*f)),
        _ => None,
    }
}

fn operand_number(operand: &Value) -> Option<Number> {
    match operand {
        Value::Int(i) => Some(Number::Exact(Decimal::from(*i))),
        Value::Decimal(d) => Some(Number::Exact(*d)),
        Value::Float(f) => Some(Number::Float(*f)),
        _ => None,
    }
}

fn compare_numbers(a: Number, b: Number) -> Option<Ordering> {
    match (a, b) {
        (Number::Exact(a), Number::Exact(b)) => Some(a.cmp(&b)),
        // Floats that do not fit a Decimal compare as floats.
        (Number::Exact(a), Number::Float(b)) => match Decimal::from_f64_retain(b) {
            Some(b) => Some(a.cmp(&b)),
            None => a.to_f64()?.partial_cmp(&b),
        },
        (Number::Float(a), Number::Exact(b)) => {
            compare_numbers(Number::Exact(b), Number::Float(a)).map(Ordering::reverse)
        }
        (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
    }
}

fn operand_instant(operand: &Value) -> Option<DateTime<Utc>> {
    match operand {
        Value::DateTime(dt) => Some(*dt),
        Value::Date(d) => Some(midnight(*d)),
        _ => None,
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
