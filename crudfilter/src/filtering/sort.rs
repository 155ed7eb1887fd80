use sea_orm::sea_query::Order;
use std::cmp::Ordering;

use super::compare::{compare_scalars, normalize};
use super::path::{PropertyPath, Walk, parse_property, resolve, walk};
use crate::errors::FilterError;
use crate::models::FilterOptions;
use crate::record::{FieldKind, FieldRef, Filterable, Record, ScalarRef};
use crate::value::Value;

const DEFAULT_SORT_ORDER: &str = "ASC";

/// Parse sort property and order from JSON array format
fn parse_json_sort(json: &str, default_property: &str) -> (String, String) {
    let sort_vec: Vec<String> = serde_json::from_str(json).unwrap_or_default();
    (
        sort_vec
            .first()
            .cloned()
            .unwrap_or_else(|| default_property.to_string()),
        sort_vec
            .get(1)
            .cloned()
            .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string()),
    )
}

/// Convert sort order string to Order enum
fn parse_order(sort_order: &str) -> Order {
    if sort_order.eq_ignore_ascii_case("ASC") {
        Order::Asc
    } else {
        Order::Desc
    }
}

/// Parse sorting from `FilterOptions`, supporting both React Admin and standard REST formats.
///
/// The property may be dotted (`address.city`). A property that does not
/// resolve to a scalar member of `T` falls back to `default_property`.
pub fn parse_sorting<T: Filterable>(
    params: &FilterOptions,
    default_property: &str,
) -> (String, Order) {
    let order_or_default = || {
        params
            .order
            .as_deref()
            .unwrap_or(DEFAULT_SORT_ORDER)
            .to_string()
    };

    let (sort_property, sort_order) = if let Some(sort_by) = &params.sort_by {
        // Standard REST format: sort_by=column&order=ASC/DESC
        (sort_by.clone(), order_or_default())
    } else if let Some(sort) = &params.sort {
        if sort.trim_start().starts_with('[') {
            // React Admin format: sort=["column", "ASC"]
            parse_json_sort(sort, default_property)
        } else {
            (sort.clone(), order_or_default())
        }
    } else {
        (default_property.to_string(), DEFAULT_SORT_ORDER.to_string())
    };

    let property = if sortable_segments::<T>(&sort_property).is_ok() {
        sort_property
    } else {
        tracing::debug!(
            property = %sort_property,
            fallback = default_property,
            "unknown sort property"
        );
        default_property.to_string()
    };

    (property, parse_order(&sort_order))
}

fn sortable_segments<T: Filterable>(property: &str) -> Result<Vec<&'static str>, FilterError> {
    let PropertyPath::Member(segments) = parse_property(property)? else {
        return Err(FilterError::Unsupported(format!(
            "cannot sort by the collection path '{property}'"
        )));
    };
    let resolved = resolve(T::member, &segments, property)?;
    match resolved.leaf.kind {
        FieldKind::Scalar(_) => Ok(resolved.segments),
        _ => Err(FilterError::Unsupported(format!(
            "cannot sort by the non-scalar member '{property}'"
        ))),
    }
}

/// Stable in-memory sort of `records` by a (possibly dotted) scalar member.
/// Null values, including those behind a null parent, sort first ascending.
///
/// # Errors
///
/// Returns an error if `property` does not resolve to a scalar member of `T`.
pub fn sort_records<T: Filterable>(
    records: &mut [&T],
    property: &str,
    order: &Order,
) -> Result<(), FilterError> {
    let segments = sortable_segments::<T>(property)?;
    let descending = matches!(order, Order::Desc);

    records.sort_by(|a, b| {
        let ordering = compare_fields(&read(*a, &segments), &read(*b, &segments));
        if descending { ordering.reverse() } else { ordering }
    });
    Ok(())
}

fn read<'a>(record: &'a dyn Record, segments: &[&'static str]) -> FieldRef<'a> {
    match walk(record, segments) {
        Walk::Leaf(value) => value,
        Walk::ParentNull => FieldRef::Null,
    }
}

fn compare_fields(a: &FieldRef<'_>, b: &FieldRef<'_>) -> Ordering {
    match (a, b) {
        (FieldRef::Scalar(ScalarRef::Text(a)), FieldRef::Scalar(ScalarRef::Text(b))) => {
            normalize(a).cmp(&normalize(b))
        }
        (FieldRef::Scalar(a), FieldRef::Scalar(b)) => {
            compare_scalars(a, &scalar_value(b)).unwrap_or(Ordering::Equal)
        }
        (FieldRef::Null, FieldRef::Null) => Ordering::Equal,
        (FieldRef::Null, _) => Ordering::Less,
        (_, FieldRef::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn scalar_value(scalar: &ScalarRef<'_>) -> Value {
    match *scalar {
        ScalarRef::Bool(b) => Value::Bool(b),
        ScalarRef::Int(i) => Value::Int(i),
        ScalarRef::Float(f) => Value::Float(f),
        ScalarRef::Decimal(d) => Value::Decimal(d),
        ScalarRef::Text(s) => Value::Text(s.to_string()),
        ScalarRef::DateTime(dt) => Value::DateTime(dt),
        ScalarRef::Date(d) => Value::Date(d),
        ScalarRef::Uuid(u) => Value::Uuid(u),
    }
}
