//! Parsing of the `filter` query parameter into a [`Filter`].
//!
//! Two payloads are accepted:
//!
//! - a JSON array of serialized statements, for clients that build filters
//!   explicitly:
//!   ```json
//!   [{"property": "address.city", "operation": "Equal", "value": "Paris", "logical": "And"}]
//!   ```
//! - a React Admin style JSON object, one condition per key:
//!   ```json
//!   {"q": "ada", "age_gte": 18, "status": ["active", "pending"], "deleted_at": null}
//!   ```
//!   Keys may carry a `_gte`, `_lte`, `_gt`, `_lt`, `_neq` or `_like` suffix.
//!   A bare key means equality, or membership when the value is an array, or
//!   a null check when the value is `null`. `q` searches every searchable
//!   property with `Contains`.

use super::filter::Filter;
use super::operation::{Operation, OperationLogical};
use super::statement::FilterStatement;
use crate::config::FilterLimits;
use crate::errors::FilterError;
use crate::value::Value;

const SEARCH_KEY: &str = "q";

/// Basic field name validation
fn is_valid_field_name(field_name: &str, limits: &FilterLimits) -> bool {
    !field_name.is_empty()
        && field_name.len() <= limits.max_property_length
        && !field_name.starts_with('_')
        && !field_name.contains("..")
}

/// Parse React Admin comparison operator suffixes.
/// Returns (`base_field_name`, `operation`); keys without a suffix are `None`.
fn parse_comparison_operator(field_name: &str) -> Option<(&str, Operation)> {
    [
        ("_gte", Operation::GreaterThanOrEqualTo),
        ("_lte", Operation::LessThanOrEqualTo),
        ("_gt", Operation::GreaterThan),
        ("_lt", Operation::LessThan),
        ("_neq", Operation::NotEqual),
        ("_like", Operation::Contains),
    ]
    .into_iter()
    .find_map(|(suffix, operation)| {
        field_name
            .strip_suffix(suffix)
            .filter(|base| !base.is_empty())
            .map(|base| (base, operation))
    })
}

/// Parses the `filter` query parameter.
///
/// `searchable` lists the properties the free-text `q` key searches. A
/// missing or blank parameter is an empty filter. In object form, keys that
/// are invalid or whose values are too long are skipped with a warning.
///
/// # Errors
///
/// Returns [`FilterError::InvalidFilter`] if the parameter is not a JSON
/// array or object, and the validation error of the first invalid statement
/// of an array payload.
pub fn parse_filter(
    filter: Option<&str>,
    searchable: &[&str],
    limits: &FilterLimits,
) -> Result<Filter, FilterError> {
    let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(Filter::new());
    };

    let json: serde_json::Value =
        serde_json::from_str(filter).map_err(|e| FilterError::InvalidFilter(e.to_string()))?;

    match json {
        serde_json::Value::Array(_) => parse_statements(json),
        serde_json::Value::Object(map) => Ok(parse_object(map, searchable, limits)),
        other => Err(FilterError::InvalidFilter(format!(
            "expected a JSON array or object, got {other}"
        ))),
    }
}

fn parse_statements(json: serde_json::Value) -> Result<Filter, FilterError> {
    let statements: Vec<FilterStatement> =
        serde_json::from_value(json).map_err(|e| FilterError::InvalidFilter(e.to_string()))?;

    let mut filter = Filter::new();
    for statement in statements {
        filter.push(statement)?;
    }
    Ok(filter)
}

fn parse_object(
    map: serde_json::Map<String, serde_json::Value>,
    searchable: &[&str],
    limits: &FilterLimits,
) -> Filter {
    let mut filter = Filter::new();

    // The search group goes first so the fold closes it before the And-joined keys.
    if let Some(query) = map.get(SEARCH_KEY) {
        push_search(&mut filter, query, searchable, limits);
    }

    for (key, value) in map {
        if key == SEARCH_KEY {
            continue;
        }
        if !is_valid_field_name(&key, limits) {
            tracing::warn!(field = %key, "skipping filter on invalid field name");
            continue;
        }

        let value = match Value::try_from(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(field = %key, error = %e, "skipping filter with unsupported value");
                continue;
            }
        };
        if let Err(e) = limits.check_value(&value) {
            tracing::warn!(field = %key, error = %e, "skipping filter value");
            continue;
        }

        let (property, operation) = match parse_comparison_operator(&key) {
            Some((base, operation)) => (base, operation),
            None if value.is_null() => (key.as_str(), Operation::IsNull),
            None if value.as_list().is_some() => (key.as_str(), Operation::In),
            None => (key.as_str(), Operation::Equal),
        };
        let value = (operation != Operation::IsNull).then_some(value);

        let statement = FilterStatement::untyped(
            property,
            operation,
            value,
            None,
            OperationLogical::And,
        )
        .and_then(|statement| filter.push(statement).map(|_| ()));
        if let Err(e) = statement {
            tracing::warn!(field = %key, error = %e, "skipping invalid filter");
        }
    }

    filter
}

/// One `Contains` per searchable property, joined with `Or`. The last one
/// carries `And` so the group merges with what follows.
fn push_search(
    filter: &mut Filter,
    query: &serde_json::Value,
    searchable: &[&str],
    limits: &FilterLimits,
) {
    let Some(text) = query.as_str().map(str::trim).filter(|q| !q.is_empty()) else {
        tracing::warn!("skipping free-text search without a text value");
        return;
    };
    if text.len() > limits.max_value_length {
        tracing::warn!(length = text.len(), "skipping over-long free-text search");
        return;
    }

    for (i, property) in searchable.iter().enumerate() {
        let logical = if i + 1 == searchable.len() {
            OperationLogical::And
        } else {
            OperationLogical::Or
        };
        let statement = FilterStatement::untyped(
            *property,
            Operation::Contains,
            Some(Value::Text(text.to_string())),
            None,
            logical,
        )
        .and_then(|statement| filter.push(statement).map(|_| ()));
        if let Err(e) = statement {
            tracing::warn!(field = %property, error = %e, "skipping search property");
        }
    }
}
