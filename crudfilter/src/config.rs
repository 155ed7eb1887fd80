use serde::Deserialize;

use crate::errors::FilterError;
use crate::filtering::{Filter, FilterStatement};
use crate::value::Value;

const DEFAULT_MAX_STATEMENTS: usize = 100;
const DEFAULT_MAX_PROPERTY_LENGTH: usize = 100;
const DEFAULT_MAX_PATH_DEPTH: usize = 8;
const DEFAULT_MAX_VALUE_LENGTH: usize = 10_000;

/// Safety limits applied before a filter is compiled.
///
/// Deserializable so it can live in an application's config file:
///
/// ```json
/// { "max_statements": 20, "max_path_depth": 4 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterLimits {
    /// Maximum number of statements in one filter.
    pub max_statements: usize,
    /// Maximum length of a property path, in bytes.
    pub max_property_length: usize,
    /// Maximum number of segments in a property path, indexers included.
    pub max_path_depth: usize,
    /// Maximum length of a text operand, in bytes.
    pub max_value_length: usize,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_statements: DEFAULT_MAX_STATEMENTS,
            max_property_length: DEFAULT_MAX_PROPERTY_LENGTH,
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
        }
    }
}

impl FilterLimits {
    pub fn check_filter(&self, filter: &Filter) -> Result<(), FilterError> {
        exceeds("statements", filter.len(), self.max_statements)?;
        filter
            .iter()
            .try_for_each(|statement| self.check_statement(statement))
    }

    pub fn check_statement(&self, statement: &FilterStatement) -> Result<(), FilterError> {
        self.check_property(statement.property())?;
        [statement.value(), statement.value2()]
            .into_iter()
            .flatten()
            .try_for_each(|value| self.check_value(value))
    }

    pub fn check_property(&self, property: &str) -> Result<(), FilterError> {
        exceeds("property length", property.len(), self.max_property_length)?;
        let depth = property.split(['.', '[']).count();
        exceeds("path depth", depth, self.max_path_depth)
    }

    pub fn check_value(&self, value: &Value) -> Result<(), FilterError> {
        match value {
            Value::Text(s) => exceeds("value length", s.len(), self.max_value_length),
            Value::List(items) => items.iter().try_for_each(|item| self.check_value(item)),
            _ => Ok(()),
        }
    }
}

fn exceeds(limit: &'static str, value: usize, max: usize) -> Result<(), FilterError> {
    if value > max {
        return Err(FilterError::LimitExceeded { limit, value, max });
    }
    Ok(())
}
