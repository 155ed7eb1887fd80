use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::{PropertyType, ValueKind};

/// Comparison applied by a filter statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Equal,
    NotEqual,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    Between,
    In,
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
    IsNullOrWhiteSpace,
    IsNotNullNorWhiteSpace,
}

impl Operation {
    /// Number of operands the operation takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Between => 2,
            Self::IsNull
            | Self::IsNotNull
            | Self::IsEmpty
            | Self::IsNotEmpty
            | Self::IsNullOrWhiteSpace
            | Self::IsNotNullNorWhiteSpace => 0,
            _ => 1,
        }
    }

    /// Operations that hold when a parent of the member is null.
    #[must_use]
    pub const fn is_null_check(self) -> bool {
        matches!(self, Self::IsNull | Self::IsNullOrWhiteSpace)
    }

    /// `Contains` and `In`: substring or membership depending on the operand.
    #[must_use]
    pub const fn is_membership(self) -> bool {
        matches!(self, Self::Contains | Self::In)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a statement joins the statement that follows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationLogical {
    #[default]
    And,
    Or,
}

const TEXT_OPERATIONS: &[Operation] = &[
    Operation::Equal,
    Operation::NotEqual,
    Operation::Contains,
    Operation::StartsWith,
    Operation::EndsWith,
    Operation::GreaterThan,
    Operation::GreaterThanOrEqualTo,
    Operation::LessThan,
    Operation::LessThanOrEqualTo,
    Operation::Between,
    Operation::In,
    Operation::IsNull,
    Operation::IsNotNull,
    Operation::IsEmpty,
    Operation::IsNotEmpty,
    Operation::IsNullOrWhiteSpace,
    Operation::IsNotNullNorWhiteSpace,
];

// Numbers and dates share a table.
const ORDERED_OPERATIONS: &[Operation] = &[
    Operation::Equal,
    Operation::NotEqual,
    Operation::GreaterThan,
    Operation::GreaterThanOrEqualTo,
    Operation::LessThan,
    Operation::LessThanOrEqualTo,
    Operation::Between,
    Operation::In,
    Operation::Contains,
];

const BOOLEAN_OPERATIONS: &[Operation] = &[Operation::Equal, Operation::NotEqual];

const UUID_OPERATIONS: &[Operation] = &[
    Operation::Equal,
    Operation::NotEqual,
    Operation::In,
    Operation::Contains,
];

const RECORD_OPERATIONS: &[Operation] = &[Operation::IsNull, Operation::IsNotNull];

const NULLABLE_OPERATIONS: &[Operation] = &[Operation::IsNull, Operation::IsNotNull];

/// Operations allowed for a non-nullable scalar of `kind`.
#[must_use]
pub const fn supported_operations(kind: ValueKind) -> &'static [Operation] {
    match kind {
        ValueKind::Text => TEXT_OPERATIONS,
        ValueKind::Number | ValueKind::Date => ORDERED_OPERATIONS,
        ValueKind::Boolean => BOOLEAN_OPERATIONS,
        ValueKind::Uuid => UUID_OPERATIONS,
        ValueKind::Record => RECORD_OPERATIONS,
    }
}

impl PropertyType {
    /// Whether `operation` is allowed for this declared type.
    #[must_use]
    pub fn supports(self, operation: Operation) -> bool {
        if self.array {
            return operation.is_membership();
        }
        supported_operations(self.kind).contains(&operation)
            || (self.nullable && NULLABLE_OPERATIONS.contains(&operation))
    }
}
