use serde::{Deserialize, Deserializer, Serialize};

use super::operation::{Operation, OperationLogical};
use crate::errors::FilterError;
use crate::value::{DeclaredType, FilterValue, PropertyType, Value};

/// One filter condition: a property path, an operation, up to two operands
/// and the logical used to join the *next* statement.
///
/// Statements built through [`FilterStatement::new`] are validated against
/// their declared type immediately. Deserialized statements carry no declared
/// type; [`FilterStatement::validate`] checks what can be checked from the
/// operands, and the compiler re-checks against the resolved member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStatement {
    property: String,
    operation: Operation,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    value2: Option<Value>,
    #[serde(default)]
    logical: OperationLogical,
    #[serde(skip)]
    property_type: Option<PropertyType>,
}

impl FilterStatement {
    /// Builds a statement whose property is declared as `T`.
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidArgument`] if `property` is blank
    /// - [`FilterError::InvalidArrayUsage`] if `T` is an array and the
    ///   operation is not `Contains`/`In`
    /// - [`FilterError::InvalidOperation`] if `T` does not support the operation
    /// - [`FilterError::MissingValue`] if the operation's operands are missing
    pub fn new<T: FilterValue>(
        property: impl Into<String>,
        operation: Operation,
        value: Option<T>,
        value2: Option<T>,
        logical: OperationLogical,
    ) -> Result<Self, FilterError> {
        Self::typed(
            property.into(),
            operation,
            T::property_type(),
            value.map(FilterValue::into_value),
            value2.map(FilterValue::into_value),
            logical,
        )
    }

    /// Builds an operand-less statement (`IsNull`, `IsEmpty`, ...) whose
    /// property is declared as `T`.
    ///
    /// # Errors
    ///
    /// Same as [`FilterStatement::new`].
    pub fn without_value<T: DeclaredType + ?Sized>(
        property: impl Into<String>,
        operation: Operation,
        logical: OperationLogical,
    ) -> Result<Self, FilterError> {
        Self::typed(
            property.into(),
            operation,
            T::property_type(),
            None,
            None,
            logical,
        )
    }

    /// Builds a statement without a declared type, as a deserialized one would be.
    ///
    /// # Errors
    ///
    /// See [`FilterStatement::validate`].
    pub fn untyped(
        property: impl Into<String>,
        operation: Operation,
        value: Option<Value>,
        value2: Option<Value>,
        logical: OperationLogical,
    ) -> Result<Self, FilterError> {
        let statement = Self {
            property: property.into(),
            operation,
            value,
            value2,
            logical,
            property_type: None,
        };
        statement.validate()?;
        Ok(statement)
    }

    fn typed(
        property: String,
        operation: Operation,
        property_type: PropertyType,
        value: Option<Value>,
        value2: Option<Value>,
        logical: OperationLogical,
    ) -> Result<Self, FilterError> {
        let statement = Self {
            property,
            operation,
            value,
            value2,
            logical,
            property_type: Some(property_type),
        };
        statement.validate()?;
        Ok(statement)
    }

    /// Checks the property, the operand count and, where a type is known or
    /// can be inferred from the operands, that the operation is allowed.
    ///
    /// # Errors
    ///
    /// See [`FilterStatement::new`].
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.property.trim().is_empty() {
            return Err(FilterError::InvalidArgument(
                "property must not be empty".to_string(),
            ));
        }

        let declared = self.property_type.or_else(|| self.inferred_type());
        if let Some(property_type) = declared {
            check_operation(self.operation, property_type)?;
        }

        self.check_arity()
    }

    fn inferred_type(&self) -> Option<PropertyType> {
        let value = self.value.as_ref()?;
        let property_type = PropertyType::scalar(value.kind()?);
        Some(if value.as_list().is_some() {
            property_type.array()
        } else {
            property_type
        })
    }

    fn check_arity(&self) -> Result<(), FilterError> {
        let missing = match self.operation.arity() {
            0 => false,
            // A null operand only means something to Equal/NotEqual (absence
            // and presence tests).
            1 => self.value.as_ref().is_none_or(|value| {
                value.is_null()
                    && !matches!(self.operation, Operation::Equal | Operation::NotEqual)
            }),
            _ => [&self.value, &self.value2]
                .iter()
                .any(|value| value.as_ref().is_none_or(Value::is_null)),
        };
        if missing {
            return Err(FilterError::MissingValue {
                operation: self.operation,
                expected: self.operation.arity(),
            });
        }
        Ok(())
    }

    /// Copy of this statement targeting another property. Used for the
    /// element half of `collection[member]` paths.
    pub(crate) fn with_property(&self, property: &str) -> Self {
        Self {
            property: property.to_string(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    #[must_use]
    pub const fn value2(&self) -> Option<&Value> {
        self.value2.as_ref()
    }

    #[must_use]
    pub const fn logical(&self) -> OperationLogical {
        self.logical
    }

    /// Declared type, if the statement was built through a typed constructor.
    #[must_use]
    pub const fn property_type(&self) -> Option<PropertyType> {
        self.property_type
    }
}

/// An explicit `null` operand is kept as [`Value::Null`]; only a missing
/// field deserializes to `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Rejects `operation` for `property_type`, distinguishing array misuse.
pub(crate) fn check_operation(
    operation: Operation,
    property_type: PropertyType,
) -> Result<(), FilterError> {
    if property_type.array && !operation.is_membership() {
        return Err(FilterError::InvalidArrayUsage { operation });
    }
    if !property_type.supports(operation) {
        return Err(FilterError::InvalidOperation {
            operation,
            property_type: property_type.to_string(),
        });
    }
    Ok(())
}
