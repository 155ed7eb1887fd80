use serde::{Deserialize, Serialize};

use super::operation::{Operation, OperationLogical};
use super::statement::FilterStatement;
use crate::errors::FilterError;
use crate::value::{DeclaredType, FilterValue};

/// An ordered list of [`FilterStatement`]s.
///
/// Each statement's [`OperationLogical`] decides how the *next* statement is
/// merged into the running expression:
///
/// ```
/// use crudfilter::{Filter, OperationLogical::{And, Or}};
///
/// let mut filter = Filter::new();
/// filter
///     .equal("name", "Alice", Or)?
///     .between("age", 18, 30, And)?;
/// assert_eq!(filter.len(), 2);
/// # Ok::<(), crudfilter::FilterError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    statements: Vec<FilterStatement>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a typed statement. Every helper below funnels through here.
    ///
    /// # Errors
    ///
    /// Returns the construction error of [`FilterStatement::new`].
    pub fn by<T: FilterValue>(
        &mut self,
        property: &str,
        operation: Operation,
        value: Option<T>,
        value2: Option<T>,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        let statement = FilterStatement::new(property, operation, value, value2, logical)?;
        self.statements.push(statement);
        Ok(self)
    }

    fn by_null_check<T: DeclaredType + ?Sized>(
        &mut self,
        property: &str,
        operation: Operation,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        let statement = FilterStatement::without_value::<T>(property, operation, logical)?;
        self.statements.push(statement);
        Ok(self)
    }

    /// Appends an already built statement after re-validating it.
    ///
    /// # Errors
    ///
    /// See [`FilterStatement::validate`].
    pub fn push(&mut self, statement: FilterStatement) -> Result<&mut Self, FilterError> {
        statement.validate()?;
        self.statements.push(statement);
        Ok(self)
    }

    pub fn equal<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::Equal, Some(value), None, logical)
    }

    pub fn not_equal<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::NotEqual, Some(value), None, logical)
    }

    /// Substring test for a scalar value, membership test for an array value.
    pub fn contains<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::Contains, Some(value), None, logical)
    }

    pub fn starts_with<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::StartsWith, Some(value), None, logical)
    }

    pub fn ends_with<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::EndsWith, Some(value), None, logical)
    }

    pub fn greater_than<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::GreaterThan, Some(value), None, logical)
    }

    pub fn greater_than_or_equal_to<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(
            property,
            Operation::GreaterThanOrEqualTo,
            Some(value),
            None,
            logical,
        )
    }

    pub fn less_than<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::LessThan, Some(value), None, logical)
    }

    pub fn less_than_or_equal_to<T: FilterValue>(
        &mut self,
        property: &str,
        value: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(
            property,
            Operation::LessThanOrEqualTo,
            Some(value),
            None,
            logical,
        )
    }

    /// Inclusive range.
    pub fn between<T: FilterValue>(
        &mut self,
        property: &str,
        low: T,
        high: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::Between, Some(low), Some(high), logical)
    }

    /// Membership test when `values` is an array, substring test otherwise.
    pub fn is_in<T: FilterValue>(
        &mut self,
        property: &str,
        values: T,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by(property, Operation::In, Some(values), None, logical)
    }

    /// `T` is the declared type of the property, e.g.
    /// `filter.is_null::<Option<String>>("nickname", And)`.
    pub fn is_null<T: DeclaredType + ?Sized>(
        &mut self,
        property: &str,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by_null_check::<T>(property, Operation::IsNull, logical)
    }

    pub fn is_not_null<T: DeclaredType + ?Sized>(
        &mut self,
        property: &str,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by_null_check::<T>(property, Operation::IsNotNull, logical)
    }

    pub fn is_empty_value<T: DeclaredType + ?Sized>(
        &mut self,
        property: &str,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by_null_check::<T>(property, Operation::IsEmpty, logical)
    }

    pub fn is_not_empty<T: DeclaredType + ?Sized>(
        &mut self,
        property: &str,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by_null_check::<T>(property, Operation::IsNotEmpty, logical)
    }

    pub fn is_null_or_white_space<T: DeclaredType + ?Sized>(
        &mut self,
        property: &str,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by_null_check::<T>(property, Operation::IsNullOrWhiteSpace, logical)
    }

    pub fn is_not_null_nor_white_space<T: DeclaredType + ?Sized>(
        &mut self,
        property: &str,
        logical: OperationLogical,
    ) -> Result<&mut Self, FilterError> {
        self.by_null_check::<T>(property, Operation::IsNotNullNorWhiteSpace, logical)
    }

    #[must_use]
    pub fn statements(&self) -> &[FilterStatement] {
        &self.statements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the filter has no statements. Not to be confused with
    /// [`Filter::is_empty_value`], which appends an `IsEmpty` statement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterStatement> {
        self.statements.iter()
    }
}

impl<'a> IntoIterator for &'a Filter {
    type Item = &'a FilterStatement;
    type IntoIter = std::slice::Iter<'a, FilterStatement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

impl FromIterator<FilterStatement> for Filter {
    fn from_iter<I: IntoIterator<Item = FilterStatement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}
