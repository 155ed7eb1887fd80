//! Compilation of a [`Filter`] into a [`Predicate`].
//!
//! Every statement is resolved against the record metadata once, its operands
//! are coerced to the member type once, and the result is a tree of closures
//! that only reads fields when evaluated.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::compare::{compare_scalars, normalize, scalar_equals};
use super::filter::Filter;
use super::operation::{Operation, OperationLogical};
use super::path::{PropertyPath, Walk, parse_property, resolve, walk};
use super::statement::{FilterStatement, check_operation};
use crate::config::FilterLimits;
use crate::errors::FilterError;
use crate::record::{
    FieldKind, FieldMeta, FieldRef, Filterable, MemberLookup, Record, ScalarRef,
};
use crate::value::{Value, ValueKind};

type Expression = Arc<dyn Fn(&dyn Record) -> bool + Send + Sync>;
type Leaf = Box<dyn Fn(&FieldRef<'_>) -> bool + Send + Sync>;

/// Compiles filters into predicates.
///
/// Holds nothing but its [`FilterLimits`], so one builder can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    limits: FilterLimits,
}

impl FilterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_limits(limits: FilterLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub const fn limits(&self) -> &FilterLimits {
        &self.limits
    }

    /// Compiles `filter` into a predicate over `T`.
    ///
    /// Statements are folded left to right: the running expression is merged
    /// with each new statement using the *previous* statement's logical.
    /// An empty filter matches everything.
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is exceeded, a statement is invalid, a
    /// path does not resolve against `T`, an operation is not allowed for the
    /// resolved member or an operand cannot be compared with it.
    pub fn get_expression<T: Filterable>(
        &self,
        filter: &Filter,
    ) -> Result<Predicate<T>, FilterError> {
        self.limits.check_filter(filter)?;

        let mut expression: Option<Expression> = None;
        let mut logical = OperationLogical::And;

        for statement in filter {
            statement.validate()?;
            tracing::trace!(
                property = statement.property(),
                operation = %statement.operation(),
                "compiling filter statement"
            );

            let current = compile_statement(T::member, statement)?;
            expression = Some(match expression {
                None => current,
                Some(previous) => merge(previous, current, logical),
            });
            logical = statement.logical();
        }

        tracing::debug!(
            record = type_name::<T>(),
            statements = filter.len(),
            "compiled filter expression"
        );

        Ok(Predicate {
            expression: expression.unwrap_or_else(|| Arc::new(|_: &dyn Record| true)),
            statements: filter.len(),
            _record: PhantomData,
        })
    }
}

fn merge(left: Expression, right: Expression, logical: OperationLogical) -> Expression {
    match logical {
        OperationLogical::And => {
            Arc::new(move |record: &dyn Record| left(record) && right(record))
        }
        OperationLogical::Or => {
            Arc::new(move |record: &dyn Record| left(record) || right(record))
        }
    }
}

fn compile_statement(
    lookup: MemberLookup,
    statement: &FilterStatement,
) -> Result<Expression, FilterError> {
    match parse_property(statement.property())? {
        PropertyPath::Quantified { collection, inner } => {
            compile_quantified(lookup, statement, &collection, inner)
        }
        PropertyPath::Member(segments) => compile_member(lookup, statement, &segments),
    }
}

/// `collection[inner]`: true when any element satisfies `inner`. A null
/// collection, or a null record on the way to it, has no elements.
fn compile_quantified(
    lookup: MemberLookup,
    statement: &FilterStatement,
    collection: &[&str],
    inner: &str,
) -> Result<Expression, FilterError> {
    let path = statement.property();
    let resolved = resolve(lookup, collection, path)?;
    let element = match &resolved.leaf.kind {
        FieldKind::Collection(element) => match element.as_ref() {
            FieldKind::Object(element) => *element,
            _ => return Err(not_a_collection(&resolved.segments)),
        },
        _ => return Err(not_a_collection(&resolved.segments)),
    };

    let inner = compile_statement(element, &statement.with_property(inner))?;
    let segments = resolved.segments;
    Ok(Arc::new(move |record: &dyn Record| match walk(record, &segments) {
        Walk::Leaf(FieldRef::Collection(items)) => items
            .iter()
            .any(|item| matches!(item, FieldRef::Object(element) if inner(*element))),
        _ => false,
    }))
}

fn not_a_collection(segments: &[&str]) -> FilterError {
    FilterError::NotACollection {
        path: segments.join("."),
    }
}

fn compile_member(
    lookup: MemberLookup,
    statement: &FilterStatement,
    segments: &[&str],
) -> Result<Expression, FilterError> {
    let resolved = resolve(lookup, segments, statement.property())?;
    check_operation(statement.operation(), resolved.leaf.property_type())?;

    let leaf = compile_leaf(&resolved.leaf, statement)?;
    let on_parent_null = statement.operation().is_null_check();
    let segments = resolved.segments;
    Ok(Arc::new(move |record: &dyn Record| match walk(record, &segments) {
        Walk::ParentNull => on_parent_null,
        Walk::Leaf(value) => leaf(&value),
    }))
}

fn compile_leaf(meta: &FieldMeta, statement: &FilterStatement) -> Result<Leaf, FilterError> {
    let operation = statement.operation();
    match &meta.kind {
        FieldKind::Object(_) => Ok(null_check(operation)),
        FieldKind::Collection(element) => match element.as_ref() {
            FieldKind::Scalar(kind) => compile_collection(*kind, statement),
            _ => Err(FilterError::TypeMismatch {
                property: statement.property().to_string(),
                expected: "an indexer such as 'name[member]'".to_string(),
                found: operand_name(statement.value()),
            }),
        },
        FieldKind::Scalar(ValueKind::Text) => compile_text(statement),
        FieldKind::Scalar(kind) => compile_scalar(*kind, statement),
    }
}

fn null_check(operation: Operation) -> Leaf {
    if operation == Operation::IsNull {
        Box::new(|value: &FieldRef<'_>| value.is_null())
    } else {
        Box::new(|value: &FieldRef<'_>| !value.is_null())
    }
}

/// Operand coerced to `kind`, with text lowered and trimmed.
pub(super) fn operand(
    kind: ValueKind,
    value: Option<&Value>,
    statement: &FilterStatement,
) -> Result<Value, FilterError> {
    let Some(value) = value else {
        return Err(FilterError::MissingValue {
            operation: statement.operation(),
            expected: statement.operation().arity(),
        });
    };
    let coerced = value.coerce(kind).ok_or_else(|| FilterError::TypeMismatch {
        property: statement.property().to_string(),
        expected: kind.to_string(),
        found: value.type_name().to_string(),
    })?;
    Ok(normalize_text(coerced))
}

fn normalize_text(value: Value) -> Value {
    match value {
        Value::Text(text) => Value::Text(normalize(&text)),
        Value::List(items) => Value::List(items.into_iter().map(normalize_text).collect()),
        other => other,
    }
}

fn operand_name(value: Option<&Value>) -> String {
    value.map_or("no value", Value::type_name).to_string()
}

fn compile_text(statement: &FilterStatement) -> Result<Leaf, FilterError> {
    let operation = statement.operation();
    match operation {
        Operation::IsNull | Operation::IsNotNull => return Ok(null_check(operation)),
        Operation::IsNullOrWhiteSpace => return Ok(Box::new(is_null_or_white_space)),
        Operation::IsNotNullNorWhiteSpace => {
            return Ok(Box::new(|value: &FieldRef<'_>| !is_null_or_white_space(value)));
        }
        Operation::IsEmpty => return Ok(text_leaf(String::is_empty)),
        Operation::IsNotEmpty => return Ok(text_leaf(|text: &String| !text.is_empty())),
        _ => {}
    }

    if let Some(leaf) = compile_null_operand(statement) {
        return Ok(leaf);
    }

    let first = operand(ValueKind::Text, statement.value(), statement)?;
    if let Value::List(candidates) = first {
        if !operation.is_membership() {
            return Err(list_operand(statement));
        }
        let candidates: Vec<String> = candidates.into_iter().filter_map(into_text).collect();
        return Ok(text_leaf(move |text| candidates.contains(text)));
    }
    let constant = into_text(first).unwrap_or_default();

    Ok(match operation {
        Operation::Equal => text_leaf(move |text| *text == constant),
        Operation::NotEqual => text_leaf(move |text| *text != constant),
        Operation::Contains | Operation::In => {
            text_leaf(move |text| text.contains(constant.as_str()))
        }
        Operation::StartsWith => text_leaf(move |text| text.starts_with(constant.as_str())),
        Operation::EndsWith => text_leaf(move |text| text.ends_with(constant.as_str())),
        Operation::GreaterThan => text_leaf(move |text| *text > constant),
        Operation::GreaterThanOrEqualTo => text_leaf(move |text| *text >= constant),
        Operation::LessThan => text_leaf(move |text| *text < constant),
        Operation::LessThanOrEqualTo => text_leaf(move |text| *text <= constant),
        Operation::Between => {
            let high = operand(ValueKind::Text, statement.value2(), statement)?;
            let high = into_text(high).ok_or_else(|| list_operand(statement))?;
            text_leaf(move |text| *text >= constant && *text <= high)
        }
        _ => return Err(unsupported_operation(statement, "text")),
    })
}

fn into_text(value: Value) -> Option<String> {
    match value {
        Value::Text(text) => Some(text),
        _ => None,
    }
}

/// Leaf that requires a non-null text member and tests its projection.
fn text_leaf<F>(test: F) -> Leaf
where
    F: Fn(&String) -> bool + Send + Sync + 'static,
{
    Box::new(move |value: &FieldRef<'_>| match value {
        FieldRef::Scalar(ScalarRef::Text(text)) => test(&normalize(text)),
        _ => false,
    })
}

fn is_null_or_white_space(value: &FieldRef<'_>) -> bool {
    match value {
        FieldRef::Scalar(ScalarRef::Text(text)) => text.trim().is_empty(),
        _ => value.is_null(),
    }
}

/// `Equal`/`NotEqual` against a null constant test absence/presence.
fn compile_null_operand(statement: &FilterStatement) -> Option<Leaf> {
    if !statement.value().is_some_and(Value::is_null) {
        return None;
    }
    match statement.operation() {
        Operation::Equal => Some(null_check(Operation::IsNull)),
        Operation::NotEqual => Some(null_check(Operation::IsNotNull)),
        _ => None,
    }
}

fn compile_scalar(kind: ValueKind, statement: &FilterStatement) -> Result<Leaf, FilterError> {
    let operation = statement.operation();
    if matches!(operation, Operation::IsNull | Operation::IsNotNull) {
        return Ok(null_check(operation));
    }
    if let Some(leaf) = compile_null_operand(statement) {
        return Ok(leaf);
    }

    let first = operand(kind, statement.value(), statement)?;
    if let Value::List(candidates) = first {
        if !operation.is_membership() {
            return Err(list_operand(statement));
        }
        return Ok(scalar_leaf(move |scalar| {
            candidates.iter().any(|candidate| scalar_equals(scalar, candidate))
        }));
    }

    Ok(match operation {
        Operation::Equal => scalar_leaf(move |scalar| scalar_equals(scalar, &first)),
        // Absent values fail every comparison, NotEqual included.
        Operation::NotEqual => scalar_leaf(move |scalar| !scalar_equals(scalar, &first)),
        Operation::GreaterThan => ordered_leaf(first, |ordering| ordering.is_gt()),
        Operation::GreaterThanOrEqualTo => ordered_leaf(first, |ordering| ordering.is_ge()),
        Operation::LessThan => ordered_leaf(first, |ordering| ordering.is_lt()),
        Operation::LessThanOrEqualTo => ordered_leaf(first, |ordering| ordering.is_le()),
        Operation::Between => {
            let high = operand(kind, statement.value2(), statement)?;
            scalar_leaf(move |scalar| {
                compare_scalars(scalar, &first).is_some_and(|ordering| ordering.is_ge())
                    && compare_scalars(scalar, &high).is_some_and(|ordering| ordering.is_le())
            })
        }
        Operation::Contains | Operation::In => {
            return Err(FilterError::TypeMismatch {
                property: statement.property().to_string(),
                expected: format!("a list of {kind} values"),
                found: first.type_name().to_string(),
            });
        }
        _ => return Err(unsupported_operation(statement, &kind.to_string())),
    })
}

/// Leaf that requires a non-null scalar member.
fn scalar_leaf<F>(test: F) -> Leaf
where
    F: Fn(&ScalarRef<'_>) -> bool + Send + Sync + 'static,
{
    Box::new(move |value: &FieldRef<'_>| match value {
        FieldRef::Scalar(scalar) => test(scalar),
        _ => false,
    })
}

fn ordered_leaf<F>(operand: Value, accept: F) -> Leaf
where
    F: Fn(std::cmp::Ordering) -> bool + Send + Sync + 'static,
{
    scalar_leaf(move |scalar| compare_scalars(scalar, &operand).is_some_and(&accept))
}

/// `Contains`/`In` on a collection of scalars: membership of a single operand,
/// or overlap with a list of candidates.
fn compile_collection(kind: ValueKind, statement: &FilterStatement) -> Result<Leaf, FilterError> {
    let candidates = match operand(kind, statement.value(), statement)? {
        Value::List(candidates) => candidates,
        single => vec![single],
    };

    let matches_element = move |element: &FieldRef<'_>| match element {
        FieldRef::Scalar(ScalarRef::Text(text)) => {
            let text = normalize(text);
            candidates
                .iter()
                .any(|candidate| matches!(candidate, Value::Text(c) if *c == text))
        }
        FieldRef::Scalar(scalar) => candidates
            .iter()
            .any(|candidate| scalar_equals(scalar, candidate)),
        _ => false,
    };

    Ok(Box::new(move |value: &FieldRef<'_>| match value {
        FieldRef::Collection(elements) => elements.iter().any(&matches_element),
        _ => false,
    }))
}

fn list_operand(statement: &FilterStatement) -> FilterError {
    FilterError::TypeMismatch {
        property: statement.property().to_string(),
        expected: "a single value".to_string(),
        found: "list".to_string(),
    }
}

fn unsupported_operation(statement: &FilterStatement, property_type: &str) -> FilterError {
    FilterError::InvalidOperation {
        operation: statement.operation(),
        property_type: property_type.to_string(),
    }
}

/// A compiled filter over `T`.
pub struct Predicate<T> {
    expression: Expression,
    statements: usize,
    _record: PhantomData<fn(&T) -> bool>,
}

impl<T: Record> Predicate<T> {
    #[must_use]
    pub fn matches(&self, record: &T) -> bool {
        (self.expression)(record)
    }

    /// The predicate as an owned closure, e.g. for `Iterator::filter`.
    #[must_use]
    pub fn as_fn(&self) -> impl Fn(&T) -> bool + Clone + Send + Sync + use<T> {
        let expression = Arc::clone(&self.expression);
        move |record: &T| expression(record)
    }

    #[must_use]
    pub fn filter_slice<'a>(&self, records: &'a [T]) -> Vec<&'a T> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            expression: Arc::clone(&self.expression),
            statements: self.statements,
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("record", &type_name::<T>())
            .field("statements", &self.statements)
            .finish_non_exhaustive()
    }
}
