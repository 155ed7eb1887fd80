//! Translation of a [`Filter`] into a `sea_orm` [`Condition`].
//!
//! Only members stored as columns of the queried table translate: dotted
//! paths and collection indexers would need joins and are rejected with
//! [`FilterError::Unsupported`]. Everything else keeps the in-memory
//! semantics, including the trimmed, lower-cased text projection.

use sea_orm::{
    Condition,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};

use super::builder::{FilterBuilder, operand};
use super::filter::Filter;
use super::operation::{Operation, OperationLogical};
use super::path::{PropertyPath, parse_property, resolve};
use super::statement::{FilterStatement, check_operation};
use crate::errors::FilterError;
use crate::record::{FieldKind, Filterable, MemberLookup};
use crate::value::{Value, ValueKind};

impl FilterBuilder {
    /// Translates `filter` into a SQL condition on `T`'s table.
    ///
    /// Statements are joined exactly as [`FilterBuilder::get_expression`]
    /// joins them; an empty filter yields an empty (always true) condition.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Unsupported`] for nested or quantified paths
    /// and record-valued members, and otherwise the same errors as
    /// [`FilterBuilder::get_expression`].
    pub fn get_condition<T: Filterable>(
        &self,
        filter: &Filter,
    ) -> Result<Condition, FilterError> {
        self.limits().check_filter(filter)?;

        let mut condition: Option<Condition> = None;
        let mut logical = OperationLogical::And;

        for statement in filter {
            statement.validate()?;
            let current = statement_condition(T::member, statement)?;
            condition = Some(match condition {
                None => current,
                Some(previous) => match logical {
                    OperationLogical::And => Condition::all().add(previous).add(current),
                    OperationLogical::Or => Condition::any().add(previous).add(current),
                },
            });
            logical = statement.logical();
        }

        Ok(condition.unwrap_or_else(Condition::all))
    }
}

fn statement_condition(
    lookup: MemberLookup,
    statement: &FilterStatement,
) -> Result<Condition, FilterError> {
    let property = statement.property();
    let segments = match parse_property(property)? {
        PropertyPath::Member(segments) if segments.len() == 1 => segments,
        _ => {
            return Err(FilterError::Unsupported(format!(
                "'{property}' is not a column of the queried table"
            )));
        }
    };

    let meta = resolve(lookup, &segments, property)?.leaf;
    check_operation(statement.operation(), meta.property_type())?;

    let column = Alias::new(meta.name);
    let condition = match &meta.kind {
        FieldKind::Scalar(ValueKind::Text) => text_condition(&column, statement)?,
        FieldKind::Scalar(kind) => scalar_condition(&column, *kind, statement)?,
        FieldKind::Object(_) | FieldKind::Collection(_) => {
            return Err(FilterError::Unsupported(format!(
                "'{property}' is not stored as a single column"
            )));
        }
    };

    // Nullable members must be present before they are compared.
    let compares_value = statement.operation().arity() > 0
        && !statement.value().is_some_and(Value::is_null);
    if meta.nullable && compares_value {
        return Ok(Condition::all()
            .add(Expr::col(column).is_not_null())
            .add(condition));
    }
    Ok(condition)
}

/// `LOWER(TRIM(column))`
fn projected(column: &Alias) -> Expr {
    Expr::expr(Func::lower(trimmed(column)))
}

fn trimmed(column: &Alias) -> SimpleExpr {
    Func::cust(Alias::new("TRIM"))
        .arg(Expr::col(column.clone()))
        .into()
}

fn text_condition(column: &Alias, statement: &FilterStatement) -> Result<Condition, FilterError> {
    let col = || Expr::col(column.clone());
    let operation = statement.operation();

    let single = |expr: SimpleExpr| Ok(Condition::all().add(expr));
    match operation {
        Operation::IsNull => return single(col().is_null()),
        Operation::IsNotNull => return single(col().is_not_null()),
        Operation::IsNullOrWhiteSpace => {
            return Ok(Condition::any()
                .add(col().is_null())
                .add(Expr::expr(trimmed(column)).eq("")));
        }
        Operation::IsNotNullNorWhiteSpace => {
            return Ok(Condition::all()
                .add(col().is_not_null())
                .add(Expr::expr(trimmed(column)).ne("")));
        }
        Operation::IsEmpty => return single(projected(column).eq("")),
        Operation::IsNotEmpty => {
            return Ok(Condition::all()
                .add(col().is_not_null())
                .add(projected(column).ne("")));
        }
        _ => {}
    }
    if let Some(condition) = null_operand(column, statement) {
        return Ok(condition);
    }

    let first = operand(ValueKind::Text, statement.value(), statement)?;
    if let Value::List(candidates) = first {
        let candidates = candidates.into_iter().map(text).collect::<Vec<_>>();
        return single(projected(column).is_in(candidates));
    }
    let constant = text(first);

    single(match operation {
        Operation::Equal => projected(column).eq(constant),
        Operation::NotEqual => projected(column).ne(constant),
        Operation::Contains | Operation::In => projected(column).like(like(&constant, true, true)),
        Operation::StartsWith => projected(column).like(like(&constant, false, true)),
        Operation::EndsWith => projected(column).like(like(&constant, true, false)),
        Operation::GreaterThan => projected(column).gt(constant),
        Operation::GreaterThanOrEqualTo => projected(column).gte(constant),
        Operation::LessThan => projected(column).lt(constant),
        Operation::LessThanOrEqualTo => projected(column).lte(constant),
        Operation::Between => {
            let high = text(operand(ValueKind::Text, statement.value2(), statement)?);
            projected(column).between(constant, high)
        }
        _ => return Err(invalid_operation(operation, "text")),
    })
}

fn text(value: Value) -> String {
    match value {
        Value::Text(text) => text,
        _ => String::new(),
    }
}

const LIKE_ESCAPE: char = '!';

/// `%`, `_` and the escape character in the operand match literally.
fn like(constant: &str, leading: bool, trailing: bool) -> LikeExpr {
    let escaped = constant
        .replace(LIKE_ESCAPE, "!!")
        .replace('%', "!%")
        .replace('_', "!_");
    let pattern = format!(
        "{}{escaped}{}",
        if leading { "%" } else { "" },
        if trailing { "%" } else { "" }
    );
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

fn null_operand(column: &Alias, statement: &FilterStatement) -> Option<Condition> {
    if !statement.value().is_some_and(Value::is_null) {
        return None;
    }
    let col = Expr::col(column.clone());
    match statement.operation() {
        Operation::Equal => Some(Condition::all().add(col.is_null())),
        Operation::NotEqual => Some(Condition::all().add(col.is_not_null())),
        _ => None,
    }
}

fn scalar_condition(
    column: &Alias,
    kind: ValueKind,
    statement: &FilterStatement,
) -> Result<Condition, FilterError> {
    let col = || Expr::col(column.clone());
    let operation = statement.operation();
    match operation {
        Operation::IsNull => return Ok(Condition::all().add(col().is_null())),
        Operation::IsNotNull => return Ok(Condition::all().add(col().is_not_null())),
        _ => {}
    }
    if let Some(condition) = null_operand(column, statement) {
        return Ok(condition);
    }

    let first = operand(kind, statement.value(), statement)?;
    if let Value::List(candidates) = first {
        let candidates = candidates
            .into_iter()
            .map(sql_value)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Condition::all().add(col().is_in(candidates)));
    }

    let found = first.type_name();
    let value = sql_value(first)?;
    let expr = match operation {
        Operation::Equal => col().eq(value),
        Operation::NotEqual => col().ne(value),
        Operation::GreaterThan => col().gt(value),
        Operation::GreaterThanOrEqualTo => col().gte(value),
        Operation::LessThan => col().lt(value),
        Operation::LessThanOrEqualTo => col().lte(value),
        Operation::Between => {
            let high = sql_value(operand(kind, statement.value2(), statement)?)?;
            col().between(value, high)
        }
        Operation::Contains | Operation::In => {
            return Err(FilterError::TypeMismatch {
                property: statement.property().to_string(),
                expected: format!("a list of {kind} values"),
                found: found.to_string(),
            });
        }
        _ => return Err(invalid_operation(operation, &kind.to_string())),
    };
    Ok(Condition::all().add(expr))
}

fn sql_value(value: Value) -> Result<sea_orm::Value, FilterError> {
    Ok(match value {
        Value::Bool(b) => b.into(),
        Value::Int(i) => i.into(),
        Value::Float(f) => f.into(),
        Value::Decimal(d) => d.into(),
        Value::Text(s) => s.into(),
        Value::DateTime(dt) => dt.into(),
        Value::Date(d) => d.into(),
        Value::Uuid(u) => u.into(),
        Value::Null | Value::List(_) => {
            return Err(FilterError::Unsupported(format!(
                "{} operands cannot be bound as a single SQL value",
                value.type_name()
            )));
        }
    })
}

fn invalid_operation(operation: Operation, property_type: &str) -> FilterError {
    FilterError::InvalidOperation {
        operation,
        property_type: property_type.to_string(),
    }
}
