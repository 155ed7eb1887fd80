//! Record metadata: how a filter reaches into a Rust struct.
//!
//! [`Filterable`] answers "what members does this type have" without an
//! instance, which lets paths be resolved and validated once at compile time.
//! [`Record`] answers "what is the value of this member" for an instance and
//! is object safe, so nested records can be walked behind `&dyn Record`.
//! Both are normally produced by `#[derive(Filterable)]`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

use crate::value::{PropertyType, ValueKind};

/// Static member lookup of a record type.
pub type MemberLookup = fn(&str) -> Option<FieldMeta>;

/// Shape of a member.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Scalar(ValueKind),
    Object(MemberLookup),
    Collection(Box<FieldKind>),
}

/// Metadata of one member, as returned by [`Filterable::member`].
#[derive(Debug, Clone)]
pub struct FieldMeta {
    /// Canonical name, as accepted by [`Record::field`].
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldMeta {
    #[must_use]
    pub fn of<F: FieldType + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            kind: F::field_kind(),
            nullable: F::NULLABLE,
        }
    }

    /// Declared type of the member, checked against the allowed-operations table.
    #[must_use]
    pub fn property_type(&self) -> PropertyType {
        let base = match &self.kind {
            FieldKind::Scalar(kind) => PropertyType::scalar(*kind),
            FieldKind::Object(_) => PropertyType::record(),
            FieldKind::Collection(element) => match element.as_ref() {
                FieldKind::Scalar(kind) => PropertyType::scalar(*kind),
                _ => PropertyType::record(),
            }
            .array(),
        };
        if self.nullable { base.nullable() } else { base }
    }
}

/// A borrowed scalar member value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(&'a str),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
}

/// The value of a member read from a record instance.
pub enum FieldRef<'a> {
    Null,
    Scalar(ScalarRef<'a>),
    Object(&'a dyn Record),
    Collection(Vec<FieldRef<'a>>),
}

impl FieldRef<'_> {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
            Self::Collection(items) => f.debug_tuple("Collection").field(items).finish(),
        }
    }
}

/// Runtime member access by canonical name.
pub trait Record {
    fn field(&self, name: &str) -> Option<FieldRef<'_>>;
}

/// Static member metadata. `member` matches names ASCII case-insensitively
/// and reports the canonical name.
pub trait Filterable: Record {
    fn member(name: &str) -> Option<FieldMeta>;
}

/// Maps a Rust field type onto a [`FieldKind`] and projects values of it.
pub trait FieldType {
    const NULLABLE: bool = false;

    fn field_kind() -> FieldKind;

    fn to_field(&self) -> FieldRef<'_>;
}

macro_rules! impl_scalar_field {
    ($($ty:ty => $kind:ident, |$v:ident| $scalar:expr;)+) => {
        $(
            impl FieldType for $ty {
                fn field_kind() -> FieldKind {
                    FieldKind::Scalar(ValueKind::$kind)
                }

                fn to_field(&self) -> FieldRef<'_> {
                    let $v = self;
                    FieldRef::Scalar($scalar)
                }
            }
        )+
    };
}

impl_scalar_field! {
    bool => Boolean, |v| ScalarRef::Bool(*v);
    i8 => Number, |v| ScalarRef::Int(i64::from(*v));
    i16 => Number, |v| ScalarRef::Int(i64::from(*v));
    i32 => Number, |v| ScalarRef::Int(i64::from(*v));
    i64 => Number, |v| ScalarRef::Int(*v);
    u8 => Number, |v| ScalarRef::Int(i64::from(*v));
    u16 => Number, |v| ScalarRef::Int(i64::from(*v));
    u32 => Number, |v| ScalarRef::Int(i64::from(*v));
    f32 => Number, |v| ScalarRef::Float(f64::from(*v));
    f64 => Number, |v| ScalarRef::Float(*v);
    Decimal => Number, |v| ScalarRef::Decimal(*v);
    String => Text, |v| ScalarRef::Text(v.as_str());
    DateTime<Utc> => Date, |v| ScalarRef::DateTime(*v);
    NaiveDate => Date, |v| ScalarRef::Date(*v);
    Uuid => Uuid, |v| ScalarRef::Uuid(*v);
}

impl<T: FieldType> FieldType for Option<T> {
    const NULLABLE: bool = true;

    fn field_kind() -> FieldKind {
        T::field_kind()
    }

    fn to_field(&self) -> FieldRef<'_> {
        self.as_ref().map_or(FieldRef::Null, FieldType::to_field)
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Collection(Box::new(T::field_kind()))
    }

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Collection(self.iter().map(FieldType::to_field).collect())
    }
}

impl<T: FieldType> FieldType for Box<T> {
    const NULLABLE: bool = T::NULLABLE;

    fn field_kind() -> FieldKind {
        T::field_kind()
    }

    fn to_field(&self) -> FieldRef<'_> {
        (**self).to_field()
    }
}
