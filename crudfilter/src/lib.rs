//! # crudfilter
//!
//! Typed, dynamic filters for CRUD APIs.
//!
//! A [`Filter`] is an ordered list of statements such as
//! `address.city Equal "Paris"` or `skills[name] In ["Rust", "SQL"]`.
//! [`FilterBuilder`] compiles it once into a [`Predicate`] over any type that
//! derives [`Filterable`], or translates it into a `sea_orm` condition.
//!
//! ```rust
//! use crudfilter::{Filter, FilterBuilder, Filterable, OperationLogical::And};
//!
//! #[derive(Filterable)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let people = vec![
//!     Person { name: "Ada ".into(), age: 36 },
//!     Person { name: "Grace".into(), age: 45 },
//! ];
//!
//! let mut filter = Filter::new();
//! filter.equal("name", "ada", And)?.less_than("age", 40, And)?;
//!
//! let predicate = FilterBuilder::new().get_expression::<Person>(&filter)?;
//! assert_eq!(predicate.filter_slice(&people).len(), 1);
//! # Ok::<(), crudfilter::FilterError>(())
//! ```

// Lets the derive's `::crudfilter::` paths resolve inside this crate's tests.
extern crate self as crudfilter;

pub mod config;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod record;
pub mod routes;
pub mod value;

#[cfg(feature = "derive")]
pub use crudfilter_derive::Filterable;

pub use config::FilterLimits;
pub use errors::{ApiError, FilterError};
pub use filtering::{Filter, FilterBuilder, FilterStatement, Operation, OperationLogical, Predicate};
pub use models::{FilterOptions, QueryRequest};
pub use record::{FieldKind, FieldMeta, FieldRef, FieldType, Filterable, Record, ScalarRef};
pub use routes::{FilterResource, router};
pub use value::{DeclaredType, FilterValue, PropertyType, Value, ValueKind};
