//! # Filtering
//!
//! Dynamic filters compiled into typed predicates.
//!
//! ## Main Components
//!
//! - **[`Filter`]** / **[`FilterStatement`]**: an ordered list of conditions,
//!   each a property path, an [`Operation`], up to two values and the
//!   [`OperationLogical`] joining it to the next statement
//! - **[`FilterBuilder::get_expression`]**: compiles a filter into a
//!   [`Predicate`] over any [`Filterable`](crate::Filterable) type
//! - **[`FilterBuilder::get_condition`]**: translates a filter of top-level
//!   members into a `sea_orm` condition
//! - **[`parse_filter`]**: reads the `filter` query parameter
//! - **[`parse_sorting`]** / **[`sort_records`]** / **[`parse_pagination`]**:
//!   the rest of a list request
//!
//! ## Property Paths
//!
//! ```rust,ignore
//! filter.equal("name", "Ada", And)?;              // member
//! filter.equal("address.city", "Paris", And)?;    // nested record
//! filter.equal("skills[name]", "SQL", And)?;      // any element of a collection
//! ```
//!
//! ## Semantics
//!
//! - Text comparisons are case-insensitive and ignore surrounding whitespace.
//! - `Contains`/`In` with a list value test membership; with a single value
//!   they test for a substring (text) or an element (collections).
//! - A null record on a dotted path makes `IsNull`/`IsNullOrWhiteSpace` true
//!   and every other operation false.
//! - Each statement's logical joins it to the *next* statement, folding left
//!   to right.

mod builder;
mod compare;
pub mod conditions;
mod filter;
mod operation;
pub mod pagination;
mod path;
pub mod query_parser;
pub mod sort;
mod statement;

pub use builder::{FilterBuilder, Predicate};
pub use filter::Filter;
pub use operation::{Operation, OperationLogical, supported_operations};
pub use pagination::{calculate_content_range, parse_pagination, parse_range};
pub use query_parser::parse_filter;
pub use sort::{parse_sorting, sort_records};
pub use statement::FilterStatement;
