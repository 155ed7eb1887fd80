//! Derive macro for `crudfilter`.
//!
//! `#[derive(Filterable)]` on a struct with named fields generates the record
//! metadata filters need: static member lookup, member access on an instance,
//! and the glue that lets the struct appear as a nested member of another
//! filterable struct.
//!
//! ```rust,ignore
//! #[derive(Filterable)]
//! struct Person {
//!     #[filterable(rename = "fullName")]
//!     name: String,
//!     address: Option<Address>,
//!     #[filterable(skip)]
//!     password_hash: String,
//! }
//! ```

mod attribute_parser;
mod codegen;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

#[proc_macro_derive(Filterable, attributes(filterable))]
pub fn derive_filterable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    codegen::expand_filterable(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
