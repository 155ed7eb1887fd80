//! Generic records bound their member types.

use crudfilter::Filterable;

#[derive(Filterable)]
pub struct Labeled<T> {
    pub label: String,
    pub value: T,
}

fn main() {
    assert!(Labeled::<i64>::member("value").is_some());
    assert!(Labeled::<String>::member("label").is_some());
}
