//! Enums have no named members to filter on.
#![allow(dead_code)]

use crudfilter::Filterable;

#[derive(Filterable)]
enum Status {
    Active,
    Archived,
}

fn main() {}
