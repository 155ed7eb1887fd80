//! Member lookup ignores case, so these two names collide.
#![allow(dead_code, non_snake_case)]

use crudfilter::Filterable;

#[derive(Filterable)]
struct Account {
    name: String,
    Name: String,
}

fn main() {}
