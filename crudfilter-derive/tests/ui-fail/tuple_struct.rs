//! Tuple struct members have no names to look up.
#![allow(dead_code)]

use crudfilter::Filterable;

#[derive(Filterable)]
struct Point(i32, i32);

fn main() {}
