//! Records nested as members, optional members and collection elements.

use crudfilter::{Filter, FilterBuilder, Filterable, OperationLogical::And};

#[derive(Filterable)]
pub struct Address {
    pub city: Option<String>,
}

#[derive(Filterable)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

#[derive(Filterable)]
pub struct Person {
    pub name: String,
    pub address: Option<Address>,
    pub skills: Vec<Skill>,
}

fn main() {
    let people = vec![
        Person {
            name: "Ada".to_string(),
            address: Some(Address {
                city: Some("London".to_string()),
            }),
            skills: vec![Skill {
                name: "Math".to_string(),
                level: 9,
            }],
        },
        Person {
            name: "Grace".to_string(),
            address: None,
            skills: Vec::new(),
        },
    ];

    let mut filter = Filter::new();
    filter
        .equal("address.city", "london", And)
        .expect("valid statement")
        .equal("skills[name]", "math", And)
        .expect("valid statement");

    let predicate = FilterBuilder::new()
        .get_expression::<Person>(&filter)
        .expect("filter compiles");
    let matched = predicate.filter_slice(&people);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Ada");
}
