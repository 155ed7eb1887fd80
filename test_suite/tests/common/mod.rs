use axum::Router;
use chrono::NaiveDate;
use crudfilter::{FilterResource, Filterable};
use serde::Serialize;

#[derive(Clone, Debug, Serialize, Filterable)]
pub struct Address {
    pub city: Option<String>,
    pub zip: String,
}

#[derive(Clone, Debug, Serialize, Filterable)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

#[derive(Clone, Debug, Serialize, Filterable)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub age: u32,
    pub nickname: Option<String>,
    pub score: Option<f64>,
    pub address: Option<Address>,
    pub tags: Vec<String>,
    pub skills: Option<Vec<Skill>>,
    pub joined: NaiveDate,
}

impl FilterResource for Person {
    const RESOURCE_NAME_PLURAL: &'static str = "people";

    fn searchable_properties() -> &'static [&'static str] {
        &["name", "nickname"]
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn address(city: Option<&str>, zip: &str) -> Option<Address> {
    Some(Address {
        city: city.map(str::to_string),
        zip: zip.to_string(),
    })
}

fn skill(name: &str, level: u8) -> Skill {
    Skill {
        name: name.to_string(),
        level,
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| (*t).to_string()).collect()
}

/// Five people covering null parents, null members, whitespace and
/// differently cased text.
#[allow(dead_code)]
pub fn people() -> Vec<Person> {
    vec![
        Person {
            id: 1,
            name: "Alice ".to_string(),
            age: 30,
            nickname: Some("Ally".to_string()),
            score: Some(88.5),
            address: address(Some("Paris"), "75001"),
            tags: tags(&["a", "rust"]),
            skills: Some(vec![skill("SQL", 7), skill("Rust", 9)]),
            joined: date(2020, 1, 15),
        },
        Person {
            id: 2,
            name: "Bob".to_string(),
            age: 17,
            nickname: None,
            score: None,
            address: None,
            tags: Vec::new(),
            skills: None,
            joined: date(2021, 6, 1),
        },
        Person {
            id: 3,
            name: "carol".to_string(),
            age: 18,
            nickname: Some("  ".to_string()),
            score: Some(70.0),
            address: address(None, "10001"),
            tags: tags(&["b"]),
            skills: Some(Vec::new()),
            joined: date(2019, 3, 10),
        },
        Person {
            id: 4,
            name: "Dave".to_string(),
            age: 45,
            nickname: Some("D".to_string()),
            score: Some(95.0),
            address: address(Some("London"), "SW1"),
            tags: tags(&["c", "a"]),
            skills: Some(vec![skill("Go", 5)]),
            joined: date(2022, 11, 30),
        },
        Person {
            id: 5,
            name: "Eve".to_string(),
            age: 30,
            nickname: None,
            score: Some(60.25),
            address: address(Some("paris "), "75002"),
            tags: tags(&["rust"]),
            skills: Some(vec![skill("sql ", 3)]),
            joined: date(2023, 2, 14),
        },
    ]
}

/// Ids of `people` in order.
#[allow(dead_code)]
pub fn ids<'a>(people: impl IntoIterator<Item = &'a Person>) -> Vec<i32> {
    people.into_iter().map(|p| p.id).collect()
}

#[allow(dead_code)]
pub fn setup_test_app() -> Router {
    Router::new().nest("/people", crudfilter::router(people()))
}
