//! `rename` changes the exposed member name, `skip` hides a field.

use crudfilter::{Filterable, Record};

#[derive(Filterable)]
pub struct Account {
    #[filterable(rename = "fullName")]
    pub name: String,
    #[filterable(skip)]
    pub password_hash: Vec<u8>,
    pub r#type: String,
}

fn main() {
    assert_eq!(Account::member("fullname").map(|m| m.name), Some("fullName"));
    assert!(Account::member("name").is_none());
    assert!(Account::member("password_hash").is_none());
    assert_eq!(Account::member("type").map(|m| m.name), Some("type"));

    let account = Account {
        name: "Ada".to_string(),
        password_hash: vec![0],
        r#type: "admin".to_string(),
    };
    assert!(account.field("fullName").is_some());
    assert!(account.field("password_hash").is_none());
}
