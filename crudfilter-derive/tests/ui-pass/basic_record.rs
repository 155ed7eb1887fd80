//! A flat record with scalar, optional and collection members.

use crudfilter::{FieldKind, FieldRef, Filterable, Record};
use uuid::Uuid;

#[derive(Filterable)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub priority: Option<i32>,
    pub due: Option<chrono::NaiveDate>,
    pub tags: Vec<String>,
}

fn main() {
    let meta = Todo::member("TITLE").expect("case-insensitive lookup");
    assert_eq!(meta.name, "title");
    assert!(!meta.nullable);

    assert!(Todo::member("priority").is_some_and(|m| m.nullable));
    assert!(matches!(
        Todo::member("tags").map(|m| m.kind),
        Some(FieldKind::Collection(_))
    ));
    assert!(Todo::member("missing").is_none());

    let todo = Todo {
        id: Uuid::nil(),
        title: "Write tests".to_string(),
        completed: false,
        priority: None,
        due: None,
        tags: vec!["work".to_string()],
    };
    assert!(matches!(todo.field("priority"), Some(FieldRef::Null)));
    assert!(matches!(todo.field("tags"), Some(FieldRef::Collection(items)) if items.len() == 1));
    assert!(todo.field("Title").is_none());
}
