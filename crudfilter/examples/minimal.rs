//! Minimal filterable list API with Axum
//!
//! ```bash
//! cargo run --example minimal
//! ```
//!
//! Then try:
//! - <http://localhost:3000/books>
//! - <http://localhost:3000/books?filter={"year_gte":1950,"q":"the"}&sort=["year","DESC"]>
//! - `curl -X POST localhost:3000/books/query -H 'content-type: application/json'
//!   -d '{"statements":[{"property":"tags","operation":"Contains","value":"classic"}]}'`

use crudfilter::{FilterResource, Filterable};
use serde::Serialize;

#[derive(Clone, Debug, Serialize, Filterable)]
pub struct Author {
    pub name: String,
    pub country: Option<String>,
}

#[derive(Clone, Debug, Serialize, Filterable)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub year: u16,
    pub author: Option<Author>,
    pub tags: Vec<String>,
}

impl FilterResource for Book {
    const RESOURCE_NAME_PLURAL: &'static str = "books";

    fn searchable_properties() -> &'static [&'static str] {
        &["title"]
    }
}

fn book(id: i32, title: &str, year: u16, author: Option<(&str, &str)>, tags: &[&str]) -> Book {
    Book {
        id,
        title: title.to_string(),
        year,
        author: author.map(|(name, country)| Author {
            name: name.to_string(),
            country: Some(country.to_string()),
        }),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let books = vec![
        book(1, "The Hobbit", 1937, Some(("J. R. R. Tolkien", "UK")), &["fantasy", "classic"]),
        book(2, "Dune", 1965, Some(("Frank Herbert", "US")), &["science fiction"]),
        book(3, "The Left Hand of Darkness", 1969, Some(("Ursula K. Le Guin", "US")), &["science fiction", "classic"]),
        book(4, "Beowulf", 1000, None, &["epic", "classic"]),
    ];

    let app = axum::Router::new().nest("/books", crudfilter::router(books));
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("API: http://0.0.0.0:3000/books");
    axum::serve(listener, app).await?;
    Ok(())
}
