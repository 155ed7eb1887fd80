use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::filtering::Filter;

/// Query parameters for filtering, pagination, and sorting records.
///
/// # Filtering
/// The `filter` parameter accepts a JSON-encoded string in one of two forms:
/// - **Statement list:** an array of filter statements, for example:
///   ```json
///   [{"property": "address.city", "operation": "Equal", "value": "Paris"}]
///   ```
/// - **Key/value object:** one condition per key, for example:
///   ```json
///   {"q": "search text", "age_gte": 18, "status": ["active", "pending"]}
///   ```
///
/// # Pagination
/// Two pagination formats are supported:
/// - **React Admin format:** Use the `range` parameter with JSON array format, for example: `[0,9]`
/// - **Standard REST format:** Use `page` and `per_page` parameters, for example: `page=1&per_page=10`
///
/// # Sorting
/// The `sort` parameter should be a JSON array with the property and sort order, for example:
/// ```json
/// ["address.city", "ASC"]
/// ```
#[derive(Debug, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct FilterOptions {
    /// JSON-encoded filter, either a statement array or a key/value object.
    ///
    /// Example: `{"name_like": "ada", "age_gte": 18}`
    #[param(example = r#"{"name_like": "ada", "age_gte": 18}"#)]
    pub filter: Option<String>,
    /// Range for pagination in the format "[start, end]".
    ///
    /// Example: `[0,9]`
    #[param(example = "[0,9]")]
    pub range: Option<String>,
    /// Page number for standard REST pagination (1-based).
    ///
    /// Example: `1`
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Number of items per page for standard REST pagination.
    ///
    /// Example: `10`
    #[param(example = 10)]
    pub per_page: Option<u64>,
    /// Sort order for the results in the format `["property", "order"]`.
    ///
    /// Example: `["name", "ASC"]`
    #[param(example = r#"["name", "ASC"]"#)]
    pub sort: Option<String>,
    /// Sort property for standard REST format.
    ///
    /// Example: `name`
    #[param(example = "name")]
    pub sort_by: Option<String>,
    /// Sort order for standard REST format (ASC or DESC).
    ///
    /// Example: `ASC`
    #[param(example = "ASC")]
    pub order: Option<String>,
}

/// Body of the `POST /query` endpoint: explicit statements plus the same
/// pagination and sorting options as [`FilterOptions`].
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct QueryRequest {
    pub statements: Filter,
    pub range: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub sort: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl QueryRequest {
    /// Pagination and sorting options without a `filter` parameter.
    #[must_use]
    pub fn options(&self) -> FilterOptions {
        FilterOptions {
            filter: None,
            range: self.range.clone(),
            page: self.page,
            per_page: self.per_page,
            sort: self.sort.clone(),
            sort_by: self.sort_by.clone(),
            order: self.order.clone(),
        }
    }
}
