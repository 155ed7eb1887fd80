//! Generic list endpoints over an in-memory record set.
//!
//! ```rust,ignore
//! let app = Router::new().nest("/people", crudfilter::routes::router(people));
//! // GET  /people?filter={"age_gte":18}&sort=["name","ASC"]&range=[0,9]
//! // POST /people/query  {"statements": [...], "page": 1, "per_page": 20}
//! ```

use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;

use crate::errors::{ApiError, FilterError};
use crate::filtering::{
    FilterBuilder, Predicate, calculate_content_range, parse_filter, parse_pagination,
    parse_sorting, sort_records,
};
use crate::models::{FilterOptions, QueryRequest};
use crate::record::Filterable;

/// A record type served by [`router`].
pub trait FilterResource: Filterable + Serialize + Clone + Send + Sync + 'static {
    /// Used in the `Content-Range` header.
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Properties searched by the free-text `q` filter key.
    fn searchable_properties() -> &'static [&'static str] {
        &[]
    }

    /// Sort property used when the request names none, or an unknown one.
    /// Records keep their insertion order if this does not name a sortable
    /// member of `Self`.
    fn default_sort_property() -> &'static str {
        "id"
    }
}

/// Shared state of the generated routes.
#[derive(Clone)]
pub struct FilterState<T> {
    items: Arc<Vec<T>>,
    builder: Arc<FilterBuilder>,
}

impl<T> FilterState<T> {
    #[must_use]
    pub fn new(items: Vec<T>, builder: FilterBuilder) -> Self {
        Self {
            items: Arc::new(items),
            builder: Arc::new(builder),
        }
    }
}

type ListResponse<T> = Result<(HeaderMap, Json<Vec<T>>), ApiError>;

/// `GET /`: records matching the `filter` query parameter, sorted and paginated.
///
/// # Errors
///
/// Responds 400 if the filter cannot be parsed or compiled against `T`.
pub async fn get_all<T: FilterResource>(
    State(state): State<FilterState<T>>,
    Query(params): Query<FilterOptions>,
) -> ListResponse<T> {
    let filter = parse_filter(
        params.filter.as_deref(),
        T::searchable_properties(),
        state.builder.limits(),
    )?;
    let predicate = state.builder.get_expression::<T>(&filter)?;
    Ok(list(&state, &predicate, filter.len(), &params))
}

/// `POST /query`: records matching explicit statements.
///
/// # Errors
///
/// Responds 422 with one message per rejected statement if a statement is
/// malformed or does not fit the member it targets, and 400 for any other
/// compilation error (unknown member, exceeded limit).
pub async fn query<T: FilterResource>(
    State(state): State<FilterState<T>>,
    Json(request): Json<QueryRequest>,
) -> ListResponse<T> {
    let errors: Vec<String> = request
        .statements
        .iter()
        .filter_map(|statement| statement.validate().err())
        .map(|e| e.to_string())
        .collect();
    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    let predicate = state
        .builder
        .get_expression::<T>(&request.statements)
        .map_err(|e| match e {
            FilterError::InvalidOperation { .. }
            | FilterError::InvalidArrayUsage { .. }
            | FilterError::MissingValue { .. }
            | FilterError::TypeMismatch { .. } => {
                ApiError::validation_failed(vec![e.to_string()])
            }
            other => other.into(),
        })?;
    Ok(list(
        &state,
        &predicate,
        request.statements.len(),
        &request.options(),
    ))
}

fn list<T: FilterResource>(
    state: &FilterState<T>,
    predicate: &Predicate<T>,
    statements: usize,
    params: &FilterOptions,
) -> (HeaderMap, Json<Vec<T>>) {
    let mut matches: Vec<&T> = state
        .items
        .iter()
        .filter(|item| predicate.matches(item))
        .collect();

    // `parse_sorting` only returns a property that resolves or the default;
    // a default that does not resolve leaves the records in insertion order.
    let (property, order) = parse_sorting::<T>(params, T::default_sort_property());
    if let Err(e) = sort_records(&mut matches, &property, &order) {
        tracing::warn!(
            resource = T::RESOURCE_NAME_PLURAL,
            property = %property,
            error = %e,
            "default sort property does not resolve, keeping insertion order"
        );
    }

    let total_count = u64::try_from(matches.len()).unwrap_or(u64::MAX);
    let (offset, limit) = parse_pagination(params);
    tracing::debug!(
        resource = T::RESOURCE_NAME_PLURAL,
        statements,
        matched = total_count,
        offset,
        limit,
        "listing records"
    );

    let page: Vec<T> = matches
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .cloned()
        .collect();
    let headers = calculate_content_range(offset, limit, total_count, T::RESOURCE_NAME_PLURAL);
    (headers, Json(page))
}

/// Routes `GET /` and `POST /query` over `items` with default limits.
pub fn router<T: FilterResource>(items: Vec<T>) -> Router {
    router_with_builder(items, FilterBuilder::new())
}

pub fn router_with_builder<T: FilterResource>(items: Vec<T>, builder: FilterBuilder) -> Router {
    Router::new()
        .route("/", get(get_all::<T>))
        .route("/query", post(query::<T>))
        .with_state(FilterState::new(items, builder))
}
