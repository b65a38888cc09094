//! Paged list requests: the query parameters going out and the
//! `Pagination` header coming back.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::capabilities::ApiResponse;
use crate::model::{LikesMode, MessageContainer, UserParams};

pub const PAGINATION_HEADER: &str = "Pagination";

/// Page metadata the server reports alongside a list.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

/// A list payload plus page metadata when the server paged it.
///
/// `pagination` is `None` when the response carried no usable `Pagination`
/// header, meaning `result` holds everything.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PaginatedResult<T> {
    pub result: T,
    pub pagination: Option<Pagination>,
}

impl<T> PaginatedResult<T> {
    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            result: f(self.result),
            pagination: self.pagination,
        }
    }
}

/// Reads the body into `result` and attaches page metadata from `header_name`.
///
/// The header lookup ignores case. A header that is present but not valid
/// page metadata is logged and treated as absent.
pub fn paginate<T: DeserializeOwned>(
    response: &ApiResponse,
    header_name: &str,
) -> Result<PaginatedResult<T>, serde_json::Error> {
    let result = response.json::<T>()?;

    let pagination = response.header(header_name).and_then(|raw| {
        serde_json::from_str::<Pagination>(raw)
            .map_err(|e| {
                warn!(header = header_name, "ignoring unparseable pagination header: {e}");
            })
            .ok()
    });

    Ok(PaginatedResult { result, pagination })
}

/// Ordered query parameters. Absent inputs add nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.push((name.into(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.iter().filter(|(n, _)| n == name).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds the query string of list requests.
///
/// ```
/// use shared::model::LikesMode;
/// use shared::pagination::QueryBuilder;
///
/// let query = QueryBuilder::new()
///     .page(Some(1), Some(12))
///     .likes(Some(LikesMode::Likers))
///     .build();
/// assert_eq!(query.get("pageNumber"), Some("1"));
/// assert_eq!(query.get("Likers"), Some("true"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: QueryParams,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(mut self, container: MessageContainer) -> Self {
        self.params.append("MessageContainer", container.as_str());
        self
    }

    /// Paging is only sent when both values are known.
    pub fn page(mut self, page: Option<u32>, items_per_page: Option<u32>) -> Self {
        if let (Some(page), Some(size)) = (page, items_per_page) {
            self.params.append("pageNumber", page);
            self.params.append("pageSize", size);
        }
        self
    }

    pub fn likes(mut self, mode: Option<LikesMode>) -> Self {
        if let Some(mode) = mode {
            self.params.append(mode.param_name(), true);
        }
        self
    }

    pub fn filter(mut self, filter: Option<&UserParams>) -> Self {
        if let Some(filter) = filter {
            self.params.append("minAge", filter.min_age);
            self.params.append("maxAge", filter.max_age);
            self.params.append("gender", &filter.gender);
            self.params.append("orderBy", &filter.order_by);
        }
        self
    }

    pub fn build(self) -> QueryParams {
        self.params
    }
}
