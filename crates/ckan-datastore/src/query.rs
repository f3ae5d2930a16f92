// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! Abstract tabular query and its translation into a `datastore_search`
//! request body.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page size used when a query does not set one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Common sort directions, for building a [`SortSpec`] in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        order.as_str().to_string()
    }
}

/// One sort key. `order` is sent to the DataStore as written, so any
/// direction it understands (`asc`, `DESC`, ...) is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl SortSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: None,
        }
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

/// A query filter. Only filters whose `kind` is `"term"` are sent to the
/// DataStore; any other kind is ignored during translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(rename = "type")]
    pub kind: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Value>,
}

impl Filter {
    pub const TERM: &'static str = "term";

    /// Exact-match filter on `field`.
    pub fn term(field: impl Into<String>, term: impl Into<Value>) -> Self {
        Self {
            kind: Self::TERM.to_string(),
            field: field.into(),
            term: Some(term.into()),
        }
    }

    pub fn is_term(&self) -> bool {
        self.kind == Self::TERM
    }
}

/// Backend-agnostic tabular query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Free-text search term.
    #[serde(default, alias = "q", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, alias = "size", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(default, alias = "from", skip_serializing_if = "Option::is_none")]
    pub page_offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_page(mut self, size: u64, offset: u64) -> Self {
        self.page_size = Some(size);
        self.page_offset = Some(offset);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Body of a `datastore_search` action call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    pub filters: Map<String, Value>,
    pub limit: u64,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl SearchRequest {
    /// Bare request for `resource_id` with the given row limit and no
    /// search criteria.
    pub fn for_resource(resource_id: impl Into<String>, limit: u64) -> Self {
        Self {
            resource_id: resource_id.into(),
            q: None,
            filters: Map::new(),
            limit,
            offset: 0,
            sort: None,
        }
    }
}

/// Translate an abstract [`Query`] into the request body for `resource_id`.
pub fn to_search_request(query: &Query, resource_id: &str) -> SearchRequest {
    let mut filters = Map::new();
    for filter in query.filters.iter().filter(|f| f.is_term()) {
        // A term filter without a term has nothing to match on.
        if let Some(term) = &filter.term {
            filters.insert(filter.field.clone(), term.clone());
        }
    }

    let sort = if query.sort.is_empty() {
        None
    } else {
        Some(
            query
                .sort
                .iter()
                .map(|s| format!("{} {}", s.field, s.order.as_deref().unwrap_or("")))
                .collect::<Vec<_>>()
                .join(","),
        )
    };

    SearchRequest {
        resource_id: resource_id.to_string(),
        q: query.text.clone(),
        filters,
        // A zero page size means "unset", not "no rows".
        limit: query
            .page_size
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE),
        offset: query.page_offset.unwrap_or(0),
        sort,
    }
}
