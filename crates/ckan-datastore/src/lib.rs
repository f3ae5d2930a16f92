// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! CKAN DataStore backend for tabular queries.
//!
//! Translates backend-agnostic tabular queries into calls to the CKAN
//! DataStore `datastore_search` action and normalizes the response back into
//! a generic result:
//!
//! - [`ResourceLocator`] resolves a [`Dataset`] to an API endpoint and resource id
//! - [`to_search_request`] turns a [`Query`] into the action's request body
//! - [`normalize_response`] maps DataStore field types to the canonical
//!   [`FieldType`] vocabulary
//! - [`CkanBackend`] wires these together behind the [`TabularBackend`] trait

pub mod backend;
pub mod config;
pub mod datastore;
pub mod error;
pub mod locator;
pub mod query;
pub mod response;
pub mod transport;
pub mod type_mapping;

pub use backend::{CkanBackend, TabularBackend};
pub use config::{DataStoreConfig, DEFAULT_API_ENDPOINT};
pub use datastore::DataStore;
pub use error::{DataStoreError, DataStoreResult};
pub use locator::{parse_resource_url, Dataset, ResourceLocation, ResourceLocator};
pub use query::{to_search_request, Filter, Query, SearchRequest, SortOrder, SortSpec};
pub use response::{
    normalize_response, Field, FetchResult, QueryResult, RemoteField, ResourceSummary,
    SearchResult,
};
pub use transport::{HttpTransport, Transport};
pub use type_mapping::{ckan_type_to_canonical, fields_to_arrow_schema, FieldType};
