// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! Thin client for the DataStore action API of a single CKAN endpoint.

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::normalize_endpoint;
use crate::error::{DataStoreError, DataStoreResult};
use crate::query::{to_search_request, Query, SearchRequest};
use crate::response::{normalize_response, QueryResult, ResourceSummary, SearchResult};
use crate::transport::Transport;

const SEARCH_ACTION: &str = "/3/action/datastore_search";

/// Pseudo-resource listing every DataStore table on an instance.
const TABLE_METADATA_RESOURCE: &str = "_table_metadata";

/// CKAN action envelope: `{"help": ..., "success": ..., "result": ...}`.
#[derive(Deserialize)]
struct ActionResponse {
    #[serde(default = "default_success")]
    success: bool,
    result: Option<Value>,
    error: Option<Value>,
}

fn default_success() -> bool {
    true
}

impl ActionResponse {
    fn into_result(self, action: &str) -> DataStoreResult<Value> {
        if !self.success {
            let message = self
                .error
                .as_ref()
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} reported failure", action));
            return Err(DataStoreError::transport(None, message));
        }
        self.result.ok_or_else(|| {
            DataStoreError::MalformedResponse(format!("{} response has no result", action))
        })
    }
}

/// DataStore API of one CKAN instance.
#[derive(Clone)]
pub struct DataStore {
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl DataStore {
    /// `endpoint` is the API root, e.g. `http://demo.ckan.org/api`.
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.into()),
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.endpoint, SEARCH_ACTION)
    }

    /// Raw `datastore_search` call with an already-translated request.
    pub async fn search(&self, request: &SearchRequest) -> DataStoreResult<SearchResult> {
        debug!(
            endpoint = %self.endpoint,
            resource_id = %request.resource_id,
            limit = request.limit,
            offset = request.offset,
            "datastore_search"
        );
        let body = encode_request(request)?;
        let raw = self
            .transport
            .perform(Method::POST, &self.search_url(), Some(&body))
            .await?;
        SearchResult::from_value(decode_envelope(raw, "datastore_search")?)
    }

    /// Run an abstract query against `resource_id` and normalize the result.
    pub async fn query(&self, query: &Query, resource_id: &str) -> DataStoreResult<QueryResult> {
        let request = to_search_request(query, resource_id);
        let result = self.search(&request).await?;
        Ok(normalize_response(result))
    }

    /// List the DataStore tables available on this endpoint.
    pub async fn list_resources(&self) -> DataStoreResult<Vec<ResourceSummary>> {
        let url = format!(
            "{}?resource_id={}",
            self.search_url(),
            TABLE_METADATA_RESOURCE
        );
        let raw = self.transport.perform(Method::GET, &url, None).await?;
        let result = SearchResult::from_value(decode_envelope(raw, "datastore_search")?)?;
        result
            .records
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).map_err(|e| {
                    DataStoreError::MalformedResponse(format!("table metadata record: {}", e))
                })
            })
            .collect()
    }
}

fn encode_request(request: &SearchRequest) -> DataStoreResult<Value> {
    serde_json::to_value(request).map_err(|e| DataStoreError::Encode(e.to_string()))
}

fn decode_envelope(raw: Value, action: &str) -> DataStoreResult<Value> {
    let envelope: ActionResponse = serde_json::from_value(raw)
        .map_err(|e| DataStoreError::MalformedResponse(format!("{} envelope: {}", action, e)))?;
    envelope.into_result(action)
}
