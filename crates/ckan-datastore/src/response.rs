// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! `datastore_search` response models and their normalization into the
//! backend-agnostic result shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DataStoreError, DataStoreResult};
use crate::type_mapping::{ckan_type_to_canonical, FieldType};

// ---- Serde models for DataStore JSON responses ----

/// Column descriptor as reported by the DataStore.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteField {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// The `result` object of a `datastore_search` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub fields: Vec<RemoteField>,
    pub records: Vec<Value>,
    pub total: u64,
}

impl SearchResult {
    /// Decode a `result` object, failing on a missing or mistyped
    /// `fields`, `records`, or `total`.
    pub fn from_value(value: Value) -> DataStoreResult<Self> {
        serde_json::from_value(value).map_err(|e| {
            DataStoreError::MalformedResponse(format!("datastore_search result: {}", e))
        })
    }
}

// ---- Normalized output ----

/// Column descriptor in the canonical vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
        }
    }
}

impl From<RemoteField> for Field {
    fn from(remote: RemoteField) -> Self {
        Field {
            field_type: ckan_type_to_canonical(&remote.type_name),
            id: remote.id,
        }
    }
}

/// One page of rows plus the total row count matching the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub fields: Vec<Field>,
    pub total: u64,
    pub hits: Vec<Value>,
}

/// Field listing returned when a dataset is first opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    pub fields: Vec<Field>,
    /// Always `false`: rows stay on the server and must be fetched with
    /// further queries rather than loaded into a local store.
    pub use_memory_store: bool,
}

/// A row of the DataStore `_table_metadata` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
}

/// Normalize a search result: canonical field types, records as hits.
pub fn normalize_response(result: SearchResult) -> QueryResult {
    QueryResult {
        fields: result.fields.into_iter().map(Into::into).collect(),
        total: result.total,
        hits: result.records,
    }
}
