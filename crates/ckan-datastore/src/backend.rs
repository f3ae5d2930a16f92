// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! Tabular backend trait and its CKAN DataStore implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::DataStoreConfig;
use crate::datastore::DataStore;
use crate::error::DataStoreResult;
use crate::locator::{Dataset, ResourceLocation, ResourceLocator};
use crate::query::{Query, SearchRequest};
use crate::response::{normalize_response, FetchResult, QueryResult};
use crate::transport::{HttpTransport, Transport};

/// A remote source of tabular data addressed by [`Dataset`] descriptors.
///
/// Implementations hold no per-dataset state: every call carries the
/// dataset it applies to, so one backend can serve concurrent callers.
#[async_trait]
pub trait TabularBackend: Send + Sync {
    /// Short identifier of this backend (e.g., "ckan").
    fn name(&self) -> &str;

    /// Describe the dataset's fields without loading any rows.
    async fn fetch(&self, dataset: &Dataset) -> DataStoreResult<FetchResult>;

    /// Run `query` against the dataset and return one page of rows.
    async fn query(&self, query: &Query, dataset: &Dataset) -> DataStoreResult<QueryResult>;
}

/// [`TabularBackend`] for resources stored in a CKAN DataStore.
pub struct CkanBackend {
    locator: ResourceLocator,
    transport: Arc<dyn Transport>,
}

impl CkanBackend {
    /// Create a backend that talks HTTP with the given configuration.
    pub fn new(config: DataStoreConfig) -> DataStoreResult<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a backend on top of a caller-supplied transport.
    pub fn with_transport(config: DataStoreConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            locator: ResourceLocator::new(config.endpoint),
            transport,
        }
    }

    /// Endpoint used for datasets that carry only an id.
    pub fn default_endpoint(&self) -> &str {
        self.locator.default_endpoint()
    }

    /// Resolve `dataset` and open a [`DataStore`] client for its endpoint.
    pub fn open(&self, dataset: &Dataset) -> DataStoreResult<(DataStore, ResourceLocation)> {
        let location = self.locator.resolve(dataset)?;
        let store = DataStore::new(location.endpoint.clone(), self.transport.clone());
        Ok((store, location))
    }
}

#[async_trait]
impl TabularBackend for CkanBackend {
    fn name(&self) -> &str {
        "ckan"
    }

    async fn fetch(&self, dataset: &Dataset) -> DataStoreResult<FetchResult> {
        let (store, location) = self.open(dataset)?;
        debug!(endpoint = %location.endpoint, resource_id = %location.resource_id, "fetch");

        let result = store
            .search(&SearchRequest::for_resource(&location.resource_id, 0))
            .await?;
        Ok(FetchResult {
            fields: normalize_response(result).fields,
            use_memory_store: false,
        })
    }

    async fn query(&self, query: &Query, dataset: &Dataset) -> DataStoreResult<QueryResult> {
        let (store, location) = self.open(dataset)?;
        store.query(query, &location.resource_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reqwest::Method;
    use serde_json::{json, Value};

    use super::*;
    use crate::error::DataStoreError;
    use crate::query::{Filter, SortOrder, SortSpec};
    use crate::type_mapping::FieldType;

    /// Records every request and answers with a fixed body.
    struct RecordingTransport {
        response: DataStoreResult<Value>,
        calls: Mutex<Vec<(Method, String, Option<Value>)>>,
    }

    impl RecordingTransport {
        fn ok(response: Value) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(response),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16, message: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(DataStoreError::transport(Some(status), message)),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(Method, String, Option<Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn perform(
            &self,
            method: Method,
            url: &str,
            body: Option<&Value>,
        ) -> DataStoreResult<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((method, url.to_string(), body.cloned()));
            match &self.response {
                Ok(v) => Ok(v.clone()),
                Err(DataStoreError::Transport { status, message }) => {
                    Err(DataStoreError::transport(*status, message.clone()))
                }
                Err(e) => panic!("unexpected canned error: {}", e),
            }
        }
    }

    fn search_response() -> Value {
        json!({
            "success": true,
            "result": {
                "fields": [
                    { "id": "_id", "type": "int4" },
                    { "id": "price", "type": "float8" },
                    { "id": "title", "type": "text" }
                ],
                "records": [{ "_id": 1, "price": 9.5, "title": "cat" }],
                "total": 7
            }
        })
    }

    fn backend(transport: Arc<RecordingTransport>) -> CkanBackend {
        CkanBackend::with_transport(DataStoreConfig::new("http://default.org/api"), transport)
    }

    #[test]
    fn test_name() {
        let backend = backend(RecordingTransport::ok(json!({})));
        assert_eq!(backend.name(), "ckan");
        assert_eq!(backend.default_endpoint(), "http://default.org/api");
    }

    #[tokio::test]
    async fn test_fetch_probes_with_zero_limit() {
        let transport = RecordingTransport::ok(search_response());
        let fetched = backend(transport.clone())
            .fetch(&Dataset::from_url("http://x.org/dataset/d/resource/R1"))
            .await
            .unwrap();

        assert!(!fetched.use_memory_store);
        assert_eq!(fetched.fields.len(), 3);
        assert_eq!(fetched.fields[0].field_type, FieldType::Integer);
        assert_eq!(fetched.fields[1].field_type, FieldType::Float);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Method::POST);
        assert_eq!(calls[0].1, "http://x.org/api/3/action/datastore_search");
        assert_eq!(
            calls[0].2,
            Some(json!({ "resource_id": "R1", "filters": {}, "limit": 0, "offset": 0 }))
        );
    }

    #[tokio::test]
    async fn test_query_translates_and_normalizes() {
        let transport = RecordingTransport::ok(search_response());
        let query = Query::new()
            .with_text("cat")
            .with_page(5, 10)
            .with_sort(SortSpec::new("price").with_order(SortOrder::Desc))
            .with_filter(Filter::term("title", "cat"));
        let result = backend(transport.clone())
            .query(&query, &Dataset::from_endpoint("http://y.org/api/", "R2"))
            .await
            .unwrap();

        assert_eq!(result.total, 7);
        assert_eq!(result.hits, vec![json!({ "_id": 1, "price": 9.5, "title": "cat" })]);
        assert_eq!(result.fields[2].field_type, FieldType::Other("text".into()));

        let calls = transport.calls();
        assert_eq!(calls[0].1, "http://y.org/api/3/action/datastore_search");
        assert_eq!(
            calls[0].2,
            Some(json!({
                "resource_id": "R2",
                "q": "cat",
                "filters": { "title": "cat" },
                "limit": 5,
                "offset": 10,
                "sort": "price desc"
            }))
        );
    }

    #[tokio::test]
    async fn test_query_id_only_uses_default_endpoint() {
        let transport = RecordingTransport::ok(search_response());
        backend(transport.clone())
            .query(&Query::new(), &Dataset::from_id("R3"))
            .await
            .unwrap();
        assert_eq!(
            transport.calls()[0].1,
            "http://default.org/api/3/action/datastore_search"
        );
    }

    #[tokio::test]
    async fn test_transport_error_forwarded() {
        let transport = RecordingTransport::failing(404, "Resource not found");
        let err = backend(transport)
            .query(&Query::new(), &Dataset::from_id("missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Resource not found"));
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_request() {
        let transport = RecordingTransport::ok(search_response());
        let err = backend(transport.clone())
            .fetch(&Dataset::from_url("not-a-resource-url"))
            .await
            .unwrap_err();
        assert!(matches!(err, DataStoreError::InvalidUrl(_)));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_result() {
        let transport = RecordingTransport::ok(json!({
            "success": true,
            "result": { "fields": [], "records": [] }
        }));
        let err = backend(transport)
            .query(&Query::new(), &Dataset::from_id("R1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DataStoreError::MalformedResponse(_)));
    }
}
