// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

/// API endpoint used for datasets that carry only a resource id.
pub const DEFAULT_API_ENDPOINT: &str = "http://datahub.io/api";

/// Configuration for connecting to CKAN DataStore instances.
#[derive(Debug, Clone)]
pub struct DataStoreConfig {
    /// Fallback API endpoint (e.g., `http://datahub.io/api`).
    pub endpoint: String,
    /// Optional CKAN API key, sent in the `Authorization` header.
    pub api_key: Option<String>,
    /// Optional request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for DataStoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_ENDPOINT)
    }
}

impl DataStoreConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint.into()),
            api_key: None,
            timeout_secs: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Strip a single trailing slash from an endpoint URL.
pub(crate) fn normalize_endpoint(endpoint: String) -> String {
    match endpoint.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => endpoint,
    }
}
