// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! HTTP transport used to reach DataStore endpoints.
//!
//! The [`Transport`] trait is the only place requests leave the process.
//! [`HttpTransport`] implements it over `reqwest`; tests and embedders can
//! substitute their own implementation.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DataStoreConfig;
use crate::error::{DataStoreError, DataStoreResult};

/// Performs one HTTP request and returns the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` (if any) as JSON to `url` with `method`.
    ///
    /// Any failure, whether no response or a non-success status, is
    /// returned as [`DataStoreError::Transport`].
    async fn perform(&self, method: Method, url: &str, body: Option<&Value>)
        -> DataStoreResult<Value>;
}

/// [`Transport`] backed by a shared `reqwest` client.
pub struct HttpTransport {
    client: Client,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &DataStoreConfig) -> DataStoreResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }
        let client = builder.build().map_err(|e| {
            DataStoreError::transport(None, format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }
}

/// CKAN error payload: `{"success": false, "error": {"message": ...}}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    #[serde(rename = "__type")]
    kind: Option<String>,
}

/// Best human-readable message for a failed response body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: ErrorDetail {
                message: Some(message),
                ..
            },
        }) => message,
        Ok(ErrorBody {
            error: ErrorDetail {
                kind: Some(kind), ..
            },
        }) => kind,
        _ => body.to_string(),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> DataStoreResult<Value> {
        debug!(%method, url, "DataStore request");

        let mut req = self.client.request(method, url);
        if let Some(ref key) = self.api_key {
            req = req.header(reqwest::header::AUTHORIZATION, key);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            warn!(url, error = %e, "DataStore request failed");
            DataStoreError::transport(e.status().map(|s| s.as_u16()), e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = error_message(&text);
            warn!(url, status = status.as_u16(), %message, "DataStore returned an error");
            return Err(DataStoreError::transport(Some(status.as_u16()), message));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| DataStoreError::MalformedResponse(e.to_string()))
    }
}
