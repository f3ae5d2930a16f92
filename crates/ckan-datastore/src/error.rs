// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! Error type shared by every DataStore operation.

use thiserror::Error;

/// Errors that can occur while resolving, querying, or decoding a resource.
#[derive(Debug, Error)]
pub enum DataStoreError {
    /// Network or HTTP failure reported by the transport.
    ///
    /// `status` is `None` when no HTTP response was received at all.
    #[error("{}", transport_message(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
    },
    /// A resource URL that does not have the
    /// `<site>/dataset/<name>/resource/<id>` shape.
    #[error("Invalid resource URL: {0}")]
    InvalidUrl(String),
    /// A dataset descriptor missing the values needed to locate a resource.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
    /// A response that could not be decoded into the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// A request body that could not be encoded; nothing was sent.
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("DataStore transport error (HTTP {}): {}", code, message),
        None => format!("DataStore transport error: {}", message),
    }
}

impl DataStoreError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// True when the server answered 404, i.e. the resource does not exist.
    ///
    /// CKAN reports a missing resource and a failed request through the same
    /// error channel; the status code is the only thing telling them apart.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type DataStoreResult<T> = std::result::Result<T, DataStoreError>;
