// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! Resolving a dataset descriptor to an API endpoint and resource id.
//!
//! A dataset can be located in three ways, checked in order:
//!
//! 1. `endpoint` + `id`: the id is the resource id on that CKAN instance.
//! 2. `url`: a resource page URL such as
//!    `http://demo.ckan.org/dataset/some-dataset/resource/<id>`, from which
//!    both the endpoint and the id are derived.
//! 3. `id` alone: the resource lives on the configured default endpoint.

use serde::{Deserialize, Serialize};

use crate::config::normalize_endpoint;
use crate::error::{DataStoreError, DataStoreResult};

/// Segments following the site root in a resource page URL:
/// `dataset/<name>/resource/<id>`.
const RESOURCE_PATH_SEGMENTS: usize = 4;

/// Caller-side description of a dataset backed by a DataStore resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Dataset {
    pub fn from_endpoint(endpoint: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            id: Some(id.into()),
            url: None,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// API endpoint and resource id a request is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub endpoint: String,
    pub resource_id: String,
}

/// Parse a CKAN resource page URL into its API endpoint and resource id.
///
/// `http://x.org/dataset/d/resource/R1` resolves to endpoint
/// `http://x.org/api` and resource id `R1`.
pub fn parse_resource_url(url: &str) -> DataStoreResult<ResourceLocation> {
    let parts: Vec<&str> = url.split('/').collect();
    if parts.len() <= RESOURCE_PATH_SEGMENTS {
        return Err(DataStoreError::InvalidUrl(format!(
            "'{}' has too few path segments",
            url
        )));
    }

    let resource_id = parts[parts.len() - 1];
    let site = parts[..parts.len() - RESOURCE_PATH_SEGMENTS].join("/");
    if resource_id.is_empty() || site.is_empty() {
        return Err(DataStoreError::InvalidUrl(format!(
            "'{}' does not name a resource",
            url
        )));
    }

    Ok(ResourceLocation {
        endpoint: format!("{}/api", site),
        resource_id: resource_id.to_string(),
    })
}

/// Resolves datasets, falling back to a default endpoint for id-only
/// descriptors.
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    default_endpoint: String,
}

impl ResourceLocator {
    pub fn new(default_endpoint: impl Into<String>) -> Self {
        Self {
            default_endpoint: normalize_endpoint(default_endpoint.into()),
        }
    }

    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    pub fn resolve(&self, dataset: &Dataset) -> DataStoreResult<ResourceLocation> {
        if let Some(endpoint) = dataset.endpoint.as_ref().filter(|e| !e.is_empty()) {
            let resource_id = dataset.id.clone().ok_or_else(|| {
                DataStoreError::InvalidDataset(format!(
                    "dataset with endpoint '{}' has no id",
                    endpoint
                ))
            })?;
            return Ok(ResourceLocation {
                endpoint: normalize_endpoint(endpoint.clone()),
                resource_id,
            });
        }

        if let Some(url) = &dataset.url {
            return parse_resource_url(url);
        }

        match &dataset.id {
            Some(id) => Ok(ResourceLocation {
                endpoint: self.default_endpoint.clone(),
                resource_id: id.clone(),
            }),
            None => Err(DataStoreError::InvalidDataset(
                "dataset needs an endpoint and id, a resource url, or an id".to_string(),
            )),
        }
    }
}
