//! Shared resource envelope, references and pagination types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Envelope fields every Confluent Cloud resource carries
///
/// Resources hold this as a flattened field, so on the wire the fields sit
/// next to the resource's own `spec`/`status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseModel {
    pub api_version: String,
    pub kind: String,
    pub id: String,
    pub metadata: ObjectMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMeta {
    /// Canonical URL of the resource
    #[serde(rename = "self")]
    pub self_link: String,
    /// Confluent Resource Name (`crn://...`)
    pub resource_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Access to the common envelope of a resource
pub trait Resource {
    fn base(&self) -> &BaseModel;

    fn id(&self) -> &str {
        &self.base().id
    }

    fn kind(&self) -> &str {
        &self.base().kind
    }

    fn resource_name(&self) -> &str {
        &self.base().metadata.resource_name
    }
}

/// Reference from one resource to another (owner, environment, network...)
///
/// Requests only fill `id` and, for environment-scoped targets, `environment`.
/// Responses also carry the discovery fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectReference {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub related: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl ObjectReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn in_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudProvider {
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "GCP")]
    Gcp,
    #[serde(rename = "AZURE")]
    Azure,
    #[serde(untagged)]
    Other(String),
}

impl Default for CloudProvider {
    fn default() -> Self {
        CloudProvider::Other(String::new())
    }
}

impl CloudProvider {
    pub fn as_str(&self) -> &str {
        match self {
            CloudProvider::Aws => "AWS",
            CloudProvider::Gcp => "GCP",
            CloudProvider::Azure => "AZURE",
            CloudProvider::Other(value) => value,
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AWS" => Ok(CloudProvider::Aws),
            "GCP" => Ok(CloudProvider::Gcp),
            "AZURE" => Ok(CloudProvider::Azure),
            _ => Err(format!("unknown cloud provider '{}' (expected AWS, GCP or AZURE)", s)),
        }
    }
}

/// Page size and page token query parameters shared by list routes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// One page of a list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
}

impl ListMeta {
    /// Page token to pass in [`PaginationOptions::page_token`] for the next page
    pub fn next_page_token(&self) -> Option<String> {
        let next = Url::parse(self.next.as_deref()?).ok()?;
        next.query_pairs()
            .find(|(name, _)| name == "page_token")
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty())
    }
}

/// Request body wrapper nesting the payload under `"spec"`
#[derive(Debug, Serialize)]
pub(crate) struct SpecWrap<'a, T: Serialize> {
    pub spec: &'a T,
}
