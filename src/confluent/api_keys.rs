//! API keys (`iam/v2/api-keys`)
//!
//! A key belongs to an owner (user or service account) and is scoped to a
//! resource, usually a Kafka cluster. The secret is only returned by
//! [`ConfluentClient::create_api_key`]; later reads leave it empty.

use super::client::{ConfluentClient, NO_BODY, NO_QUERY};
use super::common::{BaseModel, ListResponse, ObjectReference, PaginationOptions, Resource, SpecWrap};
use super::error::Result;
use super::http::{segment, Expected};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

const API_KEYS_PATH: &str = "/iam/v2/api-keys";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateApiKeyReq {
    pub display_name: String,
    pub description: String,
    pub owner: ObjectReference,
    /// Omitted for Cloud API keys, which are not bound to a cluster
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ObjectReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateApiKeyReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKey {
    #[serde(flatten)]
    pub base: BaseModel,
    pub spec: ApiKeySpec,
}

impl Resource for ApiKey {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

impl ApiKey {
    /// Secret, present only in the creation response
    pub fn secret(&self) -> Option<&str> {
        self.spec.secret.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeySpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub display_name: String,
    pub description: String,
    pub owner: ObjectReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ObjectReference>,
}

impl fmt::Debug for ApiKeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeySpec")
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("display_name", &self.display_name)
            .field("description", &self.description)
            .field("owner", &self.owner)
            .field("resource", &self.resource)
            .finish()
    }
}

pub type ApiKeyList = ListResponse<ApiKey>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiKeyListOptions {
    #[serde(flatten)]
    pub pagination: PaginationOptions,
    /// Only keys owned by this user or service account
    #[serde(rename = "spec.owner", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Only keys scoped to this resource
    #[serde(rename = "spec.resource", skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

fn api_key_path(key_id: &str) -> String {
    format!("{}/{}", API_KEYS_PATH, segment(key_id))
}

impl ConfluentClient {
    pub async fn create_api_key(&self, create: &CreateApiKeyReq) -> Result<ApiKey> {
        tracing::info!("Creating API key '{}' for {}", create.display_name, create.owner.id);

        self.do_request(
            API_KEYS_PATH,
            Method::POST,
            Some(&SpecWrap { spec: create }),
            NO_QUERY,
        )
        .await?
        .expect(Expected::ACCEPTED, "create api key")?
        .json()
    }

    pub async fn list_api_keys(&self, opts: Option<&ApiKeyListOptions>) -> Result<ApiKeyList> {
        self.do_request(API_KEYS_PATH, Method::GET, NO_BODY, opts)
            .await?
            .expect(Expected::OK, "list api keys")?
            .json()
    }

    pub async fn get_api_key(&self, key_id: &str) -> Result<ApiKey> {
        self.do_request(&api_key_path(key_id), Method::GET, NO_BODY, NO_QUERY)
            .await?
            .expect(Expected::OK, "get api key")?
            .json()
    }

    pub async fn update_api_key(&self, key_id: &str, update: &UpdateApiKeyReq) -> Result<ApiKey> {
        self.do_request(
            &api_key_path(key_id),
            Method::PATCH,
            Some(&SpecWrap { spec: update }),
            NO_QUERY,
        )
        .await?
        .expect(Expected::OK, "update api key")?
        .json()
    }

    pub async fn delete_api_key(&self, key_id: &str) -> Result<()> {
        tracing::info!("Deleting API key {}", key_id);

        self.do_request(&api_key_path(key_id), Method::DELETE, NO_BODY, NO_QUERY)
            .await?
            .expect(Expected::NO_CONTENT, "delete api key")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confluent::http::query_pairs;
    use serde_json::json;

    #[test]
    fn test_create_request_body() {
        let create = CreateApiKeyReq {
            display_name: "payments-producer".to_string(),
            description: "producer key".to_string(),
            owner: ObjectReference::new("sa-123"),
            resource: Some(ObjectReference::new("lkc-456").in_environment("env-789")),
        };

        assert_eq!(
            serde_json::to_value(SpecWrap { spec: &create }).unwrap(),
            json!({
                "spec": {
                    "display_name": "payments-producer",
                    "description": "producer key",
                    "owner": {"id": "sa-123"},
                    "resource": {"id": "lkc-456", "environment": "env-789"}
                }
            })
        );
    }

    #[test]
    fn test_secret_only_when_present() {
        let created: ApiKey = serde_json::from_value(json!({
            "id": "ABCDEFGHIJ",
            "spec": {"secret": "s3cr3t", "owner": {"id": "sa-1"}}
        }))
        .unwrap();
        assert_eq!(created.secret(), Some("s3cr3t"));
        assert!(!format!("{:?}", created).contains("s3cr3t"));

        let read: ApiKey = serde_json::from_value(json!({
            "id": "ABCDEFGHIJ",
            "spec": {"owner": {"id": "sa-1"}}
        }))
        .unwrap();
        assert_eq!(read.secret(), None);
    }

    #[test]
    fn test_list_options_use_dotted_names() {
        let opts = ApiKeyListOptions {
            owner: Some("sa-1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query_pairs(&opts).unwrap(),
            vec![("spec.owner".to_string(), "sa-1".to_string())]
        );
    }
}
