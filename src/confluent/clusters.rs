//! Kafka clusters (`cmk/v2`) and broker configs (`kafka/v3`)
//!
//! Cluster lifecycle calls go to the control plane. Broker config updates
//! go to the cluster's own REST endpoint (`spec.http_endpoint`), which the
//! caller passes in as `rest_endpoint`.
//!
//! Creation and updates are asynchronous on the server side: the API answers
//! 202 and the cluster's `status.phase` moves on its own. This client never
//! polls; use [`ConfluentClient::get_kafka_cluster`] to observe progress.

use super::client::{ConfluentClient, NO_BODY, NO_QUERY};
use super::common::{
    BaseModel, CloudProvider, ListResponse, ObjectReference, PaginationOptions, Resource, SpecWrap,
};
use super::error::Result;
use super::http::{segment, Expected};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CLUSTERS_PATH: &str = "/cmk/v2/clusters";

/// Phases reported once a cluster is usable
pub const PHASE_PROVISIONED: &str = "PROVISIONED";
pub const PHASE_READY: &str = "READY";

/// Phase reported while a cluster is being created
pub const PHASE_PROVISIONING: &str = "PROVISIONING";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KafkaClusterAvailability {
    #[serde(rename = "SINGLE_ZONE")]
    SingleZone,
    #[serde(rename = "MULTI_ZONE")]
    MultiZone,
    /// Any value this client does not know, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl Default for KafkaClusterAvailability {
    fn default() -> Self {
        KafkaClusterAvailability::Other(String::new())
    }
}

impl KafkaClusterAvailability {
    pub fn as_str(&self) -> &str {
        match self {
            KafkaClusterAvailability::SingleZone => "SINGLE_ZONE",
            KafkaClusterAvailability::MultiZone => "MULTI_ZONE",
            KafkaClusterAvailability::Other(value) => value,
        }
    }
}

impl fmt::Display for KafkaClusterAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KafkaClusterAvailability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "SINGLE_ZONE" => Ok(KafkaClusterAvailability::SingleZone),
            "MULTI_ZONE" => Ok(KafkaClusterAvailability::MultiZone),
            _ => Err(format!(
                "unknown availability '{}' (expected SINGLE_ZONE or MULTI_ZONE)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KafkaClusterKind {
    Basic,
    Standard,
    Dedicated,
    /// Kinds added server-side (e.g. `Enterprise`, `Freight`)
    #[serde(untagged)]
    Other(String),
}

impl Default for KafkaClusterKind {
    fn default() -> Self {
        KafkaClusterKind::Other(String::new())
    }
}

impl KafkaClusterKind {
    pub fn as_str(&self) -> &str {
        match self {
            KafkaClusterKind::Basic => "Basic",
            KafkaClusterKind::Standard => "Standard",
            KafkaClusterKind::Dedicated => "Dedicated",
            KafkaClusterKind::Other(value) => value,
        }
    }
}

impl fmt::Display for KafkaClusterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KafkaClusterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(KafkaClusterKind::Basic),
            "standard" => Ok(KafkaClusterKind::Standard),
            "dedicated" => Ok(KafkaClusterKind::Dedicated),
            _ => Err(format!(
                "unknown cluster kind '{}' (expected Basic, Standard or Dedicated)",
                s
            )),
        }
    }
}

/// A Confluent Cloud Kafka cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaCluster {
    #[serde(flatten)]
    pub base: BaseModel,
    pub spec: KafkaClusterSpec,
    pub status: KafkaClusterStatus,
}

impl Resource for KafkaCluster {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

impl KafkaCluster {
    pub fn is_provisioned(&self) -> bool {
        matches!(self.status.phase.as_str(), PHASE_PROVISIONED | PHASE_READY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaClusterSpec {
    pub display_name: String,
    pub availability: KafkaClusterAvailability,
    pub cloud: CloudProvider,
    pub region: String,
    pub kafka_bootstrap_endpoint: String,
    /// REST endpoint of the cluster, the host for broker config calls
    pub http_endpoint: String,
    pub config: KafkaClusterConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<ObjectReference>,
    pub environment: ObjectReference,
}

/// Capacity configuration; `cku` and `zones` only apply to Dedicated clusters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaClusterConfig {
    pub kind: KafkaClusterKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cku: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaClusterStatus {
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cku: Option<u32>,
}

pub type KafkaClusterList = ListResponse<KafkaCluster>;

/// Query options for cluster routes; `environment` is required by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KafkaClusterListOptions {
    #[serde(flatten)]
    pub pagination: PaginationOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl KafkaClusterListOptions {
    pub fn for_environment(environment: impl Into<String>) -> Self {
        Self {
            environment: Some(environment.into()),
            ..Default::default()
        }
    }
}

/// Capacity requested on create or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaClusterConfigReq {
    pub kind: KafkaClusterKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cku: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaClusterCreateReq {
    pub display_name: String,
    pub availability: KafkaClusterAvailability,
    pub cloud: CloudProvider,
    pub region: String,
    pub config: KafkaClusterConfigReq,
    pub environment: ObjectReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<ObjectReference>,
}

/// Mutable fields of a cluster; unset fields are left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaClusterUpdateReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<KafkaClusterConfigReq>,
    pub environment: ObjectReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfigOperation {
    Set,
    Delete,
}

/// One broker config mutation; either `value` (set) or `operation: DELETE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigUpdateEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<ConfigOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ConfigUpdateEntry {
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation: None,
            value: Some(value.into()),
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation: Some(ConfigOperation::Delete),
            value: None,
        }
    }
}

/// Batch of broker config mutations for `broker-configs:alter`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KafkaClusterConfigUpdateReq {
    pub data: Vec<ConfigUpdateEntry>,
}

#[derive(Serialize)]
struct ConfigValue<'a> {
    value: &'a str,
}

fn cluster_path(cluster_id: &str) -> String {
    format!("{}/{}", CLUSTERS_PATH, segment(cluster_id))
}

fn broker_configs_alter_path(cluster_id: &str) -> String {
    format!("/kafka/v3/clusters/{}/broker-configs:alter", segment(cluster_id))
}

fn broker_config_path(cluster_id: &str, config: &str) -> String {
    format!(
        "/kafka/v3/clusters/{}/broker-configs/{}",
        segment(cluster_id),
        segment(config)
    )
}

impl ConfluentClient {
    /// List one page of Kafka clusters
    pub async fn list_kafka_clusters(
        &self,
        opts: Option<&KafkaClusterListOptions>,
    ) -> Result<KafkaClusterList> {
        self.do_request(CLUSTERS_PATH, Method::GET, NO_BODY, opts)
            .await?
            .expect(Expected::OK, "list kafka clusters")?
            .json()
    }

    pub async fn get_kafka_cluster(
        &self,
        cluster_id: &str,
        opts: Option<&KafkaClusterListOptions>,
    ) -> Result<KafkaCluster> {
        self.do_request(&cluster_path(cluster_id), Method::GET, NO_BODY, opts)
            .await?
            .expect(Expected::OK, "get kafka cluster")?
            .json()
    }

    /// Request a new cluster; it comes back in the `PROVISIONING` phase
    pub async fn create_kafka_cluster(&self, create: &KafkaClusterCreateReq) -> Result<KafkaCluster> {
        tracing::info!(
            "Creating {} cluster '{}' in {} {}",
            create.config.kind,
            create.display_name,
            create.cloud,
            create.region
        );

        self.do_request(
            CLUSTERS_PATH,
            Method::POST,
            Some(&SpecWrap { spec: create }),
            NO_QUERY,
        )
        .await?
        .expect(Expected::ACCEPTED, "create kafka cluster")?
        .json()
    }

    pub async fn update_kafka_cluster(
        &self,
        cluster_id: &str,
        update: &KafkaClusterUpdateReq,
    ) -> Result<KafkaCluster> {
        self.do_request(
            &cluster_path(cluster_id),
            Method::PATCH,
            Some(&SpecWrap { spec: update }),
            NO_QUERY,
        )
        .await?
        .expect(Expected::ACCEPTED, "update kafka cluster")?
        .json()
    }

    /// Delete a cluster; the API answers either 200 or 204
    pub async fn delete_kafka_cluster(
        &self,
        cluster_id: &str,
        opts: Option<&KafkaClusterListOptions>,
    ) -> Result<()> {
        tracing::info!("Deleting kafka cluster {}", cluster_id);

        self.do_request(&cluster_path(cluster_id), Method::DELETE, NO_BODY, opts)
            .await?
            .expect(Expected::OK_OR_NO_CONTENT, "delete kafka cluster")?;
        Ok(())
    }

    /// Apply a batch of broker config changes through the cluster REST endpoint
    pub async fn update_kafka_cluster_configs(
        &self,
        rest_endpoint: &str,
        cluster_id: &str,
        update: &KafkaClusterConfigUpdateReq,
    ) -> Result<()> {
        self.do_request_by_host(
            rest_endpoint,
            &broker_configs_alter_path(cluster_id),
            Method::POST,
            Some(update),
            NO_QUERY,
        )
        .await?
        .expect(Expected::NO_CONTENT, "update kafka cluster configs")?;
        Ok(())
    }

    /// Set a single broker config through the cluster REST endpoint
    pub async fn update_kafka_cluster_config(
        &self,
        rest_endpoint: &str,
        cluster_id: &str,
        config: &str,
        value: &str,
    ) -> Result<()> {
        self.do_request_by_host(
            rest_endpoint,
            &broker_config_path(cluster_id, config),
            Method::PUT,
            Some(&ConfigValue { value }),
            NO_QUERY,
        )
        .await?
        .expect(Expected::NO_CONTENT, "update kafka cluster config")?;
        Ok(())
    }
}
