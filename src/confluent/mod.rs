//! Confluent Cloud API interaction module
//!
//! Typed operations for the Confluent Cloud REST APIs. Every operation is one
//! HTTP round trip: build the route, send the JSON body, check the status
//! against the operation's documented success code(s), decode the response.
//! Nothing here retries, caches or polls.
//!
//! # Module Structure
//!
//! - [`auth`] - Cloud API key credentials
//! - [`client`] - Main client and the request helpers
//! - [`http`] - URL building, status checks and the HTTP transport
//! - [`common`] - Resource envelope, references and pagination
//! - [`clusters`] - Kafka clusters and broker configs
//! - [`api_keys`] - API keys
//! - [`environments`] - Environments
//! - [`service_accounts`] - Service accounts
//! - [`error`] - Error type
//!
//! # Example
//!
//! ```ignore
//! use ccloud_client::confluent::client::ConfluentClient;
//! use ccloud_client::confluent::clusters::KafkaClusterListOptions;
//!
//! async fn example() -> ccloud_client::confluent::error::Result<()> {
//!     let client = ConfluentClient::from_env()?;
//!     let opts = KafkaClusterListOptions::for_environment("env-abc123");
//!     let page = client.list_kafka_clusters(Some(&opts)).await?;
//!     for cluster in page.data {
//!         println!("{} {}", cluster.base.id, cluster.spec.display_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api_keys;
pub mod auth;
pub mod client;
pub mod clusters;
pub mod common;
pub mod environments;
pub mod error;
pub mod http;
pub mod service_accounts;

pub use client::{ClientConfig, ConfluentClient};
pub use error::ClientError;
