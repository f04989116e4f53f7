//! Confluent Cloud Client
//!
//! Main client for the Confluent Cloud REST APIs, combining credentials
//! and HTTP functionality. Resource operations live in sibling modules as
//! `impl ConfluentClient` blocks.

use super::auth::{Credentials, ENDPOINT_ENV};
use super::error::Result;
use super::http::{build_url, HttpClient, RawResponse};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Default control-plane endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.confluent.cloud";

/// Placeholder for requests without a JSON body
pub const NO_BODY: Option<&'static ()> = None;

/// Placeholder for requests without query options
pub const NO_QUERY: Option<&'static ()> = None;

/// Transport settings supplied by the embedding application
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Control-plane base URL
    pub endpoint: String,
    pub user_agent: String,
    /// Whole-request timeout; none by default
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!("ccloud-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

/// Main Confluent Cloud client
#[derive(Clone)]
pub struct ConfluentClient {
    pub credentials: Credentials,
    pub http: HttpClient,
    endpoint: String,
}

impl ConfluentClient {
    /// Create a new client
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Url::parse(&config.endpoint)?;
        let http = HttpClient::new(&config.user_agent, config.timeout)?;

        Ok(Self {
            credentials,
            http,
            endpoint: config.endpoint,
        })
    }

    /// Create a client from `CONFLUENT_CLOUD_*` environment variables
    pub fn from_env() -> Result<Self> {
        let credentials = Credentials::from_env()?;
        let mut config = ClientConfig::default();
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        Self::new(credentials, config)
    }

    /// Create a client around an existing reqwest client
    pub fn with_http_client(
        credentials: Credentials,
        endpoint: &str,
        client: reqwest::Client,
    ) -> Result<Self> {
        Url::parse(endpoint)?;

        Ok(Self {
            credentials,
            http: HttpClient::from_client(client),
            endpoint: endpoint.to_string(),
        })
    }

    /// Control-plane base URL in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one request to the control plane
    pub async fn do_request<B, Q>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        self.do_request_by_host(&self.endpoint, path, method, body, query)
            .await
    }

    /// Send one request to an explicit host (a cluster's REST endpoint)
    pub async fn do_request_by_host<B, Q>(
        &self,
        host: &str,
        path: &str,
        method: Method,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let url = build_url(host, path, query)?;
        self.http.send(method, url, &self.credentials, body).await
    }
}
