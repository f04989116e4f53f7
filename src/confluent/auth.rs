//! Confluent Cloud Authentication
//!
//! Cloud API keys are sent as HTTP basic credentials on every request.
//! The same key pair is used for control-plane and data-plane calls.

use super::error::{ClientError, Result};
use std::fmt;

/// Environment variable holding the Cloud API key
pub const API_KEY_ENV: &str = "CONFLUENT_CLOUD_API_KEY";

/// Environment variable holding the Cloud API secret
pub const API_SECRET_ENV: &str = "CONFLUENT_CLOUD_API_SECRET";

/// Environment variable overriding the control-plane endpoint
pub const ENDPOINT_ENV: &str = "CONFLUENT_CLOUD_ENDPOINT";

/// API key / secret pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Build credentials from optional parts, rejecting missing or blank values
    pub fn resolve(api_key: Option<String>, api_secret: Option<String>) -> Result<Self> {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let api_secret = api_secret.filter(|s| !s.trim().is_empty());

        match (api_key, api_secret) {
            (Some(key), Some(secret)) => Ok(Self::new(key, secret)),
            _ => Err(ClientError::MissingCredentials),
        }
    }

    /// Read credentials from `CONFLUENT_CLOUD_API_KEY` / `CONFLUENT_CLOUD_API_SECRET`
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(API_SECRET_ENV).ok(),
        )
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

// Security: the secret never reaches logs or panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}
