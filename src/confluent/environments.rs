//! Environments (`org/v2/environments`)

use super::client::{ConfluentClient, NO_BODY, NO_QUERY};
use super::common::{BaseModel, ListResponse, PaginationOptions, Resource};
use super::error::Result;
use super::http::{segment, Expected};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const ENVIRONMENTS_PATH: &str = "/org/v2/environments";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    #[serde(flatten)]
    pub base: BaseModel,
    pub display_name: String,
}

impl Resource for Environment {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

pub type EnvironmentList = ListResponse<Environment>;

/// Create and update share the same body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentReq {
    pub display_name: String,
}

fn environment_path(environment_id: &str) -> String {
    format!("{}/{}", ENVIRONMENTS_PATH, segment(environment_id))
}

impl ConfluentClient {
    pub async fn list_environments(&self, opts: Option<&PaginationOptions>) -> Result<EnvironmentList> {
        self.do_request(ENVIRONMENTS_PATH, Method::GET, NO_BODY, opts)
            .await?
            .expect(Expected::OK, "list environments")?
            .json()
    }

    pub async fn get_environment(&self, environment_id: &str) -> Result<Environment> {
        self.do_request(&environment_path(environment_id), Method::GET, NO_BODY, NO_QUERY)
            .await?
            .expect(Expected::OK, "get environment")?
            .json()
    }

    pub async fn create_environment(&self, create: &EnvironmentReq) -> Result<Environment> {
        tracing::info!("Creating environment '{}'", create.display_name);

        self.do_request(ENVIRONMENTS_PATH, Method::POST, Some(create), NO_QUERY)
            .await?
            .expect(Expected::CREATED, "create environment")?
            .json()
    }

    pub async fn update_environment(
        &self,
        environment_id: &str,
        update: &EnvironmentReq,
    ) -> Result<Environment> {
        self.do_request(&environment_path(environment_id), Method::PATCH, Some(update), NO_QUERY)
            .await?
            .expect(Expected::OK, "update environment")?
            .json()
    }

    pub async fn delete_environment(&self, environment_id: &str) -> Result<()> {
        tracing::info!("Deleting environment {}", environment_id);

        self.do_request(&environment_path(environment_id), Method::DELETE, NO_BODY, NO_QUERY)
            .await?
            .expect(Expected::NO_CONTENT, "delete environment")?;
        Ok(())
    }
}
