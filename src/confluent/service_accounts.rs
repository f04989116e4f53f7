//! Service accounts (`iam/v2/service-accounts`)
//!
//! Service accounts are the usual owners of cluster-scoped API keys.

use super::client::{ConfluentClient, NO_BODY, NO_QUERY};
use super::common::{BaseModel, ListResponse, PaginationOptions, Resource};
use super::error::Result;
use super::http::{segment, Expected};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const SERVICE_ACCOUNTS_PATH: &str = "/iam/v2/service-accounts";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceAccount {
    #[serde(flatten)]
    pub base: BaseModel,
    pub display_name: String,
    pub description: String,
}

impl Resource for ServiceAccount {
    fn base(&self) -> &BaseModel {
        &self.base
    }
}

pub type ServiceAccountList = ListResponse<ServiceAccount>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateServiceAccountReq {
    pub display_name: String,
    pub description: String,
}

/// Only the description can change after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateServiceAccountReq {
    pub description: String,
}

fn service_account_path(account_id: &str) -> String {
    format!("{}/{}", SERVICE_ACCOUNTS_PATH, segment(account_id))
}

impl ConfluentClient {
    pub async fn list_service_accounts(
        &self,
        opts: Option<&PaginationOptions>,
    ) -> Result<ServiceAccountList> {
        self.do_request(SERVICE_ACCOUNTS_PATH, Method::GET, NO_BODY, opts)
            .await?
            .expect(Expected::OK, "list service accounts")?
            .json()
    }

    pub async fn get_service_account(&self, account_id: &str) -> Result<ServiceAccount> {
        self.do_request(&service_account_path(account_id), Method::GET, NO_BODY, NO_QUERY)
            .await?
            .expect(Expected::OK, "get service account")?
            .json()
    }

    pub async fn create_service_account(
        &self,
        create: &CreateServiceAccountReq,
    ) -> Result<ServiceAccount> {
        tracing::info!("Creating service account '{}'", create.display_name);

        self.do_request(SERVICE_ACCOUNTS_PATH, Method::POST, Some(create), NO_QUERY)
            .await?
            .expect(Expected::CREATED, "create service account")?
            .json()
    }

    pub async fn update_service_account(
        &self,
        account_id: &str,
        update: &UpdateServiceAccountReq,
    ) -> Result<ServiceAccount> {
        self.do_request(&service_account_path(account_id), Method::PATCH, Some(update), NO_QUERY)
            .await?
            .expect(Expected::OK, "update service account")?
            .json()
    }

    pub async fn delete_service_account(&self, account_id: &str) -> Result<()> {
        tracing::info!("Deleting service account {}", account_id);

        self.do_request(&service_account_path(account_id), Method::DELETE, NO_BODY, NO_QUERY)
            .await?
            .expect(Expected::NO_CONTENT, "delete service account")?;
        Ok(())
    }
}
