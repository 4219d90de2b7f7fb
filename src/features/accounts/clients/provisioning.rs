use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::BackendConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Role;
use crate::features::reports::models::Department;

const PROVISION_ACCOUNT_RPC: &str = "provision_account";

/// Account to create in the identity provider, with its profile row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedAccount {
    pub user_id: Uuid,
    #[serde(default)]
    pub verification_sent: bool,
}

/// Error body returned by the backend RPC
#[derive(Debug, Deserialize)]
struct RpcErrorResponse {
    #[serde(default)]
    message: String,
}

/// Issues credentials and sends the verification notice for new accounts
#[async_trait]
pub trait AccountProvisioner: Send + Sync {
    async fn provision(&self, request: &ProvisionRequest) -> Result<ProvisionedAccount>;
}

/// Client for the backend's account provisioning RPC
pub struct ProvisioningClient {
    http_client: reqwest::Client,
    url: String,
    service_key: String,
}

impl ProvisioningClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: config.rpc_url(PROVISION_ACCOUNT_RPC),
            service_key: config.service_key.clone(),
        })
    }
}

/// Remote message from an error body, falling back to the raw body
fn remote_message(body: &str) -> String {
    serde_json::from_str::<RpcErrorResponse>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl AccountProvisioner for ProvisioningClient {
    async fn provision(&self, request: &ProvisionRequest) -> Result<ProvisionedAccount> {
        tracing::debug!("Provisioning {} account for {}", request.role, request.email);

        let response = self
            .http_client
            .post(&self.url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach provisioning service: {}", e);
                AppError::ExternalServiceError(format!("Provisioning service unreachable: {}", e))
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<ProvisionedAccount>().await.map_err(|e| {
                tracing::error!("Failed to parse provisioning response: {}", e);
                AppError::ExternalServiceError(format!(
                    "Failed to parse provisioning response: {}",
                    e
                ))
            });
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("Provisioning RPC error: HTTP {} - {}", status, body);
        Err(AppError::ExternalServiceError(remote_message(&body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_message() {
        assert_eq!(
            remote_message(r#"{"message":"User already registered"}"#),
            "User already registered"
        );
        assert_eq!(remote_message("gateway timeout"), "gateway timeout");
        assert_eq!(remote_message(r#"{"code":"500"}"#), r#"{"code":"500"}"#);
    }

    #[test]
    fn test_requester_request_omits_employee_fields() {
        let request = ProvisionRequest {
            email: "ana@example.com".to_string(),
            password: "abcdef".to_string(),
            role: Role::Requester,
            name: "Ana".to_string(),
            last_name: None,
            phone: None,
            department: None,
            title: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "email": "ana@example.com",
                "password": "abcdef",
                "role": "requester",
                "name": "Ana"
            })
        );
    }

    #[test]
    fn test_provisioned_account_parsing() {
        let id = Uuid::new_v4();
        let account: ProvisionedAccount =
            serde_json::from_value(json!({ "userId": id })).unwrap();
        assert_eq!(account.user_id, id);
        assert!(!account.verification_sent);
    }
}
