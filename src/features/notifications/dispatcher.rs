use async_trait::async_trait;

use crate::core::config::BackendConfig;
use crate::features::notifications::models::ReportUpdatedNotice;

const NOTIFY_REPORT_UPDATED_RPC: &str = "notify_report_updated";

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport failed: {0}")]
    Transport(String),

    #[error("notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers change notices to report creators
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify_report_updated(
        &self,
        notice: &ReportUpdatedNotice,
    ) -> Result<(), NotificationError>;
}

/// Dispatcher calling the backend's notification RPC, which fans out to
/// the creator's devices
pub struct HttpNotificationDispatcher {
    http_client: reqwest::Client,
    url: String,
    service_key: String,
}

impl HttpNotificationDispatcher {
    pub fn new(config: &BackendConfig) -> Result<Self, NotificationError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            url: config.rpc_url(NOTIFY_REPORT_UPDATED_RPC),
            service_key: config.service_key.clone(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for HttpNotificationDispatcher {
    async fn notify_report_updated(
        &self,
        notice: &ReportUpdatedNotice,
    ) -> Result<(), NotificationError> {
        let response = self
            .http_client
            .post(&self.url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(notice)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                "Notification delivered for report {} to {}",
                notice.report_id,
                notice.recipient_user_id
            );
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_dispatcher_targets_notification_rpc() {
        let config = BackendConfig {
            base_url: "https://backend.example.com".to_string(),
            service_key: "service-key".to_string(),
            timeout: Duration::from_secs(5),
        };
        let dispatcher = HttpNotificationDispatcher::new(&config).unwrap();
        assert_eq!(
            dispatcher.url,
            "https://backend.example.com/rest/v1/rpc/notify_report_updated"
        );
    }
}
