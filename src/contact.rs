use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::airtable::UpstreamError;
use crate::config::ContactSettings;
use crate::error::ApiError;

/// Contact form payload; the front end validates required fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSubmission {
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub interest_area: String,
    pub message: String,
    pub timestamp: String,
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct Relayed {
    pub success: bool,
    pub message: String,
}

/// Where contact submissions end up. [`HttpWebhook`] in production.
#[async_trait]
pub trait Webhook: Send + Sync {
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), UpstreamError>;
}

pub struct HttpWebhook {
    http: reqwest::Client,
    url: String,
}

impl HttpWebhook {
    pub fn new(url: String) -> Self {
        HttpWebhook {
            http: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Webhook for HttpWebhook {
    async fn deliver(&self, submission: &ContactSubmission) -> Result<(), UpstreamError> {
        let response = self.http.post(&self.url).json(submission).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Forwards contact submissions to the configured webhook.
#[derive(Clone)]
pub struct ContactRelay {
    webhook: Option<Arc<dyn Webhook>>,
}

impl ContactRelay {
    pub fn new(settings: &ContactSettings) -> Self {
        let webhook = settings
            .webhook_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .map(|url| Arc::new(HttpWebhook::new(url)) as Arc<dyn Webhook>);
        ContactRelay { webhook }
    }

    #[cfg(test)]
    pub fn with_webhook(webhook: Arc<dyn Webhook>) -> Self {
        ContactRelay {
            webhook: Some(webhook),
        }
    }

    pub async fn forward(&self, submission: &ContactSubmission) -> Result<Relayed, ApiError> {
        let webhook = self
            .webhook
            .as_ref()
            .ok_or_else(|| ApiError::ConfigurationMissing("contact webhook url".to_string()))?;

        webhook.deliver(submission).await.map_err(|e| {
            error!("Contact webhook failed: {}", e);
            ApiError::Submission(format!("Failed to submit contact form: {}", e))
        })?;

        info!("Contact submission relayed for {}", submission.email);
        Ok(Relayed {
            success: true,
            message: "Contact form submitted successfully".to_string(),
        })
    }
}
