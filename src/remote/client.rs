use crate::error::{SenderError, SenderResult};
use crate::remote::{MailService, SendRequest, SendStatus};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

const SEND_PATH: &str = "send-email";
const STOP_PATH: &str = "stop-email";
const STATUS_PATH: &str = "email-status";

/// HTTP client for the mail service
#[derive(Debug, Clone)]
pub struct HttpMailService {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
}

impl HttpMailService {
    /// Create a client rooted at `base_url`
    pub fn new(base_url: &Url, request_timeout: Duration) -> SenderResult<Self> {
        let mut base_url = base_url.clone();
        // Url::join replaces the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("email-sender/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an endpoint
    pub fn endpoint(&self, path: &str) -> SenderResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SenderError::config(format!("Invalid endpoint {}: {}", path, e)))
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> SenderResult<Response> {
        let response = timeout(self.request_timeout, request.send())
            .await
            .map_err(|_| SenderError::Timeout)??;
        Self::check_status(response).await
    }

    /// Map a non-2xx response to [`SenderError::RemoteStatus`]
    async fn check_status(response: Response) -> SenderResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(SenderError::RemoteStatus { status, message })
    }
}

#[async_trait]
impl MailService for HttpMailService {
    async fn start_send(&self, request: &SendRequest) -> SenderResult<()> {
        let url = self.endpoint(SEND_PATH)?;
        tracing::info!(
            "Requesting send of {:?} from {} to {} recipients",
            request.subject,
            request.sender,
            request.recipients.len()
        );

        // The service may hold this request open until the whole batch is
        // out, so it runs without `request_timeout`
        let response = self.client.post(url).json(&request.wire()).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn stop_send(&self) -> SenderResult<()> {
        let url = self.endpoint(STOP_PATH)?;
        tracing::info!("Requesting stop of the current send");

        self.execute(self.client.post(url)).await?;
        Ok(())
    }

    async fn poll_status(&self) -> SenderResult<SendStatus> {
        let url = self.endpoint(STATUS_PATH)?;
        let response = self.execute(self.client.get(url)).await?;

        let body = timeout(self.request_timeout, response.text())
            .await
            .map_err(|_| SenderError::Timeout)??;
        let status: SendStatus = serde_json::from_str(&body)
            .map_err(|e| SenderError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            "Status: {}/{} sent, {} failed, all sent: {}",
            status.sent,
            status.total,
            status.failed,
            status.all_emails_sent
        );
        Ok(status)
    }
}
