//! HTTP transport to the generation service
//!
//! The orchestrator talks to the service through the `GenerationTransport`
//! trait so that dispatch logic can be exercised without a network. The
//! production implementation uses a shared, lazily-initialized reqwest
//! client with connection pooling.

use super::classify::RawResponse;
use super::error::GenerateError;
use super::types::{Attachment, GenerateConfig, TextGenerationPayload};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

/// Global HTTP client for generation service calls
///
/// - 120s ceiling for long-running generation requests (per-request timeout
///   comes from `GenerateConfig`)
/// - connection pooling and keepalive for repeated panel actions
static GENERATION_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(8)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .build()
        .expect("Failed to create generation HTTP client")
});

/// One outbound request/response cycle to the generation service
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    /// Send a structured JSON request to the text endpoint
    async fn post_text(
        &self,
        payload: &TextGenerationPayload,
    ) -> Result<RawResponse, GenerateError>;

    /// Send the attachment plus optional topic as multipart to the file endpoint
    async fn post_file(
        &self,
        attachment: &Attachment,
        request_type: &str,
        topic: Option<&str>,
    ) -> Result<RawResponse, GenerateError>;
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    config: GenerateConfig,
}

impl HttpTransport {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Collect status, declared content type, and body from a response
    async fn collect(
        response: reqwest::Response,
        endpoint: &str,
    ) -> Result<RawResponse, GenerateError> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| GenerateError::transport(endpoint, e))?
            .to_vec();

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn post_text(
        &self,
        payload: &TextGenerationPayload,
    ) -> Result<RawResponse, GenerateError> {
        let endpoint = &self.config.text_endpoint;
        tracing::debug!("[Transport] POST {} ({})", endpoint, payload.request_type);

        let response = GENERATION_CLIENT
            .post(endpoint)
            .timeout(self.timeout())
            .json(payload)
            .send()
            .await
            .map_err(|e| GenerateError::transport(endpoint, e))?;

        Self::collect(response, endpoint).await
    }

    async fn post_file(
        &self,
        attachment: &Attachment,
        request_type: &str,
        topic: Option<&str>,
    ) -> Result<RawResponse, GenerateError> {
        let endpoint = &self.config.file_endpoint;
        tracing::debug!(
            "[Transport] POST {} ({}, file '{}', {} bytes)",
            endpoint,
            request_type,
            attachment.file_name,
            attachment.byte_size()
        );

        let file_part = Part::bytes(attachment.bytes.clone())
            .file_name(attachment.file_name.clone())
            .mime_str(&attachment.mime_type)
            .map_err(|e| GenerateError::transport(endpoint, e))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("request_type", request_type.to_string());

        if let Some(topic) = topic.filter(|t| !t.trim().is_empty()) {
            form = form.text("topic", topic.to_string());
        }

        // The multipart boundary and Content-Type header are managed by
        // reqwest; setting them by hand breaks the upload.
        let response = GENERATION_CLIENT
            .post(endpoint)
            .timeout(self.timeout())
            .multipart(form)
            .send()
            .await
            .map_err(|e| GenerateError::transport(endpoint, e))?;

        Self::collect(response, endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_singleton() {
        let a: &Client = &GENERATION_CLIENT;
        let b: &Client = &GENERATION_CLIENT;
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_transport_uses_configured_timeout() {
        let transport = HttpTransport::new(GenerateConfig {
            timeout_secs: 7,
            ..GenerateConfig::default()
        });
        assert_eq!(transport.timeout(), Duration::from_secs(7));
    }
}
