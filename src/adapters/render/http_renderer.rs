//! HTTP adapter for the credential rendering collaborator.
//!
//! Rendering a token into a QR PNG is delegated to a separate service; this
//! adapter calls it over HTTP and treats any non-success as a rendering
//! failure. The stored token is never sent anywhere else and a failed
//! rendering leaves the credential untouched.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::CredentialRenderer;

/// Configuration for the rendering collaborator.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Base URL of the rendering service (e.g. "http://qr-renderer:9090").
    pub base_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl RendererConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn render_url(&self) -> String {
        format!("{}/render", self.base_url.trim_end_matches('/'))
    }
}

/// HTTP implementation of the CredentialRenderer port.
pub struct HttpCredentialRenderer {
    config: RendererConfig,
    client: reqwest::Client,
}

impl HttpCredentialRenderer {
    /// Creates a renderer client.
    ///
    /// # Errors
    ///
    /// Returns `CredentialRenderingFailed` if the HTTP client cannot be
    /// constructed.
    pub fn new(config: RendererConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::CredentialRenderingFailed,
                    format!("Failed to build renderer client: {}", e),
                )
            })?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl CredentialRenderer for HttpCredentialRenderer {
    async fn render(&self, token: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .client
            .get(self.config.render_url())
            .query(&[("token", token)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "renderer unreachable");
                DomainError::new(
                    ErrorCode::CredentialRenderingFailed,
                    format!("Renderer request failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::CredentialRenderingFailed,
                format!("Renderer returned status {}", response.status()),
            ));
        }

        let bytes = response.bytes().await.map_err(|e| {
            DomainError::new(
                ErrorCode::CredentialRenderingFailed,
                format!("Failed to read renderer response: {}", e),
            )
        })?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_url_handles_trailing_slash() {
        let config = RendererConfig::new("http://qr-renderer:9090/");
        assert_eq!(config.render_url(), "http://qr-renderer:9090/render");
    }

    #[test]
    fn client_builds_with_default_timeout() {
        let config = RendererConfig::new("http://qr-renderer:9090");
        assert!(HttpCredentialRenderer::new(config).is_ok());
    }
}
