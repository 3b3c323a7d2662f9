//! Credential renderer configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the external QR rendering service
#[derive(Debug, Clone, Deserialize)]
pub struct RendererSettings {
    /// Base URL of the rendering service
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl RendererSettings {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate renderer configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("RENDERER_BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidRendererUrl);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    5
}
