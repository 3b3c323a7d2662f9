//! HTTP listener settings.
//!
//! Bind address, deployment environment, the request timeout enforced by
//! the tower middleware, and the CORS allow-list. Every field has a
//! development-friendly default so a bare environment still boots; only
//! the database and renderer sections require explicit values.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use super::error::ValidationError;

/// Settings for the HTTP listener and its middleware stack.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// IP address the listener binds to.
    #[serde(default = "default_bind_host")]
    pub host: String,

    /// TCP port for the API.
    #[serde(default = "default_bind_port")]
    pub port: u16,

    /// Deployment environment; gates production-only behavior.
    #[serde(default)]
    pub environment: Environment,

    /// Tracing filter used when RUST_LOG is not set.
    #[serde(default = "default_filter")]
    pub log_level: String,

    /// Upper bound on request handling time, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Comma-separated CORS origin allow-list; unset allows any origin.
    #[serde(default)]
    pub cors_origins: Option<String>,
}

/// Where the service believes it is running.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// The address the TCP listener binds to.
    ///
    /// Call after [`validate`](Self::validate) has accepted the host.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip: IpAddr = self.host.parse().expect("host accepted by validate()");
        SocketAddr::new(ip, self.port)
    }

    /// Whether the service runs in the production environment.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// The CORS allow-list, split on commas, trimmed, blanks dropped.
    ///
    /// An empty list means "allow any origin" (development mode).
    pub fn cors_origins_list(&self) -> Vec<String> {
        match &self.cors_origins {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Reject values the listener cannot start with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(ValidationError::InvalidHost);
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_bind_host(),
            port: default_bind_port(),
            environment: Environment::default(),
            log_level: default_filter(),
            request_timeout_secs: default_request_timeout_secs(),
            cors_origins: None,
        }
    }
}

fn default_bind_host() -> String {
    "0.0.0.0".into()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_filter() -> String {
    "info,ticketline=debug,sqlx=warn".into()
}

fn default_request_timeout_secs() -> u64 {
    30
}
