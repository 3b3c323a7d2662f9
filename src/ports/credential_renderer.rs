//! Credential renderer port.
//!
//! Rendering a token into a displayable artifact (a QR image) is delegated
//! to an external collaborator. The stored token remains the source of
//! truth; a rendering is reconstructible from it on demand, so a rendering
//! failure never invalidates a persisted credential.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Renders an opaque credential token into displayable bytes (PNG).
#[async_trait]
pub trait CredentialRenderer: Send + Sync {
    /// Render the token.
    ///
    /// # Errors
    ///
    /// - `CredentialRenderingFailed` if the collaborator rejects the token
    ///   or is unreachable
    async fn render(&self, token: &str) -> Result<Vec<u8>, DomainError>;
}
