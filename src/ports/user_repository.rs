//! User repository port.
//!
//! Identity provisioning happens upstream (auth filter); the ticketing core
//! only needs to resolve buyer ids to known users.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::ticketing::User;

/// Read-only access to provisioned users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;
}
