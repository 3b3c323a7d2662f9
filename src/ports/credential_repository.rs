//! Credential repository port.

use async_trait::async_trait;

use crate::domain::foundation::{CredentialId, DomainError, TicketId, UserId};
use crate::domain::ticketing::Credential;

/// Repository port for redemption credentials.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Persist a freshly minted credential.
    ///
    /// # Errors
    ///
    /// - `CredentialGenerationFailed` if the ticket already has an active
    ///   credential (one active credential per ticket)
    /// - `DatabaseError` on persistence failure
    async fn save(&self, credential: &Credential) -> Result<(), DomainError>;

    /// Find a credential by id, only if it is still active.
    ///
    /// Returns `None` for unknown ids and for revoked credentials alike.
    async fn find_active(&self, id: &CredentialId) -> Result<Option<Credential>, DomainError>;

    /// Find the credential of a ticket, scoped to the buyer who owns the
    /// ticket.
    ///
    /// Returns `None` when the ticket has no credential, does not exist, or
    /// belongs to another buyer; callers cannot distinguish the cases, so
    /// existence never leaks across buyers.
    async fn find_for_buyer(
        &self,
        ticket_id: &TicketId,
        buyer_id: &UserId,
    ) -> Result<Option<Credential>, DomainError>;
}
