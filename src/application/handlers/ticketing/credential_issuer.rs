//! CredentialIssuer - mints the redemption credential for a new ticket.

use std::sync::Arc;

use tracing::error;

use crate::domain::foundation::Timestamp;
use crate::domain::ticketing::{Credential, Ticket, TicketingError};
use crate::ports::CredentialRepository;

/// Mints exactly one active credential per purchased ticket.
///
/// Called after the reservation commit is durable. The token is generated
/// here (random, unguessable from the ticket id); rendering it into an
/// image is a separate read-side concern.
pub struct CredentialIssuer {
    credentials: Arc<dyn CredentialRepository>,
}

impl CredentialIssuer {
    pub fn new(credentials: Arc<dyn CredentialRepository>) -> Self {
        Self { credentials }
    }

    /// Mint and persist an active credential bound to the ticket.
    pub async fn issue(&self, ticket: &Ticket) -> Result<Credential, TicketingError> {
        let credential = Credential::mint(ticket.id, Timestamp::now());

        self.credentials.save(&credential).await.map_err(|e| {
            error!(ticket_id = %ticket.id, error = %e, "failed to persist credential");
            TicketingError::credential_generation_failed(e.to_string())
        })?;

        Ok(credential)
    }
}
