//! FetchCredentialImageHandler - query handler for a ticket's QR image.

use std::sync::Arc;

use tracing::error;

use crate::domain::foundation::{TicketId, UserId};
use crate::domain::ticketing::TicketingError;
use crate::ports::{CredentialRenderer, CredentialRepository};

/// Query for the rendered credential of one of the buyer's tickets.
#[derive(Debug, Clone)]
pub struct FetchCredentialImageQuery {
    pub buyer_id: UserId,
    pub ticket_id: TicketId,
}

/// Handler for the credential image read.
///
/// The lookup is scoped to the requesting buyer: a ticket owned by someone
/// else yields the same not-found as a ticket that does not exist, so the
/// endpoint leaks nothing. The rendering is regenerated from the stored
/// token on every call; a render failure is reported as not-found per the
/// external contract and never touches the persisted credential.
pub struct FetchCredentialImageHandler {
    credentials: Arc<dyn CredentialRepository>,
    renderer: Arc<dyn CredentialRenderer>,
}

impl FetchCredentialImageHandler {
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        renderer: Arc<dyn CredentialRenderer>,
    ) -> Self {
        Self {
            credentials,
            renderer,
        }
    }

    pub async fn handle(
        &self,
        query: FetchCredentialImageQuery,
    ) -> Result<Vec<u8>, TicketingError> {
        let credential = self
            .credentials
            .find_for_buyer(&query.ticket_id, &query.buyer_id)
            .await?
            .ok_or_else(|| TicketingError::ticket_not_found(query.ticket_id))?;

        match self.renderer.render(&credential.token).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                error!(
                    ticket_id = %query.ticket_id,
                    credential_id = %credential.id,
                    error = %e,
                    "credential rendering failed"
                );
                Err(TicketingError::credential_not_found(credential.id))
            }
        }
    }
}
