//! ValidateTicketHandler - command handler for entry validation.
//!
//! QR scan and manual validation differ only in how the ticket is resolved;
//! the decision itself runs through one code path so the atomicity
//! guarantee applies uniformly to both.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CredentialId, TicketId};
use crate::domain::ticketing::{TicketingError, Validation, ValidationMethod};
use crate::ports::{CredentialRepository, TicketRepository, ValidationRepository};

/// How the ticket under validation is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSelector {
    /// QR scan: the scanner read the credential id off the code.
    Credential(CredentialId),
    /// Manual fallback: staff typed the ticket id in.
    Ticket(TicketId),
}

impl TicketSelector {
    /// The validation method implied by the selector.
    pub fn method(&self) -> ValidationMethod {
        match self {
            TicketSelector::Credential(_) => ValidationMethod::QrScan,
            TicketSelector::Ticket(_) => ValidationMethod::Manual,
        }
    }
}

/// Command to validate a ticket for entry.
#[derive(Debug, Clone)]
pub struct ValidateTicketCommand {
    pub selector: TicketSelector,
}

/// Handler for the validate operation.
pub struct ValidateTicketHandler {
    tickets: Arc<dyn TicketRepository>,
    credentials: Arc<dyn CredentialRepository>,
    validations: Arc<dyn ValidationRepository>,
}

impl ValidateTicketHandler {
    pub fn new(
        tickets: Arc<dyn TicketRepository>,
        credentials: Arc<dyn CredentialRepository>,
        validations: Arc<dyn ValidationRepository>,
    ) -> Self {
        Self {
            tickets,
            credentials,
            validations,
        }
    }

    pub async fn handle(
        &self,
        cmd: ValidateTicketCommand,
    ) -> Result<Validation, TicketingError> {
        // 1. Resolve the ticket. Only the resolution differs per method.
        let ticket_id = match cmd.selector {
            TicketSelector::Credential(credential_id) => {
                let credential = self
                    .credentials
                    .find_active(&credential_id)
                    .await?
                    .ok_or(TicketingError::CredentialNotFound(credential_id))?;
                credential.ticket_id
            }
            TicketSelector::Ticket(ticket_id) => {
                self.tickets
                    .find_by_id(&ticket_id)
                    .await?
                    .ok_or(TicketingError::TicketNotFound(ticket_id))?;
                ticket_id
            }
        };

        // 2. Atomic decide-and-append, serialized per ticket. The first
        //    recorded attempt admits; every later one is invalid.
        let validation = self
            .validations
            .record(&ticket_id, cmd.selector.method())
            .await?;

        info!(
            ticket_id = %ticket_id,
            method = ?validation.method,
            outcome = ?validation.outcome,
            "entry attempt recorded"
        );

        Ok(validation)
    }
}
