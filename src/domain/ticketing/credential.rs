//! Credential entity: the unguessable token that proves ticket possession.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{CredentialId, TicketId, Timestamp};

/// Status of a redemption credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStatus {
    Active,
    Revoked,
}

/// A redemption credential bound to one ticket.
///
/// The token is the source of truth for entry; any rendering (QR image) is
/// reconstructible from it on demand. At most one credential per ticket is
/// active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    pub ticket_id: TicketId,
    pub status: CredentialStatus,
    pub token: String,
    pub created_at: Timestamp,
}

impl Credential {
    /// Mints an active credential for a ticket.
    ///
    /// The token is a fresh random 128-bit value, independent of every
    /// ticket field, so possession of a ticket id does not let anyone forge
    /// the credential.
    pub fn mint(ticket_id: TicketId, now: Timestamp) -> Self {
        Self {
            id: CredentialId::new(),
            ticket_id,
            status: CredentialStatus::Active,
            token: Uuid::new_v4().simple().to_string(),
            created_at: now,
        }
    }

    /// Whether the credential can still be presented for entry.
    pub fn is_active(&self) -> bool {
        self.status == CredentialStatus::Active
    }

    /// Revokes the credential (operator action, e.g. reported stolen).
    pub fn revoke(&mut self) {
        self.status = CredentialStatus::Revoked;
    }
}
