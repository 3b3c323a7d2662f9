//! Ticket entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{TicketId, TicketTypeId, Timestamp, UserId};

/// Lifecycle status of a ticket.
///
/// Tickets are only ever created in the purchased state; lifecycle end
/// (refund, transfer) is handled outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Purchased,
}

/// A ticket issued against a ticket type's capacity.
///
/// Created exactly once by the reservation flow and never deleted. A ticket
/// owns its credentials and validation records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub ticket_type_id: TicketTypeId,
    pub buyer_id: UserId,
    pub status: TicketStatus,
    pub created_at: Timestamp,
}

impl Ticket {
    /// Creates a freshly purchased ticket.
    pub fn purchased(ticket_type_id: TicketTypeId, buyer_id: UserId, now: Timestamp) -> Self {
        Self {
            id: TicketId::new(),
            ticket_type_id,
            buyer_id,
            status: TicketStatus::Purchased,
            created_at: now,
        }
    }

    /// Whether the given user bought this ticket.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.buyer_id == user_id
    }
}
