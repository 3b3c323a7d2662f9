//! TicketType entity and the capacity ledger decision.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, TicketTypeId, ValidationError};

/// A sellable ticket category of an event with a finite capacity.
///
/// `total_capacity` is configuration read at reservation time; the
/// reservation flow guarantees the number of issued tickets never exceeds
/// it, under any interleaving of concurrent purchases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketType {
    pub id: TicketTypeId,
    pub event_id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub total_capacity: u32,
}

impl TicketType {
    /// Creates a ticket type, validating its configuration values.
    pub fn new(
        id: TicketTypeId,
        event_id: EventId,
        name: impl Into<String>,
        description: Option<String>,
        price_cents: i64,
        total_capacity: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if price_cents < 0 {
            return Err(ValidationError::negative("price_cents", price_cents));
        }
        Ok(Self {
            id,
            event_id,
            name,
            description,
            price_cents,
            total_capacity,
        })
    }

    /// Capacity ledger: tickets still sellable given the issued count.
    ///
    /// The issued count must come from the same exclusive scope that decides
    /// the reservation; a count read outside that scope reintroduces the
    /// oversell race.
    pub fn remaining(&self, issued_count: u32) -> u32 {
        self.total_capacity.saturating_sub(issued_count)
    }

    /// Whether one more ticket may be issued at the given issued count.
    pub fn can_issue_one(&self, issued_count: u32) -> bool {
        self.remaining(issued_count) > 0
    }
}
