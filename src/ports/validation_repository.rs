//! Validation repository port.
//!
//! # Concurrency contract
//!
//! `record` is the single atomic decision of the entry state machine. An
//! implementation must execute "read whether a valid record exists, decide
//! the outcome, append the new record" inside one exclusive scope keyed on
//! the ticket, so that two simultaneous validations of the same ticket
//! cannot both admit. Validations of different tickets never block each
//! other. The history is append-only; prior records are never mutated.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TicketId};
use crate::domain::ticketing::{Validation, ValidationMethod};

/// Repository port for the append-only validation log.
#[async_trait]
pub trait ValidationRepository: Send + Sync {
    /// Atomically decide and append one entry attempt for the ticket.
    ///
    /// The first recorded attempt for a ticket carries the valid outcome;
    /// every later one is invalid, regardless of method or interleaving.
    ///
    /// # Errors
    ///
    /// - `TicketNotFound` if the ticket does not exist
    /// - `LockTimeout` if the exclusive scope could not be acquired in time
    /// - `DatabaseError` on persistence failure
    async fn record(
        &self,
        ticket_id: &TicketId,
        method: ValidationMethod,
    ) -> Result<Validation, DomainError>;
}
