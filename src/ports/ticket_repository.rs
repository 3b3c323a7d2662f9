//! Ticket repository port (reservation side).
//!
//! # Concurrency contract
//!
//! `reserve` is the single atomic decision that consumes capacity. An
//! implementation must execute "read issued count, compare against
//! capacity, insert ticket" inside one exclusive scope keyed on the ticket
//! type (a row lock or an equivalent compare-and-swap), so that:
//!
//! - two reservations against the same ticket type serialize, and the
//!   second observes the first's insert;
//! - reservations against different ticket types never block each other;
//! - a sold-out or not-found failure leaves no row behind;
//! - lock-wait exhaustion surfaces as `LockTimeout`, never as a hang.
//!
//! A plain count read outside that scope must not be offered: it would
//! invite callers to re-create the oversell race.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TicketId, TicketTypeId, UserId};
use crate::domain::ticketing::Ticket;

/// Repository port for ticket persistence and capacity-safe reservation.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Atomically issue one ticket against the ticket type's capacity.
    ///
    /// # Errors
    ///
    /// - `TicketTypeNotFound` if the ticket type does not exist
    /// - `TicketsSoldOut` if capacity is exhausted (no row created)
    /// - `LockTimeout` if the exclusive scope could not be acquired in time
    /// - `DatabaseError` on persistence failure
    async fn reserve(
        &self,
        ticket_type_id: &TicketTypeId,
        buyer_id: &UserId,
    ) -> Result<Ticket, DomainError>;

    /// Find a ticket by id.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError>;

    /// Find a ticket by id, scoped to the buyer who owns it.
    ///
    /// Returns `None` when the ticket does not exist or belongs to another
    /// buyer; callers cannot distinguish the two cases.
    async fn find_for_buyer(
        &self,
        id: &TicketId,
        buyer_id: &UserId,
    ) -> Result<Option<Ticket>, DomainError>;

    /// All tickets bought by a user, newest first.
    async fn list_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<Ticket>, DomainError>;
}
