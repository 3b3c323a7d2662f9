//! Foundation layer - shared value objects and error types.
//!
//! Everything here is domain-agnostic plumbing used by the ticketing module:
//! strongly-typed identifiers, an immutable UTC timestamp, and the error
//! vocabulary shared between ports, adapters, and application handlers.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CredentialId, EventId, TicketId, TicketTypeId, UserId, ValidationId};
pub use timestamp::Timestamp;
