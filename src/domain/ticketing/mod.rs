//! Ticketing domain - inventory reservation and entry validation.
//!
//! The two correctness-critical pieces live here as pure logic:
//! the capacity ledger decision on [`TicketType`] and the entry state
//! machine in [`validation`]. The exclusive-scope discipline that makes
//! those decisions safe under concurrency is a contract on the ports and is
//! implemented by the storage adapters.

mod credential;
mod errors;
mod ticket;
mod ticket_type;
mod user;
mod validation;

pub use credential::{Credential, CredentialStatus};
pub use errors::TicketingError;
pub use ticket::{Ticket, TicketStatus};
pub use ticket_type::TicketType;
pub use user::User;
pub use validation::{EntryState, Validation, ValidationMethod, ValidationOutcome};
