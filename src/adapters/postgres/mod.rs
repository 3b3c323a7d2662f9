//! PostgreSQL adapters - database implementations of the repository ports.
//!
//! - `PostgresTicketRepository` - capacity-safe reservation (row lock on
//!   the ticket type held across count-and-insert)
//! - `PostgresValidationRepository` - atomic entry decision (row lock on
//!   the ticket, partial unique index as a backstop)
//! - `PostgresCredentialRepository` - credential persistence with a
//!   one-active-per-ticket constraint
//! - `PostgresUserRepository` - buyer resolution

mod credential_repository;
mod ticket_repository;
mod user_repository;
mod validation_repository;

pub use credential_repository::PostgresCredentialRepository;
pub use ticket_repository::PostgresTicketRepository;
pub use user_repository::PostgresUserRepository;
pub use validation_repository::PostgresValidationRepository;
