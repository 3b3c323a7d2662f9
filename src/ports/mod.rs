//! Ports layer - trait contracts between the application core and adapters.
//!
//! - `UserRepository` - buyer resolution
//! - `TicketRepository` - capacity-safe reservation and ticket reads
//! - `CredentialRepository` - credential persistence and scoped lookup
//! - `ValidationRepository` - atomic entry decision and append-only log
//! - `CredentialRenderer` - external QR rendering collaborator
//!
//! The two write-side ports carry the concurrency contracts of the system;
//! see their module docs.

mod credential_renderer;
mod credential_repository;
mod ticket_repository;
mod user_repository;
mod validation_repository;

pub use credential_renderer::CredentialRenderer;
pub use credential_repository::CredentialRepository;
pub use ticket_repository::TicketRepository;
pub use user_repository::UserRepository;
pub use validation_repository::ValidationRepository;
