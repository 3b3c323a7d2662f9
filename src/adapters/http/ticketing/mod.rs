//! HTTP adapter for the ticketing API.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AuthenticatedUser, TicketingApiError, TicketingAppState};
pub use routes::{ticketing_router, ticketing_routes};
