//! Ticketing command/query handlers.

mod credential_issuer;
mod fetch_credential_image;
mod list_tickets;
mod purchase_ticket;
mod validate_ticket;

pub use credential_issuer::CredentialIssuer;
pub use fetch_credential_image::{FetchCredentialImageHandler, FetchCredentialImageQuery};
pub use list_tickets::{GetTicketHandler, GetTicketQuery, ListTicketsHandler, ListTicketsQuery};
pub use purchase_ticket::{PurchaseTicketCommand, PurchaseTicketHandler, PurchaseTicketResult};
pub use validate_ticket::{TicketSelector, ValidateTicketCommand, ValidateTicketHandler};
