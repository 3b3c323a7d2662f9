//! Axum router configuration for ticketing endpoints.
//!
//! This module defines the route structure for the ticketing API endpoints
//! and wires them to their corresponding handlers.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_credential_image, get_ticket, list_tickets, purchase_ticket, validate_ticket,
    TicketingAppState,
};

/// Create the ticketing API router.
///
/// # Routes
///
/// ## Buyer Endpoints (require authentication)
/// - `POST /ticket-types/:ticket_type_id/tickets` - Purchase one ticket
/// - `GET /tickets` - List the buyer's tickets
/// - `GET /tickets/:ticket_id` - Get one of the buyer's tickets
/// - `GET /tickets/:ticket_id/qr-code` - Fetch the rendered entry credential
///
/// ## Staff Endpoints (require staff role)
/// - `POST /ticket-validations` - Record one entry attempt
pub fn ticketing_routes() -> Router<TicketingAppState> {
    Router::new()
        // Buyer endpoints
        .route("/ticket-types/:ticket_type_id/tickets", post(purchase_ticket))
        .route("/tickets", get(list_tickets))
        .route("/tickets/:ticket_id", get(get_ticket))
        .route("/tickets/:ticket_id/qr-code", get(get_credential_image))
        // Staff endpoints
        .route("/ticket-validations", post(validate_ticket))
}

/// Create the complete ticketing module router.
///
/// Suitable for mounting at `/api`.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use crate::adapters::http::ticketing::{ticketing_router, TicketingAppState};
///
/// let app_state = TicketingAppState { /* ... */ };
/// let app = Router::new()
///     .nest("/api", ticketing_router())
///     .with_state(app_state);
/// ```
pub fn ticketing_router() -> Router<TicketingAppState> {
    ticketing_routes()
}
