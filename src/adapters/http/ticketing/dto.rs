//! HTTP DTOs (Data Transfer Objects) for ticketing endpoints.
//!
//! These types define the JSON request/response structure for the ticketing
//! API. They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::ticketing::PurchaseTicketResult;
use crate::domain::ticketing::{
    Credential, Ticket, TicketStatus, Validation, ValidationMethod, ValidationOutcome,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to validate a ticket at the gate.
///
/// `qr_scan` carries the credential id decoded from the code; `manual`
/// carries the ticket id typed in by staff.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateTicketRequest {
    /// How the attempt was made: "qr_scan" or "manual".
    pub method: ValidationMethod,
    /// Credential id (qr_scan) or ticket id (manual).
    pub id: uuid::Uuid,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A ticket as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct TicketResponse {
    pub id: String,
    pub ticket_type_id: String,
    pub status: TicketStatus,
    /// When the ticket was purchased (ISO 8601).
    pub created_at: String,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            ticket_type_id: ticket.ticket_type_id.to_string(),
            status: ticket.status,
            created_at: ticket.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// An entry credential as returned by the API.
///
/// The token itself is never exposed; holders fetch the rendered image
/// through the qr-code endpoint instead.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialResponse {
    pub id: String,
    pub ticket_id: String,
    pub created_at: String,
}

impl From<Credential> for CredentialResponse {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id.to_string(),
            ticket_id: credential.ticket_id.to_string(),
            created_at: credential.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for a successful purchase.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseResponse {
    pub ticket: TicketResponse,
    pub credential: CredentialResponse,
}

impl From<PurchaseTicketResult> for PurchaseResponse {
    fn from(result: PurchaseTicketResult) -> Self {
        Self {
            ticket: TicketResponse::from(result.ticket),
            credential: CredentialResponse::from(result.credential),
        }
    }
}

/// Response for a recorded entry attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub id: String,
    pub ticket_id: String,
    pub method: ValidationMethod,
    pub outcome: ValidationOutcome,
    pub created_at: String,
}

impl From<Validation> for ValidationResponse {
    fn from(validation: Validation) -> Self {
        Self {
            id: validation.id.to_string(),
            ticket_id: validation.ticket_id.to_string(),
            method: validation.method,
            outcome: validation.outcome,
            created_at: validation.created_at.as_datetime().to_rfc3339(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }
}
