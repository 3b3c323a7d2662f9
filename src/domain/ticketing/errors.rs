//! Ticketing-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UserNotFound | 404 |
//! | TicketTypeNotFound | 404 |
//! | TicketNotFound | 404 |
//! | CredentialNotFound | 404 |
//! | TicketsSoldOut | 409 |
//! | Busy | 503 |
//! | CredentialGenerationFailed | 500 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    CredentialId, DomainError, ErrorCode, TicketId, TicketTypeId, UserId,
};

/// Ticketing-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketingError {
    /// Buyer identity does not resolve to a known user.
    UserNotFound(UserId),

    /// Ticket type does not exist.
    TicketTypeNotFound(TicketTypeId),

    /// Ticket does not exist, or is not visible to the requesting buyer.
    TicketNotFound(TicketId),

    /// Credential does not exist, is not active, or is not owned by the
    /// requesting buyer. Deliberately also covers the not-yours case so the
    /// response does not leak another buyer's ticket.
    CredentialNotFound(CredentialId),

    /// Capacity exhausted for the ticket type.
    TicketsSoldOut(TicketTypeId),

    /// Exclusive scope could not be acquired in time; retryable.
    Busy { resource: String },

    /// Credential could not be minted after the ticket was committed.
    CredentialGenerationFailed { reason: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl TicketingError {
    pub fn user_not_found(id: UserId) -> Self {
        TicketingError::UserNotFound(id)
    }

    pub fn ticket_type_not_found(id: TicketTypeId) -> Self {
        TicketingError::TicketTypeNotFound(id)
    }

    pub fn ticket_not_found(id: TicketId) -> Self {
        TicketingError::TicketNotFound(id)
    }

    pub fn credential_not_found(id: CredentialId) -> Self {
        TicketingError::CredentialNotFound(id)
    }

    pub fn sold_out(id: TicketTypeId) -> Self {
        TicketingError::TicketsSoldOut(id)
    }

    pub fn busy(resource: impl Into<String>) -> Self {
        TicketingError::Busy {
            resource: resource.into(),
        }
    }

    pub fn credential_generation_failed(reason: impl Into<String>) -> Self {
        TicketingError::CredentialGenerationFailed {
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TicketingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(reason: impl Into<String>) -> Self {
        TicketingError::Infrastructure(reason.into())
    }

    /// Human-readable message for API responses.
    pub fn message(&self) -> String {
        match self {
            TicketingError::UserNotFound(id) => format!("User not found: {}", id),
            TicketingError::TicketTypeNotFound(id) => format!("Ticket type not found: {}", id),
            TicketingError::TicketNotFound(id) => format!("Ticket not found: {}", id),
            TicketingError::CredentialNotFound(id) => {
                format!("Credential not found or inactive: {}", id)
            }
            TicketingError::TicketsSoldOut(id) => {
                format!("Tickets sold out for ticket type: {}", id)
            }
            TicketingError::Busy { resource } => {
                format!("Resource busy, retry later: {}", resource)
            }
            TicketingError::CredentialGenerationFailed { reason } => {
                format!("Failed to generate credential: {}", reason)
            }
            TicketingError::ValidationFailed { field, message } => {
                format!("Invalid {}: {}", field, message)
            }
            TicketingError::Infrastructure(reason) => format!("Internal error: {}", reason),
        }
    }

    /// Whether the caller may retry the operation with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, TicketingError::Busy { .. })
    }
}

impl std::fmt::Display for TicketingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TicketingError {}

/// Maps port-level failures (carrying an [`ErrorCode`]) into the ticketing
/// vocabulary, so handlers can use `?` across port boundaries.
impl From<DomainError> for TicketingError {
    fn from(err: DomainError) -> Self {
        let id_detail = |key: &str| err.details.get(key).map(String::as_str).unwrap_or_default();
        match err.code {
            ErrorCode::UserNotFound => match id_detail("user_id").parse() {
                Ok(id) => TicketingError::UserNotFound(id),
                Err(_) => TicketingError::infrastructure(err.to_string()),
            },
            ErrorCode::TicketTypeNotFound => match id_detail("ticket_type_id").parse() {
                Ok(id) => TicketingError::TicketTypeNotFound(id),
                Err(_) => TicketingError::infrastructure(err.to_string()),
            },
            ErrorCode::TicketNotFound => match id_detail("ticket_id").parse() {
                Ok(id) => TicketingError::TicketNotFound(id),
                Err(_) => TicketingError::infrastructure(err.to_string()),
            },
            ErrorCode::CredentialNotFound => match id_detail("credential_id").parse() {
                Ok(id) => TicketingError::CredentialNotFound(id),
                Err(_) => TicketingError::infrastructure(err.to_string()),
            },
            ErrorCode::TicketsSoldOut => match id_detail("ticket_type_id").parse() {
                Ok(id) => TicketingError::TicketsSoldOut(id),
                Err(_) => TicketingError::infrastructure(err.to_string()),
            },
            ErrorCode::LockTimeout => TicketingError::busy(err.message),
            ErrorCode::CredentialGenerationFailed => {
                TicketingError::credential_generation_failed(err.message)
            }
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                TicketingError::ValidationFailed {
                    field: id_detail("field").to_string(),
                    message: err.message,
                }
            }
            _ => TicketingError::Infrastructure(err.to_string()),
        }
    }
}
