//! HTTP handlers for ticketing endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::ticketing::{
    FetchCredentialImageHandler, FetchCredentialImageQuery, GetTicketHandler, GetTicketQuery,
    ListTicketsHandler, ListTicketsQuery, PurchaseTicketCommand, PurchaseTicketHandler,
    TicketSelector, ValidateTicketCommand, ValidateTicketHandler,
};
use crate::domain::foundation::{CredentialId, TicketId, TicketTypeId, UserId};
use crate::domain::ticketing::{TicketingError, ValidationMethod};
use crate::ports::{
    CredentialRenderer, CredentialRepository, TicketRepository, UserRepository,
    ValidationRepository,
};

use super::dto::{
    ErrorResponse, PurchaseResponse, TicketResponse, ValidateTicketRequest, ValidationResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct TicketingAppState {
    pub user_repository: Arc<dyn UserRepository>,
    pub ticket_repository: Arc<dyn TicketRepository>,
    pub credential_repository: Arc<dyn CredentialRepository>,
    pub validation_repository: Arc<dyn ValidationRepository>,
    pub credential_renderer: Arc<dyn CredentialRenderer>,
}

impl TicketingAppState {
    /// Create handlers on demand from the shared state.
    pub fn purchase_handler(&self) -> PurchaseTicketHandler {
        PurchaseTicketHandler::new(
            self.user_repository.clone(),
            self.ticket_repository.clone(),
            self.credential_repository.clone(),
        )
    }

    pub fn validate_handler(&self) -> ValidateTicketHandler {
        ValidateTicketHandler::new(
            self.ticket_repository.clone(),
            self.credential_repository.clone(),
            self.validation_repository.clone(),
        )
    }

    pub fn list_tickets_handler(&self) -> ListTicketsHandler {
        ListTicketsHandler::new(self.ticket_repository.clone())
    }

    pub fn get_ticket_handler(&self) -> GetTicketHandler {
        GetTicketHandler::new(self.ticket_repository.clone())
    }

    pub fn credential_image_handler(&self) -> FetchCredentialImageHandler {
        FetchCredentialImageHandler::new(
            self.credential_repository.clone(),
            self.credential_renderer.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from request.
///
/// In production, this would be extracted from JWT/session by auth middleware.
/// For now, uses a header-based extraction for development/testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // In production, this would validate JWT token from Authorization header
            // For development, we accept an X-User-Id header
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<UserId>().ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/ticket-types/{ticket_type_id}/tickets - Purchase one ticket
pub async fn purchase_ticket(
    State(state): State<TicketingAppState>,
    user: AuthenticatedUser,
    Path(ticket_type_id): Path<Uuid>,
) -> Result<impl IntoResponse, TicketingApiError> {
    let handler = state.purchase_handler();
    let cmd = PurchaseTicketCommand {
        buyer_id: user.user_id,
        ticket_type_id: TicketTypeId::from_uuid(ticket_type_id),
    };

    let result = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(PurchaseResponse::from(result))))
}

/// POST /api/ticket-validations - Record one entry attempt
pub async fn validate_ticket(
    State(state): State<TicketingAppState>,
    _user: AuthenticatedUser, // Would check staff role in production
    Json(request): Json<ValidateTicketRequest>,
) -> Result<impl IntoResponse, TicketingApiError> {
    let selector = match request.method {
        ValidationMethod::QrScan => TicketSelector::Credential(CredentialId::from_uuid(request.id)),
        ValidationMethod::Manual => TicketSelector::Ticket(TicketId::from_uuid(request.id)),
    };

    let handler = state.validate_handler();
    let cmd = ValidateTicketCommand { selector };

    let result = handler.handle(cmd).await?;

    Ok(Json(ValidationResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/tickets - List the authenticated buyer's tickets
pub async fn list_tickets(
    State(state): State<TicketingAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, TicketingApiError> {
    let handler = state.list_tickets_handler();
    let query = ListTicketsQuery {
        buyer_id: user.user_id,
    };

    let tickets = handler.handle(query).await?;

    let response: Vec<TicketResponse> = tickets.into_iter().map(TicketResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/tickets/{ticket_id} - Get one of the buyer's tickets
pub async fn get_ticket(
    State(state): State<TicketingAppState>,
    user: AuthenticatedUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, TicketingApiError> {
    let handler = state.get_ticket_handler();
    let query = GetTicketQuery {
        buyer_id: user.user_id,
        ticket_id: TicketId::from_uuid(ticket_id),
    };

    let ticket = handler.handle(query).await?;

    Ok(Json(TicketResponse::from(ticket)))
}

/// GET /api/tickets/{ticket_id}/qr-code - Fetch the rendered entry credential
pub async fn get_credential_image(
    State(state): State<TicketingAppState>,
    user: AuthenticatedUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, TicketingApiError> {
    let handler = state.credential_image_handler();
    let query = FetchCredentialImageQuery {
        buyer_id: user.user_id,
        ticket_id: TicketId::from_uuid(ticket_id),
    };

    let image = handler.handle(query).await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], image))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct TicketingApiError(TicketingError);

impl From<TicketingError> for TicketingApiError {
    fn from(err: TicketingError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for TicketingApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(TicketingError::from(err))
    }
}

impl IntoResponse for TicketingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            TicketingError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            TicketingError::TicketTypeNotFound(_) => {
                (StatusCode::NOT_FOUND, "TICKET_TYPE_NOT_FOUND")
            }
            TicketingError::TicketNotFound(_) => (StatusCode::NOT_FOUND, "TICKET_NOT_FOUND"),
            TicketingError::CredentialNotFound(_) => {
                (StatusCode::NOT_FOUND, "CREDENTIAL_NOT_FOUND")
            }
            TicketingError::TicketsSoldOut(_) => (StatusCode::CONFLICT, "TICKETS_SOLD_OUT"),
            TicketingError::Busy { .. } => (StatusCode::SERVICE_UNAVAILABLE, "RESOURCE_BUSY"),
            TicketingError::CredentialGenerationFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CREDENTIAL_GENERATION_FAILED")
            }
            TicketingError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            TicketingError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Use the error's built-in message() method for consistent messaging
        let message = self.0.message();
        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}
