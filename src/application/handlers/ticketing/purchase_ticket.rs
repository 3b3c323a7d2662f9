//! PurchaseTicketHandler - command handler for buying one ticket.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{TicketTypeId, UserId};
use crate::domain::ticketing::{Credential, Ticket, TicketingError};
use crate::ports::{CredentialRepository, TicketRepository, UserRepository};

use super::credential_issuer::CredentialIssuer;

/// Command to purchase one ticket of a ticket type.
#[derive(Debug, Clone)]
pub struct PurchaseTicketCommand {
    pub buyer_id: UserId,
    pub ticket_type_id: TicketTypeId,
}

/// Result of a successful purchase: the ticket and its fresh credential.
#[derive(Debug, Clone)]
pub struct PurchaseTicketResult {
    pub ticket: Ticket,
    pub credential: Credential,
}

/// Handler for the purchase operation.
///
/// The capacity decision itself is delegated to
/// [`TicketRepository::reserve`], which holds the exclusive scope on the
/// ticket type across count-compare-insert. By the time this handler sees a
/// ticket, the reservation is committed and durable; credential issuance
/// happens strictly after.
pub struct PurchaseTicketHandler {
    users: Arc<dyn UserRepository>,
    tickets: Arc<dyn TicketRepository>,
    issuer: CredentialIssuer,
}

impl PurchaseTicketHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tickets: Arc<dyn TicketRepository>,
        credentials: Arc<dyn CredentialRepository>,
    ) -> Self {
        Self {
            users,
            tickets,
            issuer: CredentialIssuer::new(credentials),
        }
    }

    pub async fn handle(
        &self,
        cmd: PurchaseTicketCommand,
    ) -> Result<PurchaseTicketResult, TicketingError> {
        // 1. Resolve the buyer.
        self.users
            .find_by_id(&cmd.buyer_id)
            .await?
            .ok_or(TicketingError::UserNotFound(cmd.buyer_id))?;

        // 2. Atomic capacity check + ticket insert, serialized per ticket
        //    type. Sold-out and not-found come back with no row created.
        let ticket = self
            .tickets
            .reserve(&cmd.ticket_type_id, &cmd.buyer_id)
            .await?;

        info!(
            ticket_id = %ticket.id,
            ticket_type_id = %cmd.ticket_type_id,
            buyer_id = %cmd.buyer_id,
            "ticket reserved"
        );

        // 3. Mint the credential only after the reservation commit. If this
        //    fails the ticket stands and the error surfaces; the credential
        //    can be re-issued later (see DESIGN notes).
        let credential = self.issuer.issue(&ticket).await.map_err(|e| {
            warn!(ticket_id = %ticket.id, error = %e, "ticket reserved but credential issuance failed");
            e
        })?;

        Ok(PurchaseTicketResult { ticket, credential })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{
        CredentialId, DomainError, ErrorCode, TicketId, Timestamp,
    };
    use crate::domain::ticketing::User;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockUserRepository {
        known_user: Option<UserId>,
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            if self.known_user.as_ref() == Some(id) {
                Ok(Some(User {
                    id: *id,
                    email: "buyer@example.com".to_string(),
                    display_name: "Buyer".to_string(),
                    created_at: Timestamp::now(),
                }))
            } else {
                Ok(None)
            }
        }
    }

    struct MockTicketRepository {
        capacity: u32,
        issued: Mutex<Vec<Ticket>>,
        known_ticket_type: TicketTypeId,
    }

    impl MockTicketRepository {
        fn with_capacity(ticket_type_id: TicketTypeId, capacity: u32) -> Self {
            Self {
                capacity,
                issued: Mutex::new(Vec::new()),
                known_ticket_type: ticket_type_id,
            }
        }

        fn issued_count(&self) -> usize {
            self.issued.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TicketRepository for MockTicketRepository {
        async fn reserve(
            &self,
            ticket_type_id: &TicketTypeId,
            buyer_id: &UserId,
        ) -> Result<Ticket, DomainError> {
            if ticket_type_id != &self.known_ticket_type {
                return Err(DomainError::new(
                    ErrorCode::TicketTypeNotFound,
                    "ticket type not found",
                )
                .with_detail("ticket_type_id", ticket_type_id.to_string()));
            }
            // Mutex held across count-and-insert mirrors the exclusive
            // scope the real adapter takes on the ticket-type row.
            let mut issued = self.issued.lock().unwrap();
            if issued.len() as u32 >= self.capacity {
                return Err(DomainError::new(ErrorCode::TicketsSoldOut, "sold out")
                    .with_detail("ticket_type_id", ticket_type_id.to_string()));
            }
            let ticket = Ticket::purchased(*ticket_type_id, *buyer_id, Timestamp::now());
            issued.push(ticket.clone());
            Ok(ticket)
        }

        async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
            Ok(self
                .issued
                .lock()
                .unwrap()
                .iter()
                .find(|t| &t.id == id)
                .cloned())
        }

        async fn find_for_buyer(
            &self,
            id: &TicketId,
            buyer_id: &UserId,
        ) -> Result<Option<Ticket>, DomainError> {
            Ok(self
                .issued
                .lock()
                .unwrap()
                .iter()
                .find(|t| &t.id == id && t.is_owned_by(buyer_id))
                .cloned())
        }

        async fn list_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<Ticket>, DomainError> {
            Ok(self
                .issued
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.is_owned_by(buyer_id))
                .cloned()
                .collect())
        }
    }

    struct MockCredentialRepository {
        saved: Mutex<Vec<Credential>>,
        fail_save: bool,
    }

    impl MockCredentialRepository {
        fn new() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                fail_save: false,
            }
        }

        fn failing() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                fail_save: true,
            }
        }
    }

    #[async_trait]
    impl CredentialRepository for MockCredentialRepository {
        async fn save(&self, credential: &Credential) -> Result<(), DomainError> {
            if self.fail_save {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    "Simulated save failure",
                ));
            }
            self.saved.lock().unwrap().push(credential.clone());
            Ok(())
        }

        async fn find_active(
            &self,
            _id: &CredentialId,
        ) -> Result<Option<Credential>, DomainError> {
            Ok(None)
        }

        async fn find_for_buyer(
            &self,
            _ticket_id: &TicketId,
            _buyer_id: &UserId,
        ) -> Result<Option<Credential>, DomainError> {
            Ok(None)
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    fn handler_with(
        buyer: UserId,
        tickets: Arc<MockTicketRepository>,
        credentials: Arc<MockCredentialRepository>,
    ) -> PurchaseTicketHandler {
        PurchaseTicketHandler::new(
            Arc::new(MockUserRepository {
                known_user: Some(buyer),
            }),
            tickets,
            credentials,
        )
    }

    #[tokio::test]
    async fn purchase_creates_ticket_and_credential() {
        let buyer = UserId::new();
        let tt = TicketTypeId::new();
        let tickets = Arc::new(MockTicketRepository::with_capacity(tt, 10));
        let credentials = Arc::new(MockCredentialRepository::new());
        let handler = handler_with(buyer, tickets.clone(), credentials.clone());

        let result = handler
            .handle(PurchaseTicketCommand {
                buyer_id: buyer,
                ticket_type_id: tt,
            })
            .await
            .unwrap();

        assert_eq!(result.ticket.buyer_id, buyer);
        assert_eq!(result.credential.ticket_id, result.ticket.id);
        assert_eq!(tickets.issued_count(), 1);
        assert_eq!(credentials.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_buyer_fails_before_touching_capacity() {
        let tt = TicketTypeId::new();
        let tickets = Arc::new(MockTicketRepository::with_capacity(tt, 10));
        let handler = PurchaseTicketHandler::new(
            Arc::new(MockUserRepository { known_user: None }),
            tickets.clone(),
            Arc::new(MockCredentialRepository::new()),
        );

        let result = handler
            .handle(PurchaseTicketCommand {
                buyer_id: UserId::new(),
                ticket_type_id: tt,
            })
            .await;

        assert!(matches!(result, Err(TicketingError::UserNotFound(_))));
        assert_eq!(tickets.issued_count(), 0);
    }

    #[tokio::test]
    async fn unknown_ticket_type_creates_no_rows() {
        let buyer = UserId::new();
        let tickets = Arc::new(MockTicketRepository::with_capacity(TicketTypeId::new(), 10));
        let credentials = Arc::new(MockCredentialRepository::new());
        let handler = handler_with(buyer, tickets.clone(), credentials.clone());

        let unknown = TicketTypeId::new();
        let result = handler
            .handle(PurchaseTicketCommand {
                buyer_id: buyer,
                ticket_type_id: unknown,
            })
            .await;

        assert_eq!(result.unwrap_err(), TicketingError::TicketTypeNotFound(unknown));
        assert_eq!(tickets.issued_count(), 0);
        assert!(credentials.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sold_out_when_capacity_exhausted() {
        let buyer = UserId::new();
        let tt = TicketTypeId::new();
        let tickets = Arc::new(MockTicketRepository::with_capacity(tt, 1));
        let credentials = Arc::new(MockCredentialRepository::new());
        let handler = handler_with(buyer, tickets.clone(), credentials);

        let cmd = PurchaseTicketCommand {
            buyer_id: buyer,
            ticket_type_id: tt,
        };
        handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await;

        assert_eq!(second.unwrap_err(), TicketingError::TicketsSoldOut(tt));
        assert_eq!(tickets.issued_count(), 1);
    }

    #[tokio::test]
    async fn zero_capacity_type_is_sold_out_from_the_start() {
        let buyer = UserId::new();
        let tt = TicketTypeId::new();
        let tickets = Arc::new(MockTicketRepository::with_capacity(tt, 0));
        let handler = handler_with(buyer, tickets.clone(), Arc::new(MockCredentialRepository::new()));

        let result = handler
            .handle(PurchaseTicketCommand {
                buyer_id: buyer,
                ticket_type_id: tt,
            })
            .await;

        assert_eq!(result.unwrap_err(), TicketingError::TicketsSoldOut(tt));
    }

    #[tokio::test]
    async fn credential_failure_surfaces_but_ticket_stands() {
        let buyer = UserId::new();
        let tt = TicketTypeId::new();
        let tickets = Arc::new(MockTicketRepository::with_capacity(tt, 10));
        let handler = handler_with(buyer, tickets.clone(), Arc::new(MockCredentialRepository::failing()));

        let result = handler
            .handle(PurchaseTicketCommand {
                buyer_id: buyer,
                ticket_type_id: tt,
            })
            .await;

        assert!(matches!(
            result,
            Err(TicketingError::CredentialGenerationFailed { .. })
        ));
        // The reservation committed before issuance was attempted.
        assert_eq!(tickets.issued_count(), 1);
    }
}
