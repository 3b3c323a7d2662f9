//! Exactly-once admission properties of the validation flow.
//!
//! These tests drive `ValidateTicketHandler` and
//! `FetchCredentialImageHandler` against in-memory ports whose `record`
//! honors the atomic decide-and-append contract, and race many entry
//! attempts to check that a ticket admits at most once, forever.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;

use ticketline::application::handlers::ticketing::{
    FetchCredentialImageHandler, FetchCredentialImageQuery, TicketSelector, ValidateTicketCommand,
    ValidateTicketHandler,
};
use ticketline::domain::foundation::{
    CredentialId, DomainError, ErrorCode, TicketId, TicketTypeId, Timestamp, UserId,
};
use ticketline::domain::ticketing::{
    Credential, EntryState, Ticket, TicketingError, Validation, ValidationMethod,
    ValidationOutcome,
};
use ticketline::ports::{
    CredentialRenderer, CredentialRepository, TicketRepository, ValidationRepository,
};

// ════════════════════════════════════════════════════════════════════════════
// In-memory ports honoring the concurrency contracts
// ════════════════════════════════════════════════════════════════════════════

struct InMemoryTickets {
    tickets: Mutex<Vec<Ticket>>,
}

#[async_trait]
impl TicketRepository for InMemoryTickets {
    async fn reserve(
        &self,
        ticket_type_id: &TicketTypeId,
        buyer_id: &UserId,
    ) -> Result<Ticket, DomainError> {
        let ticket = Ticket::purchased(*ticket_type_id, *buyer_id, Timestamp::now());
        self.tickets.lock().unwrap().push(ticket.clone());
        Ok(ticket)
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
        Ok(self
            .tickets
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
            .tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| &t.id == id && t.is_owned_by(buyer_id))
            .cloned())
    }

    async fn list_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<Ticket>, DomainError> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.is_owned_by(buyer_id))
            .cloned()
            .collect())
    }
}

struct InMemoryCredentials {
    credentials: Mutex<Vec<Credential>>,
    owners: Mutex<Vec<(TicketId, UserId)>>,
}

impl InMemoryCredentials {
    fn new() -> Self {
        Self {
            credentials: Mutex::new(Vec::new()),
            owners: Mutex::new(Vec::new()),
        }
    }

    fn insert(&self, credential: Credential, owner: UserId) {
        self.owners
            .lock()
            .unwrap()
            .push((credential.ticket_id, owner));
        self.credentials.lock().unwrap().push(credential);
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentials {
    async fn save(&self, credential: &Credential) -> Result<(), DomainError> {
        self.credentials.lock().unwrap().push(credential.clone());
        Ok(())
    }

    async fn find_active(&self, id: &CredentialId) -> Result<Option<Credential>, DomainError> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.id == id && c.is_active())
            .cloned())
    }

    async fn find_for_buyer(
        &self,
        ticket_id: &TicketId,
        buyer_id: &UserId,
    ) -> Result<Option<Credential>, DomainError> {
        let owned = self
            .owners
            .lock()
            .unwrap()
            .iter()
            .any(|(tid, uid)| tid == ticket_id && uid == buyer_id);
        if !owned {
            return Ok(None);
        }
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.ticket_id == ticket_id && c.is_active())
            .cloned())
    }
}

/// Validation log whose decide-and-append runs under one lock, per the
/// `ValidationRepository` contract.
struct InMemoryValidations {
    known_tickets: Mutex<Vec<TicketId>>,
    validations: Mutex<Vec<Validation>>,
}

impl InMemoryValidations {
    fn new(known_tickets: Vec<TicketId>) -> Self {
        Self {
            known_tickets: Mutex::new(known_tickets),
            validations: Mutex::new(Vec::new()),
        }
    }

    fn history(&self, ticket_id: &TicketId) -> Vec<Validation> {
        self.validations
            .lock()
            .unwrap()
            .iter()
            .filter(|v| &v.ticket_id == ticket_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ValidationRepository for InMemoryValidations {
    async fn record(
        &self,
        ticket_id: &TicketId,
        method: ValidationMethod,
    ) -> Result<Validation, DomainError> {
        if !self.known_tickets.lock().unwrap().contains(ticket_id) {
            return Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket not found: {}", ticket_id),
            )
            .with_detail("ticket_id", ticket_id.to_string()));
        }

        // The lock is held across the read and the append; two racing
        // attempts cannot both observe an empty history.
        let mut validations = self.validations.lock().unwrap();
        let has_valid = validations
            .iter()
            .any(|v| &v.ticket_id == ticket_id && v.admitted());
        let outcome = EntryState::from_history(has_valid).decide_next();
        let validation = Validation::record(*ticket_id, method, outcome, Timestamp::now());
        validations.push(validation.clone());
        Ok(validation)
    }
}

struct PngRenderer;

#[async_trait]
impl CredentialRenderer for PngRenderer {
    async fn render(&self, _token: &str) -> Result<Vec<u8>, DomainError> {
        Ok(vec![0x89, 0x50, 0x4e, 0x47])
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Test helpers
// ════════════════════════════════════════════════════════════════════════════

struct Fixture {
    handler: Arc<ValidateTicketHandler>,
    credentials: Arc<InMemoryCredentials>,
    validations: Arc<InMemoryValidations>,
    ticket: Ticket,
    credential: Credential,
}

fn fixture() -> Fixture {
    let buyer = UserId::new();
    let ticket = Ticket::purchased(TicketTypeId::new(), buyer, Timestamp::now());
    let credential = Credential::mint(ticket.id, Timestamp::now());

    let tickets = Arc::new(InMemoryTickets {
        tickets: Mutex::new(vec![ticket.clone()]),
    });
    let credentials = Arc::new(InMemoryCredentials::new());
    credentials.insert(credential.clone(), buyer);
    let validations = Arc::new(InMemoryValidations::new(vec![ticket.id]));

    let handler = Arc::new(ValidateTicketHandler::new(
        tickets,
        credentials.clone(),
        validations.clone(),
    ));

    Fixture {
        handler,
        credentials,
        validations,
        ticket,
        credential,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Exactly-once admission
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn racing_validations_admit_exactly_once() {
    const ATTEMPTS: usize = 16;
    let fx = fixture();

    let barrier = Arc::new(Barrier::new(ATTEMPTS));
    let mut joins = Vec::new();
    for i in 0..ATTEMPTS {
        let handler = fx.handler.clone();
        let barrier = barrier.clone();
        // Mix scans and manual entries in the same race.
        let selector = if i % 2 == 0 {
            TicketSelector::Credential(fx.credential.id)
        } else {
            TicketSelector::Ticket(fx.ticket.id)
        };
        joins.push(tokio::spawn(async move {
            barrier.wait().await;
            handler.handle(ValidateTicketCommand { selector }).await
        }));
    }

    let mut valid = 0;
    let mut invalid = 0;
    for join in joins {
        match join.await.expect("task panicked") {
            Ok(v) if v.admitted() => valid += 1,
            Ok(_) => invalid += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(valid, 1);
    assert_eq!(invalid, ATTEMPTS - 1);
    assert_eq!(fx.validations.history(&fx.ticket.id).len(), ATTEMPTS);
}

#[tokio::test]
async fn scan_rescan_then_manual_admits_only_the_first() {
    let fx = fixture();

    let first = fx
        .handler
        .handle(ValidateTicketCommand {
            selector: TicketSelector::Credential(fx.credential.id),
        })
        .await
        .expect("first scan");
    assert_eq!(first.outcome, ValidationOutcome::Valid);
    assert_eq!(first.method, ValidationMethod::QrScan);

    let rescan = fx
        .handler
        .handle(ValidateTicketCommand {
            selector: TicketSelector::Credential(fx.credential.id),
        })
        .await
        .expect("rescan");
    assert_eq!(rescan.outcome, ValidationOutcome::Invalid);

    let manual = fx
        .handler
        .handle(ValidateTicketCommand {
            selector: TicketSelector::Ticket(fx.ticket.id),
        })
        .await
        .expect("manual");
    assert_eq!(manual.outcome, ValidationOutcome::Invalid);
    assert_eq!(manual.method, ValidationMethod::Manual);

    let history = fx.validations.history(&fx.ticket.id);
    assert_eq!(history.len(), 3);
    assert_eq!(history.iter().filter(|v| v.admitted()).count(), 1);
}

#[tokio::test]
async fn validated_state_is_monotonic() {
    let fx = fixture();

    fx.handler
        .handle(ValidateTicketCommand {
            selector: TicketSelector::Ticket(fx.ticket.id),
        })
        .await
        .expect("first manual entry");

    for _ in 0..5 {
        let again = fx
            .handler
            .handle(ValidateTicketCommand {
                selector: TicketSelector::Ticket(fx.ticket.id),
            })
            .await
            .expect("later attempt");
        assert_eq!(again.outcome, ValidationOutcome::Invalid);
    }
}

#[tokio::test]
async fn unknown_credential_is_rejected_without_a_record() {
    let fx = fixture();
    let unknown = CredentialId::new();

    let result = fx
        .handler
        .handle(ValidateTicketCommand {
            selector: TicketSelector::Credential(unknown),
        })
        .await;

    assert!(matches!(result, Err(TicketingError::CredentialNotFound(_))));
    assert!(fx.validations.history(&fx.ticket.id).is_empty());
}

#[tokio::test]
async fn revoked_credential_no_longer_scans() {
    let fx = fixture();

    // Revoke the only credential in place.
    {
        let mut credentials = fx.credentials.credentials.lock().unwrap();
        for credential in credentials.iter_mut() {
            credential.revoke();
        }
    }

    let result = fx
        .handler
        .handle(ValidateTicketCommand {
            selector: TicketSelector::Credential(fx.credential.id),
        })
        .await;

    assert!(matches!(result, Err(TicketingError::CredentialNotFound(_))));
    // The ticket itself still validates through the manual path.
    let manual = fx
        .handler
        .handle(ValidateTicketCommand {
            selector: TicketSelector::Ticket(fx.ticket.id),
        })
        .await
        .expect("manual fallback");
    assert_eq!(manual.outcome, ValidationOutcome::Valid);
}

#[tokio::test]
async fn unknown_ticket_is_rejected_without_a_record() {
    let fx = fixture();
    let unknown = TicketId::new();

    let result = fx
        .handler
        .handle(ValidateTicketCommand {
            selector: TicketSelector::Ticket(unknown),
        })
        .await;

    assert!(matches!(result, Err(TicketingError::TicketNotFound(_))));
    assert!(fx.validations.history(&unknown).is_empty());
}

// ════════════════════════════════════════════════════════════════════════════
// Credential image scoping
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn credential_image_is_scoped_to_the_owning_buyer() {
    let buyer = UserId::new();
    let stranger = UserId::new();
    let ticket = Ticket::purchased(TicketTypeId::new(), buyer, Timestamp::now());
    let credential = Credential::mint(ticket.id, Timestamp::now());

    let credentials = Arc::new(InMemoryCredentials::new());
    credentials.insert(credential, buyer);

    let handler =
        FetchCredentialImageHandler::new(credentials, Arc::new(PngRenderer));

    let image = handler
        .handle(FetchCredentialImageQuery {
            buyer_id: buyer,
            ticket_id: ticket.id,
        })
        .await
        .expect("owner fetches image");
    assert_eq!(&image[..4], &[0x89, 0x50, 0x4e, 0x47]);

    let result = handler
        .handle(FetchCredentialImageQuery {
            buyer_id: stranger,
            ticket_id: ticket.id,
        })
        .await;
    assert!(matches!(result, Err(TicketingError::TicketNotFound(_))));
}
