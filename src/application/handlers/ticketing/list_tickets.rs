//! ListTicketsHandler / GetTicketHandler - buyer-facing ticket reads.

use std::sync::Arc;

use crate::domain::foundation::{TicketId, UserId};
use crate::domain::ticketing::{Ticket, TicketingError};
use crate::ports::TicketRepository;

/// Query for all tickets of the authenticated buyer.
#[derive(Debug, Clone)]
pub struct ListTicketsQuery {
    pub buyer_id: UserId,
}

/// Handler listing a buyer's tickets, newest first.
pub struct ListTicketsHandler {
    tickets: Arc<dyn TicketRepository>,
}

impl ListTicketsHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    pub async fn handle(&self, query: ListTicketsQuery) -> Result<Vec<Ticket>, TicketingError> {
        Ok(self.tickets.list_for_buyer(&query.buyer_id).await?)
    }
}

/// Query for one ticket, scoped to the buyer.
#[derive(Debug, Clone)]
pub struct GetTicketQuery {
    pub buyer_id: UserId,
    pub ticket_id: TicketId,
}

/// Handler for a single owned ticket.
pub struct GetTicketHandler {
    tickets: Arc<dyn TicketRepository>,
}

impl GetTicketHandler {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    pub async fn handle(&self, query: GetTicketQuery) -> Result<Ticket, TicketingError> {
        self.tickets
            .find_for_buyer(&query.ticket_id, &query.buyer_id)
            .await?
            .ok_or(TicketingError::TicketNotFound(query.ticket_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, TicketTypeId, Timestamp};
    use async_trait::async_trait;

    struct MockTicketRepository {
        tickets: Vec<Ticket>,
    }

    #[async_trait]
    impl TicketRepository for MockTicketRepository {
        async fn reserve(
            &self,
            _ticket_type_id: &TicketTypeId,
            _buyer_id: &UserId,
        ) -> Result<Ticket, DomainError> {
            unreachable!("not used by read tests")
        }

        async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
            Ok(self.tickets.iter().find(|t| &t.id == id).cloned())
        }

        async fn find_for_buyer(
            &self,
            id: &TicketId,
            buyer_id: &UserId,
        ) -> Result<Option<Ticket>, DomainError> {
            Ok(self
                .tickets
                .iter()
                .find(|t| &t.id == id && t.is_owned_by(buyer_id))
                .cloned())
        }

        async fn list_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<Ticket>, DomainError> {
            Ok(self
                .tickets
                .iter()
                .filter(|t| t.is_owned_by(buyer_id))
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn list_returns_only_own_tickets() {
        let buyer = UserId::new();
        let other = UserId::new();
        let repo = Arc::new(MockTicketRepository {
            tickets: vec![
                Ticket::purchased(TicketTypeId::new(), buyer, Timestamp::now()),
                Ticket::purchased(TicketTypeId::new(), other, Timestamp::now()),
                Ticket::purchased(TicketTypeId::new(), buyer, Timestamp::now()),
            ],
        });
        let handler = ListTicketsHandler::new(repo);

        let tickets = handler
            .handle(ListTicketsQuery { buyer_id: buyer })
            .await
            .unwrap();

        assert_eq!(tickets.len(), 2);
        assert!(tickets.iter().all(|t| t.is_owned_by(&buyer)));
    }

    #[tokio::test]
    async fn get_scopes_to_owner() {
        let buyer = UserId::new();
        let ticket = Ticket::purchased(TicketTypeId::new(), buyer, Timestamp::now());
        let repo = Arc::new(MockTicketRepository {
            tickets: vec![ticket.clone()],
        });
        let handler = GetTicketHandler::new(repo);

        let found = handler
            .handle(GetTicketQuery {
                buyer_id: buyer,
                ticket_id: ticket.id,
            })
            .await
            .unwrap();
        assert_eq!(found.id, ticket.id);

        let stranger = handler
            .handle(GetTicketQuery {
                buyer_id: UserId::new(),
                ticket_id: ticket.id,
            })
            .await;
        assert!(matches!(stranger, Err(TicketingError::TicketNotFound(_))));
    }
}
