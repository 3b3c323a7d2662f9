//! PostgreSQL implementation of TicketRepository.
//!
//! The reservation path is the one place where overselling can happen, so
//! it takes a row lock on the ticket type (`SELECT ... FOR UPDATE`) and
//! holds it across the issued-count read and the ticket insert. Concurrent
//! purchases of the same ticket type serialize on that lock; purchases of
//! different ticket types lock different rows and proceed in parallel.
//! Lock waiting is bounded by a `lock_timeout` local to the transaction, so
//! a contended reservation fails fast as a retryable error instead of
//! queueing without bound.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, TicketId, TicketTypeId, Timestamp, UserId,
};
use crate::domain::ticketing::{Ticket, TicketStatus, TicketType};
use crate::ports::TicketRepository;

/// SQLSTATE raised by Postgres when `lock_timeout` expires.
const LOCK_NOT_AVAILABLE: &str = "55P03";

const DEFAULT_LOCK_TIMEOUT_MS: u64 = 3_000;

/// PostgreSQL implementation of the TicketRepository port.
pub struct PostgresTicketRepository {
    pool: PgPool,
    lock_timeout_ms: u64,
}

impl PostgresTicketRepository {
    /// Creates a repository with the default lock-wait bound.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Overrides the lock-wait bound (milliseconds).
    pub fn with_lock_timeout_ms(mut self, ms: u64) -> Self {
        self.lock_timeout_ms = ms;
        self
    }
}

/// Database row representation of a ticket type.
#[derive(Debug, sqlx::FromRow)]
struct TicketTypeRow {
    id: Uuid,
    event_id: Uuid,
    name: String,
    description: Option<String>,
    price_cents: i64,
    total_capacity: i32,
}

impl From<TicketTypeRow> for TicketType {
    fn from(row: TicketTypeRow) -> Self {
        TicketType {
            id: TicketTypeId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            // Schema constrains capacity to be non-negative.
            total_capacity: u32::try_from(row.total_capacity).unwrap_or(0),
        }
    }
}

/// Database row representation of a ticket.
#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    ticket_type_id: Uuid,
    buyer_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = DomainError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: TicketId::from_uuid(row.id),
            ticket_type_id: TicketTypeId::from_uuid(row.ticket_type_id),
            buyer_id: UserId::from_uuid(row.buyer_id),
            status: parse_status(&row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_status(s: &str) -> Result<TicketStatus, DomainError> {
    match s {
        "purchased" => Ok(TicketStatus::Purchased),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid ticket status value: {}", s),
        )),
    }
}

fn status_to_string(status: &TicketStatus) -> &'static str {
    match status {
        TicketStatus::Purchased => "purchased",
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(LOCK_NOT_AVAILABLE) {
            return DomainError::new(
                ErrorCode::LockTimeout,
                format!("{}: lock wait exceeded", context),
            );
        }
    }
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn reserve(
        &self,
        ticket_type_id: &TicketTypeId,
        buyer_id: &UserId,
    ) -> Result<Ticket, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin reservation", e))?;

        // Bound the wait on the ticket-type row; applies only inside this
        // transaction. The value is our own integer, not user input.
        sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout_ms))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to set lock timeout", e))?;

        // Exclusive scope: lock the ticket-type row for the remainder of
        // the transaction. Everything up to the commit sees a frozen
        // capacity and a count no concurrent reservation can move.
        let row: Option<TicketTypeRow> = sqlx::query_as(
            r#"
            SELECT id, event_id, name, description, price_cents, total_capacity
            FROM ticket_types
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(ticket_type_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to lock ticket type", e))?;

        let Some(row) = row else {
            return Err(DomainError::new(
                ErrorCode::TicketTypeNotFound,
                format!("Ticket type not found: {}", ticket_type_id),
            )
            .with_detail("ticket_type_id", ticket_type_id.to_string()));
        };
        let ticket_type = TicketType::from(row);

        let (issued_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE ticket_type_id = $1")
                .bind(ticket_type_id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to count issued tickets", e))?;

        let issued = u32::try_from(issued_count).unwrap_or(u32::MAX);
        if !ticket_type.can_issue_one(issued) {
            // Dropping the transaction rolls it back; no row is created.
            return Err(DomainError::new(
                ErrorCode::TicketsSoldOut,
                format!("Tickets sold out for ticket type: {}", ticket_type_id),
            )
            .with_detail("ticket_type_id", ticket_type_id.to_string()));
        }

        let ticket = Ticket::purchased(*ticket_type_id, *buyer_id, Timestamp::now());

        sqlx::query(
            r#"
            INSERT INTO tickets (id, ticket_type_id, buyer_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(ticket.ticket_type_id.as_uuid())
        .bind(ticket.buyer_id.as_uuid())
        .bind(status_to_string(&ticket.status))
        .bind(ticket.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to insert ticket", e))?;

        // The insert must be durable before the lock is released, so the
        // next contender's count includes this ticket.
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit reservation", e))?;

        Ok(ticket)
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
        let row: Option<TicketRow> = sqlx::query_as(
            r#"
            SELECT id, ticket_type_id, buyer_id, status, created_at
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find ticket", e))?;

        row.map(Ticket::try_from).transpose()
    }

    async fn find_for_buyer(
        &self,
        id: &TicketId,
        buyer_id: &UserId,
    ) -> Result<Option<Ticket>, DomainError> {
        let row: Option<TicketRow> = sqlx::query_as(
            r#"
            SELECT id, ticket_type_id, buyer_id, status, created_at
            FROM tickets
            WHERE id = $1 AND buyer_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(buyer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find ticket", e))?;

        row.map(Ticket::try_from).transpose()
    }

    async fn list_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<Ticket>, DomainError> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            r#"
            SELECT id, ticket_type_id, buyer_id, status, created_at
            FROM tickets
            WHERE buyer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(buyer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list tickets", e))?;

        rows.into_iter().map(Ticket::try_from).collect()
    }
}
