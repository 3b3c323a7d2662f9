//! PostgreSQL implementation of ValidationRepository.
//!
//! The decide-and-append runs inside one transaction that locks the ticket
//! row, mirroring the reservation discipline but keyed per ticket: two
//! simultaneous scans of one credential serialize, the first admits, the
//! second observes the committed valid record and is recorded invalid.
//! The schema additionally carries a partial unique index on
//! `(ticket_id) WHERE outcome = 'valid'`; if a competing writer slips a
//! valid row in anyway, the constraint violation is converted into the
//! invalid outcome rather than an error.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, TicketId, Timestamp};
use crate::domain::ticketing::{
    EntryState, Validation, ValidationMethod, ValidationOutcome,
};
use crate::ports::ValidationRepository;

const LOCK_NOT_AVAILABLE: &str = "55P03";
const ONE_VALID_PER_TICKET_IDX: &str = "validations_one_valid_per_ticket_idx";
const APPEND_SAVEPOINT: &str = "validation_append";

const DEFAULT_LOCK_TIMEOUT_MS: u64 = 3_000;

/// PostgreSQL implementation of the ValidationRepository port.
pub struct PostgresValidationRepository {
    pool: PgPool,
    lock_timeout_ms: u64,
}

impl PostgresValidationRepository {
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

fn method_to_string(method: &ValidationMethod) -> &'static str {
    match method {
        ValidationMethod::QrScan => "qr_scan",
        ValidationMethod::Manual => "manual",
    }
}

fn outcome_to_string(outcome: &ValidationOutcome) -> &'static str {
    match outcome {
        ValidationOutcome::Valid => "valid",
        ValidationOutcome::Invalid => "invalid",
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

fn is_one_valid_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.constraint() == Some(ONE_VALID_PER_TICKET_IDX);
    }
    false
}

async fn insert_validation(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    validation: &Validation,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO validations (id, ticket_id, method, outcome, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(validation.id.as_uuid())
    .bind(validation.ticket_id.as_uuid())
    .bind(method_to_string(&validation.method))
    .bind(outcome_to_string(&validation.outcome))
    .bind(validation.created_at.as_datetime())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl ValidationRepository for PostgresValidationRepository {
    async fn record(
        &self,
        ticket_id: &TicketId,
        method: ValidationMethod,
    ) -> Result<Validation, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin validation", e))?;

        sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout_ms))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to set lock timeout", e))?;

        // Exclusive scope keyed on the ticket. Also doubles as the
        // existence check.
        let locked: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT id FROM tickets WHERE id = $1 FOR UPDATE")
                .bind(ticket_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to lock ticket", e))?;

        if locked.is_none() {
            return Err(DomainError::new(
                ErrorCode::TicketNotFound,
                format!("Ticket not found: {}", ticket_id),
            )
            .with_detail("ticket_id", ticket_id.to_string()));
        }

        let (has_valid,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM validations
                WHERE ticket_id = $1 AND outcome = 'valid'
            )
            "#,
        )
        .bind(ticket_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to read validation history", e))?;

        let outcome = EntryState::from_history(has_valid).decide_next();
        let mut validation = Validation::record(*ticket_id, method, outcome, Timestamp::now());

        // The append runs under a savepoint: a valid row committed by a
        // writer that bypassed the lock trips the partial unique index,
        // and the failed INSERT aborts everything after the savepoint.
        // Rolling back to it keeps the transaction usable for recording
        // the loss as invalid.
        sqlx::query(&format!("SAVEPOINT {}", APPEND_SAVEPOINT))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to set savepoint", e))?;

        if let Err(e) = insert_validation(&mut tx, &validation).await {
            if !is_one_valid_violation(&e) {
                return Err(db_error("Failed to insert validation", e));
            }
            sqlx::query(&format!("ROLLBACK TO SAVEPOINT {}", APPEND_SAVEPOINT))
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to roll back validation append", e))?;
            validation =
                Validation::record(*ticket_id, method, ValidationOutcome::Invalid, Timestamp::now());
            insert_validation(&mut tx, &validation)
                .await
                .map_err(|e| db_error("Failed to insert validation", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit validation", e))?;

        Ok(validation)
    }
}
