//! PostgreSQL implementation of CredentialRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    CredentialId, DomainError, ErrorCode, TicketId, Timestamp, UserId,
};
use crate::domain::ticketing::{Credential, CredentialStatus};
use crate::ports::CredentialRepository;

const ONE_ACTIVE_PER_TICKET_IDX: &str = "credentials_one_active_per_ticket_idx";

/// PostgreSQL implementation of the CredentialRepository port.
pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    /// Creates a new PostgresCredentialRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a credential.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    ticket_id: Uuid,
    status: String,
    token: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for Credential {
    type Error = DomainError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        Ok(Credential {
            id: CredentialId::from_uuid(row.id),
            ticket_id: TicketId::from_uuid(row.ticket_id),
            status: parse_status(&row.status)?,
            token: row.token,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_status(s: &str) -> Result<CredentialStatus, DomainError> {
    match s {
        "active" => Ok(CredentialStatus::Active),
        "revoked" => Ok(CredentialStatus::Revoked),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid credential status value: {}", s),
        )),
    }
}

fn status_to_string(status: &CredentialStatus) -> &'static str {
    match status {
        CredentialStatus::Active => "active",
        CredentialStatus::Revoked => "revoked",
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn save(&self, credential: &Credential) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, ticket_id, status, token, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(credential.id.as_uuid())
        .bind(credential.ticket_id.as_uuid())
        .bind(status_to_string(&credential.status))
        .bind(&credential.token)
        .bind(credential.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(ONE_ACTIVE_PER_TICKET_IDX) {
                    return DomainError::new(
                        ErrorCode::CredentialGenerationFailed,
                        "Ticket already has an active credential",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save credential: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_active(&self, id: &CredentialId) -> Result<Option<Credential>, DomainError> {
        let row: Option<CredentialRow> = sqlx::query_as(
            r#"
            SELECT id, ticket_id, status, token, created_at
            FROM credentials
            WHERE id = $1 AND status = 'active'
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find credential: {}", e),
            )
        })?;

        row.map(Credential::try_from).transpose()
    }

    async fn find_for_buyer(
        &self,
        ticket_id: &TicketId,
        buyer_id: &UserId,
    ) -> Result<Option<Credential>, DomainError> {
        // The join enforces the ownership scope; a ticket owned by another
        // buyer is indistinguishable from a missing one.
        let row: Option<CredentialRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.ticket_id, c.status, c.token, c.created_at
            FROM credentials c
            JOIN tickets t ON t.id = c.ticket_id
            WHERE c.ticket_id = $1 AND t.buyer_id = $2 AND c.status = 'active'
            "#,
        )
        .bind(ticket_id.as_uuid())
        .bind(buyer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find credential: {}", e),
            )
        })?;

        row.map(Credential::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_works_for_all_values() {
        assert_eq!(parse_status("active").unwrap(), CredentialStatus::Active);
        assert_eq!(parse_status("revoked").unwrap(), CredentialStatus::Revoked);
    }

    #[test]
    fn parse_status_rejects_invalid_values() {
        assert!(parse_status("consumed").is_err());
        assert!(parse_status("").is_err());
    }

    #[test]
    fn roundtrip_status_conversion() {
        for status in [CredentialStatus::Active, CredentialStatus::Revoked] {
            let s = status_to_string(&status);
            assert_eq!(parse_status(s).unwrap(), status);
        }
    }
}
