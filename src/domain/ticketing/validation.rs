//! Validation records and the entry state machine.
//!
//! A ticket's entry state is derived from its append-only validation
//! history: no valid record yet means the next well-formed attempt admits
//! the holder; once one valid record exists, every further attempt is
//! recorded as invalid, forever. The decision and the append must happen
//! inside one exclusive scope keyed on the ticket (see the
//! `ValidationRepository` contract) or two simultaneous scans could both
//! admit.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{TicketId, Timestamp, ValidationId};

/// How an entry attempt was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMethod {
    QrScan,
    Manual,
}

/// Outcome of an entry attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid,
    Invalid,
}

/// Entry state of a ticket, derived from its validation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Unvalidated,
    Validated,
}

impl EntryState {
    /// Derives the state from whether any valid record exists.
    pub fn from_history(has_valid_record: bool) -> Self {
        if has_valid_record {
            EntryState::Validated
        } else {
            EntryState::Unvalidated
        }
    }

    /// Decides the outcome of the next entry attempt.
    ///
    /// Validated is terminal: the attempt is still recorded, but resolves
    /// to invalid.
    pub fn decide_next(&self) -> ValidationOutcome {
        match self {
            EntryState::Unvalidated => ValidationOutcome::Valid,
            EntryState::Validated => ValidationOutcome::Invalid,
        }
    }
}

/// One immutable record of an entry attempt.
///
/// Append-only: never updated or deleted. At most one record per ticket may
/// carry the valid outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub id: ValidationId,
    pub ticket_id: TicketId,
    pub method: ValidationMethod,
    pub outcome: ValidationOutcome,
    pub created_at: Timestamp,
}

impl Validation {
    /// Records an entry attempt with the decided outcome.
    pub fn record(
        ticket_id: TicketId,
        method: ValidationMethod,
        outcome: ValidationOutcome,
        now: Timestamp,
    ) -> Self {
        Self {
            id: ValidationId::new(),
            ticket_id,
            method,
            outcome,
            created_at: now,
        }
    }

    /// Whether this record admitted the ticket holder.
    pub fn admitted(&self) -> bool {
        self.outcome == ValidationOutcome::Valid
    }
}
