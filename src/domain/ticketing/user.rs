//! Minimal user representation.
//!
//! Identity provisioning and authentication live outside this service; the
//! ticketing core only needs to resolve a buyer id to a known user before
//! reserving against capacity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// A provisioned user known to the ticketing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub created_at: Timestamp,
}
