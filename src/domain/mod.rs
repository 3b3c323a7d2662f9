//! Domain layer - entities, value objects, and business rules.

pub mod foundation;
pub mod ticketing;
