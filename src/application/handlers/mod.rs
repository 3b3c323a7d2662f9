//! Application handlers - one command or query handler per operation.

pub mod ticketing;
