//! HTTP adapters - axum routers, DTOs and API error mapping.

pub mod ticketing;
