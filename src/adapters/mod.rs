//! Adapters layer - concrete implementations of the ports.
//!
//! - `postgres` - sqlx-backed repositories
//! - `http` - axum API surface
//! - `render` - external QR rendering collaborator

pub mod http;
pub mod postgres;
pub mod render;
