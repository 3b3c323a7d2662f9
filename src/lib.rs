//! Ticketline - Event Ticketing Reservation and Validation Backend
//!
//! This crate implements oversell-safe concurrent ticket purchase and
//! exactly-once entry validation on top of PostgreSQL row locking.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
