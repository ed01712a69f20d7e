//! Core types and engines for the Safepath geofence service.
//!
//! This crate has no HTTP and database dependencies. It owns
//! the geometry, the in-memory zone store, zone evaluation, zone authoring
//! rules and breach detection. Durability is delegated to a
//! [`repository::Repository`] implementation supplied by the host.

pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod manager;
pub mod notifier;
pub mod repository;
pub mod sample;
pub mod store;
pub mod zone;

pub use error::{Error, Result, ValidationError};
