//! Repositories module
//!
//! Acceso a datos sobre PostgreSQL.

pub mod routing_repository;

pub use routing_repository::*;
