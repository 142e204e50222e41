//! Clients module
//!
//! Clientes HTTP hacia servicios externos.

pub mod api_client;

pub use api_client::*;
