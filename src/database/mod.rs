//! Database module

pub mod connection;

pub use connection::*;
