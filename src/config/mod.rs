//! Configuration module

pub mod environment;

pub use environment::*;
