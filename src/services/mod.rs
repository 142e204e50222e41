//! Services module
//!
//! Este módulo contiene la lógica de negocio del servicio: armado del
//! payload, reformateo de la respuesta y el loop de reconciliación.

pub mod payload_builder;
pub mod response_transformer;
pub mod routing_service;

pub use routing_service::*;
