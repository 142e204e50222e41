//! Models module
//!
//! Este módulo contiene los modelos de datos del servicio: el registro
//! de routing persistido, el resultado reformateado y los tipos GeoJSON.

pub mod geo;
pub mod route_result;
pub mod routing_request;

pub use geo::*;
pub use route_result::*;
pub use routing_request::*;
