//! Utilidades compartidas
//!
//! Manejo de errores y decodificación de flexible polyline.

pub mod errors;
pub mod polyline;

pub use errors::*;
