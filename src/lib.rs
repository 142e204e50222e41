//! Sincronización de registros de routing contra la API de HERE
//!
//! Un scheduler periódico reconcilia los registros en borrador de la
//! tabla `here_routing`: arma el payload, llama al servicio remoto,
//! decodifica el polyline de la respuesta y persiste el resultado
//! aplanado (o la falla) registro por registro.

pub mod clients;
pub mod config;
pub mod database;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
