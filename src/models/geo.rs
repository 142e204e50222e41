//! Tipos GeoJSON mínimos
//!
//! Los registros de routing guardan `origin`/`destination` como GeoJSON
//! `Point` y el resultado lleva la geometría como `LineString`. Ambos
//! usan el orden de ejes GeoJSON: [longitud, latitud].

use serde::{Deserialize, Serialize};

/// GeoJSON Point con coordenadas [longitud, latitud]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: [f64; 2],
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            geometry_type: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// GeoJSON LineString con coordenadas [longitud, latitud]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl LineString {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            geometry_type: "LineString".to_string(),
            coordinates,
        }
    }
}
