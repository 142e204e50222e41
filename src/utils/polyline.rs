//! Decodificador de flexible polyline
//!
//! La API de routing de HERE devuelve la geometría de cada sección como
//! un string compacto ("flexible polyline"). Este módulo lo decodifica
//! a una secuencia de pares (latitud, longitud).
//!
//! Formato: cada carácter aporta 6 bits; el bit 0x20 marca continuación
//! del varint. El primer varint es la versión del encabezado (1), el
//! segundo empaqueta precisión (bits 0-3), tipo de tercera dimensión
//! (bits 4-6) y su precisión (bits 7-10). Luego siguen deltas zigzag
//! por punto.

use crate::utils::errors::{SyncError, SyncResult};

const FORMAT_VERSION: u64 = 1;

/// Tabla de decodificación: índice por `byte - 45` ('-' es el menor
/// carácter válido). -1 marca un carácter inválido.
const DECODING_TABLE: [i8; 78] = [
    62, -1, -1, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, -1, -1, -1, -1, -1, -1, -1, 0, 1, 2, 3, 4,
    5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, -1, -1, -1, -1,
    63, -1, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46,
    47, 48, 49, 50, 51,
];

/// Decodifica un flexible polyline a pares (latitud, longitud).
///
/// La tercera dimensión (altitud, elevación...), si está presente,
/// se decodifica y se descarta: el resultado siempre es 2D.
pub fn decode(encoded: &str) -> SyncResult<Vec<(f64, f64)>> {
    let mut values = encoded.bytes().map(decode_char);

    let version = decode_unsigned(&mut values)?
        .ok_or_else(|| SyncError::Decode("polyline vacío".to_string()))?;
    if version != FORMAT_VERSION {
        return Err(SyncError::Decode(format!(
            "versión de polyline no soportada: {}",
            version
        )));
    }

    let header = decode_unsigned(&mut values)?
        .ok_or_else(|| SyncError::Decode("encabezado de polyline incompleto".to_string()))?;
    let precision = (header & 0x0F) as u32;
    let third_dim = (header >> 4) & 0x07;
    let factor = 10f64.powi(precision as i32);

    let mut points = Vec::new();
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    loop {
        let Some(delta_lat) = decode_signed(&mut values)? else {
            break;
        };
        lat += delta_lat;

        let delta_lng = decode_signed(&mut values)?
            .ok_or_else(|| SyncError::Decode("polyline truncado: falta longitud".to_string()))?;
        lng += delta_lng;

        if third_dim != 0 {
            decode_signed(&mut values)?.ok_or_else(|| {
                SyncError::Decode("polyline truncado: falta tercera dimensión".to_string())
            })?;
        }

        points.push((lat as f64 / factor, lng as f64 / factor));
    }

    Ok(points)
}

fn decode_char(byte: u8) -> SyncResult<u64> {
    let index = (byte as i16) - 45;
    let value = if (0..78).contains(&index) {
        DECODING_TABLE[index as usize]
    } else {
        -1
    };
    if value < 0 {
        return Err(SyncError::Decode(format!(
            "carácter inválido en polyline: {:?}",
            byte as char
        )));
    }
    Ok(value as u64)
}

/// Lee un varint sin signo; `None` si el stream terminó limpiamente.
fn decode_unsigned<I>(values: &mut I) -> SyncResult<Option<u64>>
where
    I: Iterator<Item = SyncResult<u64>>,
{
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(value) = values.next() else {
            if shift == 0 {
                return Ok(None);
            }
            return Err(SyncError::Decode("varint de polyline truncado".to_string()));
        };
        let value = value?;

        result |= (value & 0x1F) << shift;
        if value & 0x20 == 0 {
            return Ok(Some(result));
        }
        shift += 5;
        if shift > 60 {
            return Err(SyncError::Decode("varint de polyline desbordado".to_string()));
        }
    }
}

fn decode_signed<I>(values: &mut I) -> SyncResult<Option<i64>>
where
    I: Iterator<Item = SyncResult<u64>>,
{
    let Some(value) = decode_unsigned(values)? else {
        return Ok(None);
    };
    // Decodificación zigzag
    if value & 1 == 1 {
        Ok(Some(-(((value + 1) >> 1) as i64)))
    } else {
        Ok(Some((value >> 1) as i64))
    }
}
