//! Armado del payload para la API de routing
//!
//! Este módulo mapea los campos de un RoutingRequest al esquema de
//! parámetros del servicio remoto. Es una función pura: no toca el
//! almacén ni la red.

use serde_json::{json, Map, Value};

use crate::models::routing_request::RoutingRequest;
use crate::utils::errors::{SyncError, SyncResult};

/// Extrae las coordenadas de un GeoJSON Point crudo, validando su
/// estructura: type exactamente "Point" y coordinates con exactamente
/// dos números. Devuelve (longitud, latitud), el orden de GeoJSON.
pub fn get_coordinates(value: &Value) -> SyncResult<(f64, f64)> {
    let kind = value.get("type").and_then(Value::as_str);
    if kind != Some("Point") {
        return Err(SyncError::Validation(
            "El campo debe ser un GeoJSON de tipo 'Point'".to_string(),
        ));
    }

    let coordinates = value
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SyncError::Validation("El campo 'coordinates' debe ser un arreglo".to_string())
        })?;

    if coordinates.len() != 2 {
        return Err(SyncError::Validation(
            "El campo 'coordinates' debe tener exactamente dos valores".to_string(),
        ));
    }

    let longitude = coordinates[0].as_f64().ok_or_else(|| {
        SyncError::Validation("La longitud debe ser un valor numérico".to_string())
    })?;
    let latitude = coordinates[1].as_f64().ok_or_else(|| {
        SyncError::Validation("La latitud debe ser un valor numérico".to_string())
    })?;

    Ok((longitude, latitude))
}

/// Reemite un Point como `"<latitud>,<longitud>"`, la convención de
/// wire del servicio remoto (orden invertido respecto de GeoJSON)
pub fn format_coordinates(value: &Value) -> SyncResult<String> {
    let (longitude, latitude) = get_coordinates(value)?;
    Ok(format!("{},{}", latitude, longitude))
}

/// Construye el conjunto de parámetros para un registro pendiente.
///
/// Los campos de perfil del vehículo siguen dos políticas distintas y
/// deliberadas: un subconjunto fijo se emite siempre con default 0, el
/// resto solo cuando el registro trae valor. No unificar.
pub fn build(rota: &RoutingRequest) -> SyncResult<Map<String, Value>> {
    let origin = rota.origin.as_ref().ok_or_else(|| {
        SyncError::Validation(format!(
            "Los campos 'origin' y 'destination' son obligatorios para la ruta {}",
            rota.id
        ))
    })?;
    let destination = rota.destination.as_ref().ok_or_else(|| {
        SyncError::Validation(format!(
            "Los campos 'origin' y 'destination' son obligatorios para la ruta {}",
            rota.id
        ))
    })?;

    let mut params = Map::new();
    params.insert("origin".to_string(), json!(format_coordinates(origin)?));
    params.insert(
        "destination".to_string(),
        json!(format_coordinates(destination)?),
    );

    if let Some(transport_mode) = &rota.transport_mode {
        params.insert("transportMode".to_string(), json!(transport_mode));
    }
    if let Some(currency) = &rota.currency {
        params.insert("currency".to_string(), json!(currency));
    }
    if let Some(routing_mode) = &rota.routing_mode {
        params.insert("routingMode".to_string(), json!(routing_mode));
    }

    // Las listas ausentes se emiten como string vacío, lo exige la API
    params.insert("return".to_string(), json!(join_list(&rota.return_attributes)));
    params.insert("spans".to_string(), json!(join_list(&rota.span_attributes)));

    // Subconjunto con default 0: estos parámetros tienen un default
    // numérico significativo del lado del servicio
    params.insert(
        "vehicle[weightPerAxle]".to_string(),
        json!(rota.vehicle_weight_per_axle.unwrap_or(0)),
    );
    params.insert(
        "vehicle[width]".to_string(),
        json!(rota.vehicle_width.unwrap_or(0)),
    );
    params.insert(
        "vehicle[length]".to_string(),
        json!(rota.vehicle_length.unwrap_or(0)),
    );
    params.insert(
        "vehicle[kpraLength]".to_string(),
        json!(rota.vehicle_kpra_length.unwrap_or(0)),
    );
    params.insert(
        "vehicle[payloadCapacity]".to_string(),
        json!(rota.vehicle_payload_capacity.unwrap_or(0)),
    );
    params.insert(
        "vehicle[speedCap]".to_string(),
        json!(rota.vehicle_speed_cap.unwrap_or(0.0)),
    );
    params.insert(
        "vehicle[grossWeight]".to_string(),
        json!(rota.vehicle_gross_weight.unwrap_or(0)),
    );

    // Subconjunto solo-si-presente: emitirlos vacíos pisaría los
    // defaults del servicio remoto
    if let Some(current_weight) = rota.vehicle_current_weight {
        params.insert("vehicle[currentWeight]".to_string(), json!(current_weight));
    }
    if let Some(tunnel_category) = &rota.vehicle_tunnel_category {
        params.insert("vehicle[tunnelCategory]".to_string(), json!(tunnel_category));
    }
    if let Some(axle_count) = rota.vehicle_axle_count {
        params.insert("vehicle[axleCount]".to_string(), json!(axle_count));
    }
    if let Some(vehicle_type) = &rota.vehicle_type {
        params.insert("vehicle[type]".to_string(), json!(vehicle_type));
    }
    if let Some(category) = &rota.vehicle_category {
        params.insert("vehicle[category]".to_string(), json!(category));
    }
    if let Some(trailer_count) = rota.vehicle_trailer_count {
        params.insert("vehicle[trailerCount]".to_string(), json!(trailer_count));
    }
    if let Some(license_plate) = &rota.vehicle_license_plate {
        params.insert("vehicle[licensePlate]".to_string(), json!(license_plate));
    }
    if let Some(occupancy) = rota.vehicle_occupancy {
        params.insert("vehicle[occupancy]".to_string(), json!(occupancy));
    }
    if let Some(engine_type) = &rota.vehicle_engine_type {
        params.insert("vehicle[engineType]".to_string(), json!(engine_type));
    }
    if let Some(height) = rota.vehicle_height_above_first_axle {
        params.insert("vehicle[heightAboveFirstAxle]".to_string(), json!(height));
    }
    if let Some(commercial) = rota.vehicle_commercial {
        params.insert("vehicle[commercial]".to_string(), json!(commercial));
    }
    if let Some(goods) = &rota.shipped_hazardous_goods {
        params.insert(
            "vehicle[shippedHazardousGoods]".to_string(),
            json!(goods.join(",")),
        );
    }

    Ok(params)
}

/// Une una lista opcional con comas; ausente se vuelve string vacío
fn join_list(list: &Option<Vec<String>>) -> String {
    list.as_ref()
        .map(|items| items.join(","))
        .unwrap_or_default()
}
