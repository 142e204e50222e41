//! Reformateo de la respuesta del servicio de routing
//!
//! Este módulo aplana la estructura anidada que devuelve HERE
//! (routes → sections → departure/arrival/spans) al esquema plano del
//! registro, decodificando el flexible polyline de cada sección a un
//! GeoJSON LineString.

use serde_json::{Map, Value};

use crate::models::geo::{LineString, Point};
use crate::models::route_result::{Place, Route, RouteResult, Section, Span, Transport};
use crate::utils::errors::SyncResult;
use crate::utils::polyline;

/// Precisión de redondeo para max_speed
const SPEED_PRECISION: f64 = 1e7;

/// Transforma la respuesta cruda del servicio remoto al resultado
/// aplanado. Una respuesta sin `routes` produce un resultado vacío,
/// no un error.
pub fn transform(raw: &Value) -> SyncResult<RouteResult> {
    let Some(routes) = raw.get("routes").and_then(Value::as_array) else {
        return Ok(RouteResult::default());
    };

    let routes = routes
        .iter()
        .map(transform_route)
        .collect::<SyncResult<Vec<Route>>>()?;

    Ok(RouteResult { routes })
}

fn transform_route(route: &Value) -> SyncResult<Route> {
    let sections = route
        .get("sections")
        .and_then(Value::as_array)
        .map(|sections| {
            sections
                .iter()
                .map(transform_section)
                .collect::<SyncResult<Vec<Section>>>()
        })
        .transpose()?
        .unwrap_or_default();

    Ok(Route {
        id: string_or_empty(route.get("id")),
        sections,
    })
}

fn transform_section(section: &Value) -> SyncResult<Section> {
    // El decode entrega pares (lat, lng); GeoJSON exige [lng, lat], así
    // que la transposición acá es obligatoria, no una copia
    let coordinates = match section.get("polyline").and_then(Value::as_str) {
        Some(encoded) if !encoded.is_empty() => polyline::decode(encoded)?
            .into_iter()
            .map(|(latitude, longitude)| [longitude, latitude])
            .collect(),
        _ => Vec::new(),
    };

    let mut places = Vec::new();
    if let Some(departure) = section.get("departure") {
        places.push(transform_place("departure", departure));
    }
    if let Some(arrival) = section.get("arrival") {
        places.push(transform_place("arrival", arrival));
    }

    let spans = section
        .get("spans")
        .and_then(Value::as_array)
        .map(|spans| spans.iter().map(transform_span).collect())
        .unwrap_or_default();

    Ok(Section {
        id: string_or_empty(section.get("id")),
        section_type: section
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("vehicle")
            .to_string(),
        language: section
            .get("language")
            .and_then(Value::as_str)
            .unwrap_or("en-us")
            .to_string(),
        polyline: LineString::new(coordinates),
        transport: transform_transport(section.get("transport")),
        places,
        spans,
    })
}

fn transform_transport(transport: Option<&Value>) -> Transport {
    let defaults = Transport::default();
    let Some(transport) = transport else {
        return defaults;
    };

    Transport {
        mode: transport
            .get("mode")
            .and_then(Value::as_str)
            .unwrap_or(&defaults.mode)
            .to_string(),
        current_weight: transport
            .get("currentWeight")
            .and_then(Value::as_i64)
            .unwrap_or(defaults.current_weight),
    }
}

/// Arma la entrada de lugar para departure/arrival: ubicación ajustada,
/// ubicación original previa al ajuste, timestamp y el payload crudo
fn transform_place(name: &str, entry: &Value) -> Place {
    let empty = Map::new();
    let place = entry
        .get("place")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let location = point_from(place.get("location"));
    // Sin ubicación original el lugar no fue ajustado: coinciden
    let original_location = place
        .get("originalLocation")
        .map(|original| point_from(Some(original)))
        .unwrap_or_else(|| location.clone());

    Place {
        name: name.to_string(),
        place_type: "place".to_string(),
        location,
        original_location,
        time: string_or_empty(entry.get("time")),
        raw: Value::Object(place.clone()),
    }
}

fn point_from(location: Option<&Value>) -> Point {
    let longitude = location
        .and_then(|l| l.get("lng"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let latitude = location
        .and_then(|l| l.get("lat"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    Point::new(longitude, latitude)
}

fn transform_span(span: &Value) -> Span {
    Span {
        offset: span.get("offset").and_then(Value::as_i64).unwrap_or(0),
        duration: span.get("duration").and_then(Value::as_i64).unwrap_or(0),
        max_speed: round_speed(span.get("maxSpeed").and_then(Value::as_f64)),
    }
}

/// Redondea a 7 decimales propagando la ausencia de valor, nunca falla
fn round_speed(value: Option<f64>) -> Option<f64> {
    value.map(|v| (v * SPEED_PRECISION).round() / SPEED_PRECISION)
}

fn string_or_empty(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::SyncError;
    use serde_json::json;

    // Vector de referencia del formato flexible polyline, precisión 5
    const POLYLINE: &str = "BFoz5xJ67i1B1B7PzIhaxL7Y";

    #[test]
    fn test_transform_without_routes_yields_empty_result() {
        let result = transform(&json!({})).unwrap();
        assert!(result.routes.is_empty());

        let result = transform(&json!({ "notice": "no match" })).unwrap();
        assert!(result.routes.is_empty());
    }

    #[test]
    fn test_transform_empty_routes_array() {
        let result = transform(&json!({ "routes": [] })).unwrap();
        assert!(result.routes.is_empty());
    }

    #[test]
    fn test_transform_decodes_polyline_into_linestring() {
        let raw = json!({
            "routes": [{
                "id": "route-1",
                "sections": [{ "id": "section-1", "polyline": POLYLINE }]
            }]
        });

        let result = transform(&raw).unwrap();
        assert_eq!(result.routes.len(), 1);
        assert_eq!(result.routes[0].id, "route-1");

        let section = &result.routes[0].sections[0];
        assert_eq!(section.polyline.geometry_type, "LineString");
        assert_eq!(section.polyline.coordinates.len(), 4);
        // GeoJSON: longitud primero, latitud después
        let first = section.polyline.coordinates[0];
        assert!((first[0] - 8.69821).abs() < 1e-9);
        assert!((first[1] - 50.10228).abs() < 1e-9);
    }

    #[test]
    fn test_transform_malformed_polyline_fails_with_decode_error() {
        let raw = json!({
            "routes": [{ "sections": [{ "polyline": "!!!" }] }]
        });
        assert!(matches!(transform(&raw), Err(SyncError::Decode(_))));
    }

    #[test]
    fn test_section_defaults() {
        let raw = json!({ "routes": [{ "sections": [{}] }] });
        let result = transform(&raw).unwrap();
        let section = &result.routes[0].sections[0];

        assert_eq!(section.section_type, "vehicle");
        assert_eq!(section.language, "en-us");
        assert_eq!(section.transport.mode, "car");
        assert_eq!(section.transport.current_weight, 3000);
        assert!(section.polyline.coordinates.is_empty());
        assert!(section.places.is_empty());
        assert!(section.spans.is_empty());
    }

    #[test]
    fn test_route_id_defaults_to_empty_string() {
        let raw = json!({ "routes": [{}] });
        let result = transform(&raw).unwrap();
        assert_eq!(result.routes[0].id, "");
        assert!(result.routes[0].sections.is_empty());
    }

    #[test]
    fn test_transform_places_from_departure_and_arrival() {
        let raw = json!({
            "routes": [{
                "sections": [{
                    "departure": {
                        "time": "2023-10-01T12:00:00Z",
                        "place": {
                            "location": { "lat": 52.53, "lng": 13.38 },
                            "originalLocation": { "lat": 52.531, "lng": 13.381 }
                        }
                    },
                    "arrival": {
                        "place": { "location": { "lat": 52.50, "lng": 13.40 } }
                    }
                }]
            }]
        });

        let result = transform(&raw).unwrap();
        let places = &result.routes[0].sections[0].places;
        assert_eq!(places.len(), 2);

        let departure = &places[0];
        assert_eq!(departure.name, "departure");
        assert_eq!(departure.place_type, "place");
        assert_eq!(departure.time, "2023-10-01T12:00:00Z");
        assert_eq!(departure.location, Point::new(13.38, 52.53));
        assert_eq!(departure.original_location, Point::new(13.381, 52.531));
        assert!(departure.raw.get("location").is_some());

        let arrival = &places[1];
        assert_eq!(arrival.name, "arrival");
        // Sin timestamp queda string vacío, sin originalLocation coincide
        assert_eq!(arrival.time, "");
        assert_eq!(arrival.original_location, arrival.location);
    }

    #[test]
    fn test_transform_spans_renames_and_rounds_max_speed() {
        let raw = json!({
            "routes": [{
                "sections": [{
                    "spans": [
                        { "offset": 0, "duration": 120, "maxSpeed": 1.0 / 3.0 },
                        { "offset": 4, "duration": 60 }
                    ]
                }]
            }]
        });

        let result = transform(&raw).unwrap();
        let spans = &result.routes[0].sections[0].spans;
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].offset, 0);
        assert_eq!(spans[0].duration, 120);
        assert_eq!(spans[0].max_speed, Some(0.3333333));
        // maxSpeed ausente se propaga como None, sin fallar
        assert_eq!(spans[1].max_speed, None);
    }
}
