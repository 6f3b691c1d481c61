/// Boundary geometry reduction.
///
/// Each region is queried at a single point. The point is the plain vertex
/// average of the exterior ring of the first polygon; it is not an
/// area-weighted centroid and leans toward densely digitized stretches of
/// boundary. Keep it that way: changing the formula moves every region's
/// query coordinates.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{Centroid, GeometryError};

/// A GeoJSON position, `[lon, lat]` with an optional trailing altitude.
pub type Position = Vec<f64>;

/// Geometry kinds that can be reduced to a point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Parses a GeoJSON geometry object.
    ///
    /// Kinds other than Polygon / MultiPolygon (including a missing or null
    /// geometry) yield `GeometryError::Unsupported`; a supported kind whose
    /// coordinates do not decode yields `GeometryError::Malformed`.
    pub fn from_geojson(value: &Value) -> Result<Self, GeometryError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| GeometryError::Unsupported(describe_kind(value)))?;

        match kind {
            "Polygon" | "MultiPolygon" => Geometry::deserialize(value)
                .map_err(|e| GeometryError::Malformed(e.to_string())),
            other => Err(GeometryError::Unsupported(other.to_string())),
        }
    }

    /// Exterior ring of the first polygon.
    pub fn exterior_ring(&self) -> Result<&[Position], GeometryError> {
        let rings = match self {
            Geometry::Polygon(rings) => rings.as_slice(),
            Geometry::MultiPolygon(parts) => parts
                .first()
                .map(Vec::as_slice)
                .ok_or_else(|| GeometryError::Malformed("MultiPolygon has no parts".into()))?,
        };
        rings
            .first()
            .map(Vec::as_slice)
            .ok_or_else(|| GeometryError::Malformed("polygon has no rings".into()))
    }
}

fn describe_kind(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Object(_) => "object without type".to_string(),
        other => format!("non-object geometry ({})", other),
    }
}

/// Vertex average of the first polygon's exterior ring.
pub fn centroid(geometry: &Geometry) -> Result<Centroid, GeometryError> {
    let ring = geometry.exterior_ring()?;
    if ring.is_empty() {
        return Err(GeometryError::EmptyRing);
    }

    let mut lon_sum = 0.0;
    let mut lat_sum = 0.0;
    for position in ring {
        match position.as_slice() {
            [lon, lat, ..] => {
                lon_sum += lon;
                lat_sum += lat;
            }
            _ => {
                return Err(GeometryError::Malformed(format!(
                    "position with {} coordinate(s)",
                    position.len()
                )));
            }
        }
    }

    let n = ring.len() as f64;
    Ok(Centroid {
        lon: lon_sum / n,
        lat: lat_sum / n,
    })
}

/// Parses a raw GeoJSON geometry and reduces it to its centroid.
pub fn centroid_of(value: &Value) -> Result<Centroid, GeometryError> {
    centroid(&Geometry::from_geojson(value)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
