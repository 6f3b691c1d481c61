/// Region registry loaded from the municipal boundary dataset.
///
/// The dataset is a GeoJSON FeatureCollection (ESRI/IGN municipal limits).
/// Each feature becomes one `Region`, in file order; that order is kept all
/// the way to the output document.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::model::{PreconditionError, Region};

/// Name used when a feature carries no name property.
pub const UNKNOWN_REGION_NAME: &str = "Desconocido";

/// Which feature properties hold the region's name and code.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RegionKeys {
    pub name_property: String,
    pub code_property: String,
}

impl Default for RegionKeys {
    fn default() -> Self {
        Self {
            name_property: "NAMEUNIT".to_string(),
            code_property: "NATCODE".to_string(),
        }
    }
}

/// Reads and parses the boundary dataset.
///
/// A missing, unreadable or non-GeoJSON file is fatal for the run.
/// Individual features are never rejected here: a feature without geometry
/// is kept (geometry `null`) and skipped later as unsupported.
pub fn load_regions(path: &Path, keys: &RegionKeys) -> Result<Vec<Region>, PreconditionError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PreconditionError::InputNotFound(display.clone()),
        _ => PreconditionError::InputUnreadable {
            path: display.clone(),
            source: e,
        },
    })?;

    let document: Value =
        serde_json::from_str(&text).map_err(|e| PreconditionError::InputMalformed {
            path: display.clone(),
            source: e,
        })?;

    regions_from_geojson(&document, keys).ok_or(PreconditionError::MissingFeatures(display))
}

/// Extracts regions from a parsed FeatureCollection.
///
/// Returns `None` when the document has no `features` array.
pub fn regions_from_geojson(document: &Value, keys: &RegionKeys) -> Option<Vec<Region>> {
    let features = document.get("features")?.as_array()?;
    Some(features.iter().map(|f| region_from_feature(f, keys)).collect())
}

fn region_from_feature(feature: &Value, keys: &RegionKeys) -> Region {
    let properties = feature.get("properties");
    let name = property_text(properties, &keys.name_property)
        .unwrap_or_else(|| UNKNOWN_REGION_NAME.to_string());
    let code = property_text(properties, &keys.code_property).unwrap_or_default();

    Region {
        name,
        code,
        geometry: feature.get("geometry").cloned().unwrap_or(Value::Null),
    }
}

/// Property value as text. Numeric codes are rendered as written.
fn property_text(properties: Option<&Value>, key: &str) -> Option<String> {
    match properties?.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
