//! GeoJSON reading/writing for point layers
//!
//! Reads a FeatureCollection of Point features into a `PointLayer` and
//! writes one back out. The schema is inferred from feature properties:
//! keys in first-seen order, each typed by its first non-null value
//! (all-null keys fall back to string). The legacy `crs` member is
//! honored when it names an EPSG code; otherwise WGS84 is assumed.

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Field, FieldType, PointFeature, PointLayer, Schema};
use geo_types::Point;
use serde_json::{json, Map, Number, Value};
use std::fs;
use std::path::Path;

/// Read a GeoJSON file into a point layer
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<PointLayer> {
    let text = fs::read_to_string(path)?;
    points_from_geojson(&text)
}

/// Write a point layer to a GeoJSON file
pub fn write_points<P: AsRef<Path>>(layer: &PointLayer, path: P) -> Result<()> {
    let text = points_to_geojson(layer)?;
    fs::write(path, text)?;
    Ok(())
}

/// Parse a GeoJSON FeatureCollection string into a point layer.
///
/// Non-point geometries are rejected; features with null geometry are
/// kept as geometry-less rows so every input record survives.
pub fn points_from_geojson(text: &str) -> Result<PointLayer> {
    let root: Value = serde_json::from_str(text)?;
    let obj = root
        .as_object()
        .ok_or_else(|| invalid("top level is not an object"))?;

    match obj.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        other => {
            return Err(invalid(format!(
                "expected a FeatureCollection, found {}",
                other.unwrap_or("nothing")
            )))
        }
    }

    let features = obj
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("missing features array"))?;

    let schema = infer_schema(features);
    let crs = parse_crs(obj);
    let mut layer = PointLayer::new(schema, crs);

    for feature in features {
        let feature = feature
            .as_object()
            .ok_or_else(|| invalid("feature is not an object"))?;
        let geometry = parse_point_geometry(feature.get("geometry"))?;
        let properties = feature.get("properties").and_then(Value::as_object);

        let attributes = layer
            .schema()
            .fields()
            .iter()
            .map(|field| {
                properties
                    .and_then(|p| p.get(&field.name))
                    .map(|v| json_to_attribute(v, field.ty))
                    .unwrap_or(AttributeValue::Null)
            })
            .collect();

        layer.push(PointFeature {
            geometry,
            attributes,
        })?;
    }

    Ok(layer)
}

/// Serialize a point layer as a GeoJSON FeatureCollection string
pub fn points_to_geojson(layer: &PointLayer) -> Result<String> {
    let mut features = Vec::with_capacity(layer.len());

    for feature in layer.iter() {
        let mut properties = Map::new();
        for (field, value) in layer.schema().iter().zip(&feature.attributes) {
            properties.insert(field.name.clone(), attribute_to_json(value));
        }

        let geometry = match &feature.geometry {
            Some(p) => json!({
                "type": "Point",
                "coordinates": [p.x(), p.y()],
            }),
            None => Value::Null,
        };

        features.push(json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": properties,
        }));
    }

    let mut root = Map::new();
    root.insert("type".to_string(), json!("FeatureCollection"));
    if let Some(code) = layer.crs().epsg() {
        root.insert(
            "crs".to_string(),
            json!({
                "type": "name",
                "properties": { "name": format!("urn:ogc:def:crs:EPSG::{}", code) },
            }),
        );
    }
    root.insert("features".to_string(), Value::Array(features));

    Ok(serde_json::to_string_pretty(&Value::Object(root))?)
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidGeoJson(msg.into())
}

/// Collect property keys in first-seen order, typed by the first
/// non-null value under each key.
fn infer_schema(features: &[Value]) -> Schema {
    let mut names: Vec<String> = Vec::new();
    let mut types: Vec<Option<FieldType>> = Vec::new();

    for feature in features {
        let Some(properties) = feature.get("properties").and_then(Value::as_object) else {
            continue;
        };
        for (key, value) in properties {
            let pos = match names.iter().position(|n| n == key) {
                Some(pos) => pos,
                None => {
                    names.push(key.clone());
                    types.push(None);
                    names.len() - 1
                }
            };
            if types[pos].is_none() {
                types[pos] = infer_type(value);
            }
        }
    }

    names
        .into_iter()
        .zip(types)
        .map(|(name, ty)| Field::new(name, ty.unwrap_or(FieldType::String)))
        .collect()
}

fn infer_type(value: &Value) -> Option<FieldType> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(FieldType::Bool),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Some(FieldType::Int)
            } else {
                Some(FieldType::Float)
            }
        }
        Value::String(_) => Some(FieldType::String),
        // Nested arrays/objects are carried as their JSON text
        _ => Some(FieldType::String),
    }
}

fn parse_point_geometry(geometry: Option<&Value>) -> Result<Option<Point<f64>>> {
    let geometry = match geometry {
        None | Some(Value::Null) => return Ok(None),
        Some(g) => g
            .as_object()
            .ok_or_else(|| invalid("geometry is not an object"))?,
    };

    match geometry.get("type").and_then(Value::as_str) {
        Some("Point") => {}
        Some(other) => {
            return Err(Error::WrongGeometryType {
                expected: "Point",
                found: other.to_string(),
            })
        }
        None => return Err(invalid("geometry has no type")),
    }

    let coords = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("point has no coordinates"))?;
    if coords.len() < 2 {
        return Err(invalid("point coordinates need at least x and y"));
    }
    let x = coords[0]
        .as_f64()
        .ok_or_else(|| invalid("x coordinate is not a number"))?;
    let y = coords[1]
        .as_f64()
        .ok_or_else(|| invalid("y coordinate is not a number"))?;

    Ok(Some(Point::new(x, y)))
}

fn parse_crs(root: &Map<String, Value>) -> Crs {
    root.get("crs")
        .and_then(|crs| crs.get("properties"))
        .and_then(|props| props.get("name"))
        .and_then(Value::as_str)
        .and_then(Crs::from_authid)
        .unwrap_or_default()
}

fn json_to_attribute(value: &Value, ty: FieldType) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => {
            if ty == FieldType::Int {
                if let Some(i) = n.as_i64() {
                    return AttributeValue::Int(i);
                }
            }
            AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN))
        }
        Value::String(s) => AttributeValue::String(s.clone()),
        other => AttributeValue::String(other.to_string()),
    }
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Int(i) => Value::Number((*i).into()),
        // Non-finite floats have no JSON representation
        AttributeValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        AttributeValue::String(s) => Value::String(s.clone()),
    }
}
