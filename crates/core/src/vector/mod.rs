//! Vector data structures
//!
//! Point features carry an ordered attribute row matching the layer
//! schema, the way attribute tables work in desktop GIS. Attribute
//! order is significant and is preserved through processing.

use crate::crs::Crs;
use crate::error::{Error, Result};
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// The field type this value belongs to, or `None` for `Null`.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            AttributeValue::Null => None,
            AttributeValue::Bool(_) => Some(FieldType::Bool),
            AttributeValue::Int(_) => Some(FieldType::Int),
            AttributeValue::Float(_) => Some(FieldType::Float),
            AttributeValue::String(_) => Some(FieldType::String),
        }
    }
}

/// Value type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
}

/// A named, typed field in a layer schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered list of fields describing a layer's attribute row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field. Duplicate names are not rejected; the last
    /// occurrence wins on name lookup, matching common GIS behavior.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Position of the last field with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().rposition(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}

impl FromIterator<Field> for Schema {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A point feature: optional geometry plus an ordered attribute row
#[derive(Debug, Clone, PartialEq)]
pub struct PointFeature {
    /// Feature geometry. `None` models a missing/degenerate geometry;
    /// such features still occupy an output row.
    pub geometry: Option<Point<f64>>,
    /// Attribute values in schema order
    pub attributes: Vec<AttributeValue>,
}

impl PointFeature {
    /// Create a feature with geometry
    pub fn new(geometry: Point<f64>, attributes: Vec<AttributeValue>) -> Self {
        Self {
            geometry: Some(geometry),
            attributes,
        }
    }

    /// Create a feature without geometry
    pub fn without_geometry(attributes: Vec<AttributeValue>) -> Self {
        Self {
            geometry: None,
            attributes,
        }
    }
}

/// An in-memory point layer: schema, CRS and features.
///
/// This is both the "vector point dataset" handed to algorithms and the
/// sink they produce; file formats are adapted to it by the I/O module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointLayer {
    schema: Schema,
    crs: Crs,
    features: Vec<PointFeature>,
}

impl PointLayer {
    pub fn new(schema: Schema, crs: Crs) -> Self {
        Self {
            schema,
            crs,
            features: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Append a feature, checking its attribute row against the schema.
    pub fn push(&mut self, feature: PointFeature) -> Result<()> {
        if feature.attributes.len() != self.schema.len() {
            return Err(Error::SchemaMismatch {
                expected: self.schema.len(),
                found: feature.attributes.len(),
            });
        }
        self.features.push(feature);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[PointFeature] {
        &self.features
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointFeature> {
        self.features.iter()
    }
}

impl IntoIterator for PointLayer {
    type Item = PointFeature;
    type IntoIter = std::vec::IntoIter<PointFeature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
