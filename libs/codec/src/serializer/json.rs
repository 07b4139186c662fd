//! JSON document serializer
//!
//! Members are written in declaration order and absent optional members are
//! skipped. Blobs are base64, timestamps epoch seconds, and non-finite
//! floats the strings `"NaN"`, `"Infinity"` and `"-Infinity"`. A union value
//! is an object with exactly one key, the active variant.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde_json::{Map, Number, Value as Json};
use types::{Model, PrimitiveKind, Record, Shape, ShapeId, StructureShape, Value};

use super::{PayloadSerializer, SerializationError};

const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct JsonPayloadSerializer {
    content_type: String,
}

impl JsonPayloadSerializer {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
        }
    }

    /// JSON document for `value` as an instance of `shape`
    pub fn to_json(&self, model: &Model, shape: &ShapeId, value: &Value) -> Result<Json, SerializationError> {
        encode(model, shape, value)
    }
}

impl Default for JsonPayloadSerializer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_TYPE)
    }
}

impl PayloadSerializer for JsonPayloadSerializer {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn serialize(&self, model: &Model, shape: &ShapeId, value: &Value) -> Result<Bytes, SerializationError> {
        to_bytes(&encode(model, shape, value)?)
    }

    fn serialize_record(
        &self,
        model: &Model,
        shape: &ShapeId,
        record: &Record,
    ) -> Result<Bytes, SerializationError> {
        let structure = model.expect_structure(shape)?;
        to_bytes(&encode_structure(model, shape, structure, record)?)
    }
}

fn to_bytes(document: &Json) -> Result<Bytes, SerializationError> {
    serde_json::to_vec(document)
        .map(Bytes::from)
        .map_err(|e| SerializationError::Custom(e.to_string()))
}

fn encode(model: &Model, id: &ShapeId, value: &Value) -> Result<Json, SerializationError> {
    let shape = model.expect_shape(id)?;
    match (shape, value) {
        (Shape::Primitive { kind }, value) => encode_primitive(id, *kind, value),
        (Shape::Enum(e), Value::String(s)) => {
            if e.contains(s) {
                Ok(Json::String(s.clone()))
            } else {
                Err(SerializationError::InvalidEnumValue {
                    shape: id.clone(),
                    value: s.clone(),
                })
            }
        }
        (Shape::List(list), Value::List(items)) => items
            .iter()
            .map(|item| encode(model, &list.member, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
        (Shape::Map(map), Value::Map(entries)) => {
            let mut object = Map::new();
            for (key, entry) in entries {
                object.insert(key.clone(), encode(model, &map.value, entry)?);
            }
            Ok(Json::Object(object))
        }
        (Shape::Structure(structure), Value::Record(record)) => {
            encode_structure(model, id, structure, record)
        }
        (Shape::Union(union), Value::Variant { name, value }) => {
            let variant = union
                .variant(name)
                .ok_or_else(|| SerializationError::UnknownVariant {
                    union: id.clone(),
                    variant: name.clone(),
                })?;
            let mut object = Map::new();
            object.insert(name.clone(), encode(model, &variant.target, value)?);
            Ok(Json::Object(object))
        }
        (shape, value) => Err(mismatch(id, shape.kind_name(), value)),
    }
}

fn encode_structure(
    model: &Model,
    id: &ShapeId,
    structure: &StructureShape,
    record: &Record,
) -> Result<Json, SerializationError> {
    let mut object = Map::new();
    for member in structure.members() {
        match record.get(&member.name) {
            Some(value) => {
                object.insert(member.name.clone(), encode(model, &member.target, value)?);
            }
            None if member.optional => {}
            None => {
                return Err(SerializationError::MissingMember {
                    structure: id.clone(),
                    member: member.name.clone(),
                })
            }
        }
    }
    Ok(Json::Object(object))
}

fn encode_primitive(id: &ShapeId, kind: PrimitiveKind, value: &Value) -> Result<Json, SerializationError> {
    let json = match (kind, value) {
        (PrimitiveKind::Boolean, Value::Bool(v)) => Json::Bool(*v),
        (PrimitiveKind::Byte, Value::Byte(v)) => Json::from(*v),
        (PrimitiveKind::Short, Value::Short(v)) => Json::from(*v),
        (PrimitiveKind::Integer, Value::Integer(v)) => Json::from(*v),
        (PrimitiveKind::Long, Value::Long(v)) => Json::from(*v),
        (PrimitiveKind::Float, Value::Float(v)) => float(f64::from(*v)),
        (PrimitiveKind::Double, Value::Double(v)) => float(*v),
        (PrimitiveKind::Blob, Value::Blob(v)) => Json::String(STANDARD.encode(v)),
        (PrimitiveKind::String, Value::String(v)) => Json::String(v.clone()),
        (PrimitiveKind::Timestamp, Value::Timestamp(ts)) => {
            if ts.timestamp_subsec_nanos() == 0 {
                Json::from(ts.timestamp())
            } else {
                float(ts.timestamp() as f64 + f64::from(ts.timestamp_subsec_nanos()) / 1e9)
            }
        }
        (kind, value) => return Err(mismatch(id, kind.name(), value)),
    };
    Ok(json)
}

fn float(v: f64) -> Json {
    match Number::from_f64(v) {
        Some(n) => Json::Number(n),
        None if v.is_nan() => Json::from("NaN"),
        None if v > 0.0 => Json::from("Infinity"),
        None => Json::from("-Infinity"),
    }
}

fn mismatch(id: &ShapeId, expected: &'static str, found: &Value) -> SerializationError {
    SerializationError::TypeMismatch {
        shape: id.clone(),
        expected,
        found: found.kind_name(),
    }
}
