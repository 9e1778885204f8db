//! Type descriptors for reflected values.
//!
//! `Shape` is the static description of a value: its category and, for
//! composites, the shapes of its members. The filler engine walks a shape
//! to know what to generate, and `Shape::zero_value` allocates the fresh
//! instances it fills.
//!
//! # YAML Format
//!
//! Scalar shapes are plain strings:
//! ```yaml
//! type: bool
//! type: i64
//! type: string
//! ```
//!
//! Composite shapes use object format:
//! ```yaml
//! type:
//!   type: seq
//!   element: u8
//! type:
//!   type: record
//!   name: User
//!   fields:
//!     - name: id
//!       type: i64
//!     - name: secret
//!       type: string
//!       settable: false
//! ```

use crate::value::{Field, Value};
use crate::Chan;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Error type for shape loading.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// Error reading shape file
    #[error("Failed to read shape file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Category of a shape or value.
///
/// This is the closed set of categories the engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Array,
    Seq,
    Map,
    Optional,
    Chan,
    Dynamic,
    Func,
    Record,
    RawPointer,
    Foreign,
}

impl Kind {
    /// Name used in YAML and in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int8 => "i8",
            Kind::Int16 => "i16",
            Kind::Int32 => "i32",
            Kind::Int64 => "i64",
            Kind::Uint8 => "u8",
            Kind::Uint16 => "u16",
            Kind::Uint32 => "u32",
            Kind::Uint64 => "u64",
            Kind::Float32 => "f32",
            Kind::Float64 => "f64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Seq => "seq",
            Kind::Map => "map",
            Kind::Optional => "optional",
            Kind::Chan => "chan",
            Kind::Dynamic => "dynamic",
            Kind::Func => "func",
            Kind::Record => "record",
            Kind::RawPointer => "raw_pointer",
            Kind::Foreign => "foreign",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type descriptor of a reflected value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    /// Complex number with `f32` parts
    Complex64,
    /// Complex number with `f64` parts
    Complex128,
    String,

    /// Fixed-size array; the length is part of the type
    Array {
        element: Box<Shape>,
        len: usize,
    },

    /// Dynamically sized sequence
    Seq {
        element: Box<Shape>,
    },

    /// Associative map
    Map {
        key: Box<Shape>,
        value: Box<Shape>,
    },

    /// Optional owning reference
    Optional {
        element: Box<Shape>,
    },

    /// Channel handle carrying `element` values
    Chan {
        element: Box<Shape>,
    },

    /// Slot whose concrete type is only known at runtime
    Dynamic,

    /// Callable
    Func,

    /// Aggregate record
    Record {
        name: String,
        fields: Vec<FieldShape>,
    },

    /// Untyped address. Describable, but never synthesized.
    RawPointer,

    /// A type owned by another runtime. Describable, but never synthesized.
    Foreign {
        name: String,
    },
}

/// A record member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldShape {
    /// Member name
    pub name: String,

    /// Member type
    #[serde(rename = "type")]
    pub shape: Shape,

    /// Whether the engine may overwrite this member
    #[serde(default = "default_settable")]
    pub settable: bool,
}

fn default_settable() -> bool {
    true
}

impl FieldShape {
    /// Create a settable member.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            settable: true,
        }
    }

    /// Create a member the engine must leave alone.
    pub fn unsettable(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            settable: false,
        }
    }
}

impl Shape {
    pub fn array(element: Shape, len: usize) -> Self {
        Shape::Array {
            element: Box::new(element),
            len,
        }
    }

    pub fn seq(element: Shape) -> Self {
        Shape::Seq {
            element: Box::new(element),
        }
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Shape::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn optional(element: Shape) -> Self {
        Shape::Optional {
            element: Box::new(element),
        }
    }

    pub fn chan(element: Shape) -> Self {
        Shape::Chan {
            element: Box::new(element),
        }
    }

    pub fn record(name: impl Into<String>, fields: Vec<FieldShape>) -> Self {
        Shape::Record {
            name: name.into(),
            fields,
        }
    }

    /// Load a shape from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ShapeError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a shape from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ShapeError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Category of this shape.
    pub fn kind(&self) -> Kind {
        match self {
            Shape::Bool => Kind::Bool,
            Shape::Int8 => Kind::Int8,
            Shape::Int16 => Kind::Int16,
            Shape::Int32 => Kind::Int32,
            Shape::Int64 => Kind::Int64,
            Shape::Uint8 => Kind::Uint8,
            Shape::Uint16 => Kind::Uint16,
            Shape::Uint32 => Kind::Uint32,
            Shape::Uint64 => Kind::Uint64,
            Shape::Float32 => Kind::Float32,
            Shape::Float64 => Kind::Float64,
            Shape::Complex64 => Kind::Complex64,
            Shape::Complex128 => Kind::Complex128,
            Shape::String => Kind::String,
            Shape::Array { .. } => Kind::Array,
            Shape::Seq { .. } => Kind::Seq,
            Shape::Map { .. } => Kind::Map,
            Shape::Optional { .. } => Kind::Optional,
            Shape::Chan { .. } => Kind::Chan,
            Shape::Dynamic => Kind::Dynamic,
            Shape::Func => Kind::Func,
            Shape::Record { .. } => Kind::Record,
            Shape::RawPointer => Kind::RawPointer,
            Shape::Foreign { .. } => Kind::Foreign,
        }
    }

    /// Allocate a fresh zero-valued instance of this shape.
    ///
    /// Variable-size and optional categories start out absent; fixed arrays
    /// hold `len` zero elements; record members are zeroed recursively.
    pub fn zero_value(&self) -> Value {
        match self {
            Shape::Bool => Value::Bool(false),
            Shape::Int8 => Value::Int8(0),
            Shape::Int16 => Value::Int16(0),
            Shape::Int32 => Value::Int32(0),
            Shape::Int64 => Value::Int64(0),
            Shape::Uint8 => Value::Uint8(0),
            Shape::Uint16 => Value::Uint16(0),
            Shape::Uint32 => Value::Uint32(0),
            Shape::Uint64 => Value::Uint64(0),
            Shape::Float32 => Value::Float32(0.0),
            Shape::Float64 => Value::Float64(0.0),
            Shape::Complex64 => Value::Complex64(Default::default()),
            Shape::Complex128 => Value::Complex128(Default::default()),
            Shape::String => Value::String(String::new()),
            Shape::Array { element, len } => Value::Array {
                element: element.as_ref().clone(),
                items: (0..*len).map(|_| element.zero_value()).collect(),
            },
            Shape::Seq { element } => Value::Seq {
                element: element.as_ref().clone(),
                items: None,
            },
            Shape::Map { key, value } => Value::Map {
                key: key.as_ref().clone(),
                value: value.as_ref().clone(),
                entries: None,
            },
            Shape::Optional { element } => Value::Ref {
                element: element.as_ref().clone(),
                target: None,
            },
            Shape::Chan { element } => Value::Chan {
                element: element.as_ref().clone(),
                handle: Chan::absent(),
            },
            Shape::Dynamic => Value::Dynamic(None),
            Shape::Func => Value::Func(None),
            Shape::Record { name, fields } => Value::Record {
                name: name.clone(),
                fields: fields
                    .iter()
                    .map(|f| Field {
                        name: f.name.clone(),
                        settable: f.settable,
                        value: f.shape.zero_value(),
                    })
                    .collect(),
            },
            Shape::RawPointer => Value::RawPointer(0),
            Shape::Foreign { name } => Value::Foreign { name: name.clone() },
        }
    }
}

// Shapes serialize as a bare string when they carry no parameters and as a
// map tagged with `type` otherwise.

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Array { element, len } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("element", element)?;
                map.serialize_entry("len", len)?;
                map.end()
            }
            Self::Seq { element } | Self::Optional { element } | Self::Chan { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", self.kind().name())?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Map { key, value } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("key", key)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Self::Record { name, fields } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "record")?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("fields", fields)?;
                map.end()
            }
            Self::Foreign { name } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "foreign")?;
                map.serialize_entry("name", name)?;
                map.end()
            }
            simple => serializer.serialize_str(simple.kind().name()),
        }
    }
}

fn simple_shape(name: &str) -> Option<Shape> {
    let shape = match name {
        "bool" => Shape::Bool,
        "i8" | "int8" => Shape::Int8,
        "i16" | "int16" => Shape::Int16,
        "i32" | "int32" | "int" => Shape::Int32,
        "i64" | "int64" => Shape::Int64,
        "u8" | "uint8" | "byte" => Shape::Uint8,
        "u16" | "uint16" => Shape::Uint16,
        "u32" | "uint32" | "uint" => Shape::Uint32,
        "u64" | "uint64" => Shape::Uint64,
        "f32" | "float32" | "float" => Shape::Float32,
        "f64" | "float64" | "double" => Shape::Float64,
        "complex64" => Shape::Complex64,
        "complex128" => Shape::Complex128,
        "string" | "text" => Shape::String,
        "dynamic" | "any" => Shape::Dynamic,
        "func" => Shape::Func,
        "raw_pointer" => Shape::RawPointer,
        _ => return None,
    };
    Some(shape)
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct ShapeVisitor;

        impl<'de> Visitor<'de> for ShapeVisitor {
            type Value = Shape;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or map representing a Shape")
            }

            // Handle string format: "i64", "string", etc.
            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                simple_shape(value).ok_or_else(|| E::custom(format!("unknown simple type: {value}")))
            }

            // Handle map format: {"type": "seq", "element": "u8"}
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                if let Some(shape) = simple_shape(&type_name) {
                    return Ok(shape);
                }

                match type_name.as_str() {
                    "array" => {
                        let element: Shape = get_field_required(&fields, "element")?;
                        let len = get_field_required(&fields, "len")?;
                        Ok(Shape::array(element, len))
                    }
                    "seq" | "slice" => {
                        let element: Shape = get_field_required(&fields, "element")?;
                        Ok(Shape::seq(element))
                    }
                    "map" => {
                        let key: Shape = get_field_required(&fields, "key")?;
                        let value: Shape = get_field_required(&fields, "value")?;
                        Ok(Shape::map(key, value))
                    }
                    "optional" | "ptr" => {
                        let element: Shape = get_field_required(&fields, "element")?;
                        Ok(Shape::optional(element))
                    }
                    "chan" => {
                        let element: Shape = get_field_required(&fields, "element")?;
                        Ok(Shape::chan(element))
                    }
                    "record" | "struct" => {
                        let name: String = get_field(&fields, "name").unwrap_or_default();
                        let members: Vec<FieldShape> = get_field_required(&fields, "fields")?;
                        Ok(Shape::record(name, members))
                    }
                    "foreign" => {
                        let name = get_field_required(&fields, "name")?;
                        Ok(Shape::Foreign { name })
                    }
                    _ => Err(M::Error::custom(format!("unknown type: {type_name}"))),
                }
            }
        }

        deserializer.deserialize_any(ShapeVisitor)
    }
}

fn get_field<T: for<'de> Deserialize<'de>>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<T> {
    fields
        .get(key)
        .and_then(|v| serde_yaml::from_value(v.clone()).ok())
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_shapes_from_yaml() {
        assert_eq!(Shape::from_yaml("bool").unwrap(), Shape::Bool);
        assert_eq!(Shape::from_yaml("i64").unwrap(), Shape::Int64);
        assert_eq!(Shape::from_yaml("int").unwrap(), Shape::Int32);
        assert_eq!(Shape::from_yaml("string").unwrap(), Shape::String);
        assert_eq!(Shape::from_yaml("raw_pointer").unwrap(), Shape::RawPointer);
    }

    #[test]
    fn test_record_shape_from_yaml() {
        let yaml = r#"
type: record
name: User
fields:
  - name: id
    type: i64
  - name: tags
    type:
      type: seq
      element: string
  - name: manager
    type:
      type: optional
      element: i32
  - name: secret
    type: string
    settable: false
"#;
        let shape = Shape::from_yaml(yaml).unwrap();
        let Shape::Record { name, fields } = shape else {
            panic!("Expected record shape");
        };
        assert_eq!(name, "User");
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], FieldShape::new("id", Shape::Int64));
        assert_eq!(fields[1].shape, Shape::seq(Shape::String));
        assert_eq!(fields[2].shape, Shape::optional(Shape::Int32));
        assert!(!fields[3].settable);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = Shape::from_yaml("quaternion").unwrap_err();
        assert!(err.to_string().contains("unknown simple type"));

        let err = Shape::from_yaml("type: tree\nelement: i8").unwrap_err();
        assert!(err.to_string().contains("unknown type: tree"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = Shape::from_yaml("type: array\nelement: u8").unwrap_err();
        assert!(err.to_string().contains("len"));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let shape = Shape::record(
            "Pair",
            vec![
                FieldShape::new("grid", Shape::array(Shape::Uint8, 3)),
                FieldShape::new("index", Shape::map(Shape::String, Shape::Float64)),
                FieldShape::unsettable("events", Shape::chan(Shape::Bool)),
                FieldShape::new("handle", Shape::Foreign { name: "Socket".into() }),
            ],
        );
        let yaml = serde_yaml::to_string(&shape).unwrap();
        assert_eq!(Shape::from_yaml(&yaml).unwrap(), shape);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "type: seq\nelement: complex128").unwrap();
        let shape = Shape::from_file(file.path()).unwrap();
        assert_eq!(shape, Shape::seq(Shape::Complex128));
    }

    #[test]
    fn test_zero_value_starts_absent() {
        let shape = Shape::record(
            "T",
            vec![
                FieldShape::new("a", Shape::array(Shape::Int16, 2)),
                FieldShape::new("s", Shape::seq(Shape::Int8)),
                FieldShape::new("p", Shape::optional(Shape::Bool)),
            ],
        );
        let Value::Record { fields, .. } = shape.zero_value() else {
            panic!("Expected record value");
        };
        assert_eq!(
            fields[0].value,
            Value::Array {
                element: Shape::Int16,
                items: vec![Value::Int16(0), Value::Int16(0)],
            }
        );
        assert!(fields[1].value.is_absent());
        assert!(fields[2].value.is_absent());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Kind::RawPointer.to_string(), "raw_pointer");
        assert_eq!(Shape::chan(Shape::Bool).kind().to_string(), "chan");
    }
}
