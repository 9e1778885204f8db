//! Reflected values.
//!
//! `Value` is a value whose structure is only known at runtime. Every
//! composite variant carries the shapes of its members so that fresh
//! elements can be allocated while the value is being populated.

use crate::shape::{FieldShape, Kind, Shape};
use crate::{Chan, Complex};
use std::fmt;

/// A dynamically shaped value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    String(String),

    /// Fixed-size array
    Array { element: Shape, items: Vec<Value> },

    /// Sequence; `None` is the absent sequence, distinct from an empty one
    Seq {
        element: Shape,
        items: Option<Vec<Value>>,
    },

    /// Map stored as ordered entries; `None` is the absent map
    Map {
        key: Shape,
        value: Shape,
        entries: Option<Vec<(Value, Value)>>,
    },

    /// Optional owning reference
    Ref {
        element: Shape,
        target: Option<Box<Value>>,
    },

    /// Channel handle
    Chan { element: Shape, handle: Chan<Value> },

    /// Slot holding a value of any shape, if any
    Dynamic(Option<Box<Value>>),

    /// Callable, identified by name when bound
    Func(Option<String>),

    /// Aggregate record
    Record { name: String, fields: Vec<Field> },

    RawPointer(usize),

    Foreign { name: String },
}

/// A record member together with its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub settable: bool,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            settable: true,
            value,
        }
    }

    pub fn unsettable(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            settable: false,
            value,
        }
    }
}

impl Value {
    /// Wrap `value` in a present reference.
    ///
    /// This is the form the dynamic entry points expect at the root.
    pub fn reference(value: Value) -> Self {
        Value::Ref {
            element: value.shape(),
            target: Some(Box::new(value)),
        }
    }

    /// Category of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int8(_) => Kind::Int8,
            Value::Int16(_) => Kind::Int16,
            Value::Int32(_) => Kind::Int32,
            Value::Int64(_) => Kind::Int64,
            Value::Uint8(_) => Kind::Uint8,
            Value::Uint16(_) => Kind::Uint16,
            Value::Uint32(_) => Kind::Uint32,
            Value::Uint64(_) => Kind::Uint64,
            Value::Float32(_) => Kind::Float32,
            Value::Float64(_) => Kind::Float64,
            Value::Complex64(_) => Kind::Complex64,
            Value::Complex128(_) => Kind::Complex128,
            Value::String(_) => Kind::String,
            Value::Array { .. } => Kind::Array,
            Value::Seq { .. } => Kind::Seq,
            Value::Map { .. } => Kind::Map,
            Value::Ref { .. } => Kind::Optional,
            Value::Chan { .. } => Kind::Chan,
            Value::Dynamic(_) => Kind::Dynamic,
            Value::Func(_) => Kind::Func,
            Value::Record { .. } => Kind::Record,
            Value::RawPointer(_) => Kind::RawPointer,
            Value::Foreign { .. } => Kind::Foreign,
        }
    }

    /// Reconstruct the shape this value was built from.
    pub fn shape(&self) -> Shape {
        match self {
            Value::Array { element, items } => Shape::array(element.clone(), items.len()),
            Value::Seq { element, .. } => Shape::seq(element.clone()),
            Value::Map { key, value, .. } => Shape::map(key.clone(), value.clone()),
            Value::Ref { element, .. } => Shape::optional(element.clone()),
            Value::Chan { element, .. } => Shape::chan(element.clone()),
            Value::Record { name, fields } => Shape::record(
                name.clone(),
                fields
                    .iter()
                    .map(|f| FieldShape {
                        name: f.name.clone(),
                        shape: f.value.shape(),
                        settable: f.settable,
                    })
                    .collect(),
            ),
            Value::Foreign { name } => Shape::Foreign { name: name.clone() },
            Value::Bool(_) => Shape::Bool,
            Value::Int8(_) => Shape::Int8,
            Value::Int16(_) => Shape::Int16,
            Value::Int32(_) => Shape::Int32,
            Value::Int64(_) => Shape::Int64,
            Value::Uint8(_) => Shape::Uint8,
            Value::Uint16(_) => Shape::Uint16,
            Value::Uint32(_) => Shape::Uint32,
            Value::Uint64(_) => Shape::Uint64,
            Value::Float32(_) => Shape::Float32,
            Value::Float64(_) => Shape::Float64,
            Value::Complex64(_) => Shape::Complex64,
            Value::Complex128(_) => Shape::Complex128,
            Value::String(_) => Shape::String,
            Value::Dynamic(_) => Shape::Dynamic,
            Value::Func(_) => Shape::Func,
            Value::RawPointer(_) => Shape::RawPointer,
        }
    }

    /// Whether this value is in the absent state.
    ///
    /// Only sequences, maps, references, channels, dynamic slots and
    /// callables have an absent state.
    pub fn is_absent(&self) -> bool {
        match self {
            Value::Seq { items, .. } => items.is_none(),
            Value::Map { entries, .. } => entries.is_none(),
            Value::Ref { target, .. } => target.is_none(),
            Value::Chan { handle, .. } => handle.is_absent(),
            Value::Dynamic(inner) => inner.is_none(),
            Value::Func(name) => name.is_none(),
            _ => false,
        }
    }

    /// Number of elements of a string, array, sequence or map.
    ///
    /// Strings count characters. Absent sequences and maps have length 0.
    pub fn element_count(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array { items, .. } => Some(items.len()),
            Value::Seq { items, .. } => Some(items.as_ref().map_or(0, Vec::len)),
            Value::Map { entries, .. } => Some(entries.as_ref().map_or(0, Vec::len)),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64, widening smaller signed integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(i) => Some(*i as i64),
            Value::Int16(i) => Some(*i as i64),
            Value::Int32(i) => Some(*i as i64),
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a u64, widening smaller unsigned integers.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint8(u) => Some(*u as u64),
            Value::Uint16(u) => Some(*u as u64),
            Value::Uint32(u) => Some(*u as u64),
            Value::Uint64(u) => Some(*u),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(f) => Some(*f as f64),
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Referenced value of a present reference.
    pub fn pointee(&self) -> Option<&Value> {
        match self {
            Value::Ref { target, .. } => target.as_deref(),
            _ => None,
        }
    }

    /// Look up a record member by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record { fields, .. } => fields.iter().find(|f| f.name == name).map(|f| &f.value),
            _ => None,
        }
    }

    /// Look up a record member by name for modification.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Value::Record { fields, .. } => fields
                .iter_mut()
                .find(|f| f.name == name)
                .map(|f| &mut f.value),
            _ => None,
        }
    }

    /// Look up the value stored under `key` in a map.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Map {
                entries: Some(entries),
                ..
            } => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Insert an entry into a map, replacing the value of an equal key.
    ///
    /// An absent map becomes present. Returns the replaced value, if any.
    /// Calling this on a non-map value does nothing and returns `None`.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let Value::Map { entries, .. } = self else {
            return None;
        };
        let entries = entries.get_or_insert_with(Vec::new);
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int8(i) => write!(f, "{i}"),
            Value::Int16(i) => write!(f, "{i}"),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Uint8(u) => write!(f, "{u}"),
            Value::Uint16(u) => write!(f, "{u}"),
            Value::Uint32(u) => write!(f, "{u}"),
            Value::Uint64(u) => write!(f, "{u}"),
            Value::Float32(x) => write!(f, "{x}"),
            Value::Float64(x) => write!(f, "{x}"),
            Value::Complex64(c) => write!(f, "{c}"),
            Value::Complex128(c) => write!(f, "{c}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array { items, .. } => write_items(f, items),
            Value::Seq { items: None, .. } => f.write_str("nil"),
            Value::Seq {
                items: Some(items), ..
            } => write_items(f, items),
            Value::Map { entries: None, .. } => f.write_str("nil"),
            Value::Map {
                entries: Some(entries),
                ..
            } => {
                f.write_str("map[")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
            Value::Ref { target: None, .. } => f.write_str("nil"),
            Value::Ref {
                target: Some(target),
                ..
            } => write!(f, "&{target}"),
            Value::Chan { handle, .. } => match handle.capacity() {
                Some(capacity) => write!(f, "chan(cap={capacity})"),
                None => f.write_str("nil"),
            },
            Value::Dynamic(None) | Value::Func(None) => f.write_str("nil"),
            Value::Dynamic(Some(inner)) => write!(f, "{inner}"),
            Value::Func(Some(name)) => write!(f, "func {name}"),
            Value::Record { name, fields } => {
                write!(f, "{name}{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.value)?;
                }
                f.write_str("}")
            }
            Value::RawPointer(addr) => write!(f, "{addr:#x}"),
            Value::Foreign { name } => write!(f, "<{name}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Value {
        Value::Record {
            name: "User".to_string(),
            fields: vec![
                Field::new("id", Value::Int64(7)),
                Field::new("name", Value::String("ann".to_string())),
                Field::unsettable("secret", Value::Bool(true)),
            ],
        }
    }

    #[test]
    fn test_reference_wraps_shape() {
        let value = Value::reference(Value::Uint16(3));
        assert_eq!(value.shape(), Shape::optional(Shape::Uint16));
        assert_eq!(value.pointee(), Some(&Value::Uint16(3)));
        assert_eq!(value.kind(), Kind::Optional);
    }

    #[test]
    fn test_shape_of_record_matches_zero_value() {
        let record = sample_record();
        let shape = record.shape();
        let zero = shape.zero_value();
        assert_eq!(zero.shape(), shape);
        assert_eq!(zero.field("id"), Some(&Value::Int64(0)));
    }

    #[test]
    fn test_field_lookup() {
        let mut record = sample_record();
        assert_eq!(record.field("name").and_then(Value::as_str), Some("ann"));
        *record.field_mut("id").unwrap() = Value::Int64(9);
        assert_eq!(record.field("id").and_then(Value::as_i64), Some(9));
        assert!(record.field("missing").is_none());
        assert!(Value::Bool(true).field("id").is_none());
    }

    #[test]
    fn test_map_insert_overwrites_equal_keys() {
        let mut map = Shape::map(Shape::String, Shape::Int32).zero_value();
        assert!(map.is_absent());

        assert_eq!(map.insert(Value::String("a".into()), Value::Int32(1)), None);
        assert_eq!(map.insert(Value::String("b".into()), Value::Int32(2)), None);
        assert_eq!(
            map.insert(Value::String("a".into()), Value::Int32(3)),
            Some(Value::Int32(1))
        );

        assert!(!map.is_absent());
        assert_eq!(map.element_count(), Some(2));
        assert_eq!(map.get(&Value::String("a".into())), Some(&Value::Int32(3)));
    }

    #[test]
    fn test_len_counts_chars() {
        assert_eq!(Value::String("héllo".into()).element_count(), Some(5));
        assert_eq!(Shape::seq(Shape::Bool).zero_value().element_count(), Some(0));
        assert_eq!(Value::Bool(false).element_count(), None);
    }

    #[test]
    fn test_accessors_widen() {
        assert_eq!(Value::Int8(-3).as_i64(), Some(-3));
        assert_eq!(Value::Uint32(5).as_u64(), Some(5));
        assert_eq!(Value::Float32(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Int8(1).as_u64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample_record().to_string(), r#"User{id: 7, name: "ann", secret: true}"#);

        let seq = Value::Seq {
            element: Shape::Uint8,
            items: Some(vec![Value::Uint8(1), Value::Uint8(2)]),
        };
        assert_eq!(seq.to_string(), "[1 2]");
        assert_eq!(Shape::seq(Shape::Uint8).zero_value().to_string(), "nil");

        let reference = Value::reference(Value::Int32(4));
        assert_eq!(reference.to_string(), "&4");

        let chan = Value::Chan {
            element: Shape::Bool,
            handle: Chan::with_capacity(2),
        };
        assert_eq!(chan.to_string(), "chan(cap=2)");

        let mut map = Shape::map(Shape::Int8, Shape::Bool).zero_value();
        map.insert(Value::Int8(1), Value::Bool(true));
        assert_eq!(map.to_string(), "map[1:true]");
    }
}
