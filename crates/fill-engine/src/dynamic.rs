//! Filling reflected values.
//!
//! A [`Value`] carries its own shape, so the engine can walk it without
//! any compile-time knowledge of the type. Entry points in this module
//! take the root as a reference value (`Value::Ref`), mirroring the rule
//! that the engine only ever fills through a reference to the target.

use crate::error::FillError;
use crate::fill::Fill;
use crate::filler::Filler;
use crate::source::RandomSource;
use fill_core::{Complex, Value};
use tracing::{debug, trace};

/// Zero-fill the value behind a reference.
pub fn zero(target: &mut Value) -> Result<(), FillError> {
    random_with(target, &mut Filler::zero())
}

/// Randomly fill the value behind a reference with the default policy.
pub fn random(target: &mut Value) -> Result<(), FillError> {
    random_with(target, &mut Filler::thread_local())
}

/// Fill the value behind a reference with an explicit filler.
///
/// Fails with [`FillError::InvalidArgument`] if `target` is not a present
/// reference or the filler's bounds are invalid, and with
/// [`FillError::UnsupportedType`] if traversal reaches a category that
/// cannot be generated. Nothing is retried on failure.
pub fn random_with<R: RandomSource>(
    target: &mut Value,
    filler: &mut Filler<R>,
) -> Result<(), FillError> {
    filler.validate()?;
    let inner = match target {
        Value::Ref {
            target: Some(inner),
            ..
        } => inner,
        Value::Ref { target: None, .. } => {
            return Err(FillError::InvalidArgument(
                "value to fill must not be an absent reference".to_string(),
            ));
        }
        other => {
            return Err(FillError::InvalidArgument(format!(
                "value to fill must be a reference, got {}",
                other.kind()
            )));
        }
    };
    debug!(
        kind = %inner.kind(),
        min_size = filler.min_size(),
        max_size = filler.max_size(),
        never_absent = filler.never_absent(),
        "Filling reflected value"
    );
    inner.fill(filler)
}

impl Fill for Value {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        trace!(kind = %self.kind(), "fill");
        match self {
            Value::Bool(b) => b.fill(filler),
            Value::Int8(i) => i.fill(filler),
            Value::Int16(i) => i.fill(filler),
            Value::Int32(i) => i.fill(filler),
            Value::Int64(i) => i.fill(filler),
            Value::Uint8(u) => u.fill(filler),
            Value::Uint16(u) => u.fill(filler),
            Value::Uint32(u) => u.fill(filler),
            Value::Uint64(u) => u.fill(filler),
            Value::Float32(x) => x.fill(filler),
            Value::Float64(x) => x.fill(filler),
            Value::Complex64(c) => {
                *c = Complex::new(filler.float32(), filler.float32());
                Ok(())
            }
            Value::Complex128(c) => {
                *c = Complex::new(filler.float64(), filler.float64());
                Ok(())
            }
            Value::String(s) => s.fill(filler),
            Value::Array { items, .. } => {
                for item in items.iter_mut() {
                    item.fill(filler)?;
                }
                Ok(())
            }
            Value::Seq { element, items } => {
                let Some(n) = filler.size() else {
                    *items = None;
                    return Ok(());
                };
                let generated = filler.nested(|filler| {
                    let mut generated = Vec::with_capacity(n);
                    for _ in 0..n {
                        let mut item = element.zero_value();
                        item.fill(filler)?;
                        generated.push(item);
                    }
                    Ok(generated)
                })?;
                *items = Some(generated);
                Ok(())
            }
            Value::Map { .. } => fill_map(self, filler),
            Value::Ref { element, target } => {
                if filler.size().is_none() {
                    *target = None;
                    return Ok(());
                }
                let target = target.get_or_insert_with(|| Box::new(element.zero_value()));
                filler.nested(|filler| target.fill(filler))
            }
            Value::Chan { handle, .. } => handle.fill(filler),
            // Dynamic slots and callables have no generic generation rule.
            Value::Dynamic(_) | Value::Func(_) => Ok(()),
            Value::Record { fields, .. } => {
                for field in fields.iter_mut().filter(|f| f.settable) {
                    field.value.fill(filler)?;
                }
                Ok(())
            }
            Value::RawPointer(_) | Value::Foreign { .. } => {
                Err(FillError::UnsupportedType(unsupported_name(self)))
            }
        }
    }
}

fn fill_map<R: RandomSource>(map: &mut Value, filler: &mut Filler<R>) -> Result<(), FillError> {
    let Value::Map {
        key,
        value,
        entries,
    } = map
    else {
        return Ok(());
    };
    let Some(n) = filler.size() else {
        *entries = None;
        return Ok(());
    };
    let (key, value) = (key.clone(), value.clone());
    *entries = Some(Vec::with_capacity(n));
    filler.nested(|filler| {
        for _ in 0..n {
            let mut k = key.zero_value();
            k.fill(filler)?;
            let mut v = value.zero_value();
            v.fill(filler)?;
            map.insert(k, v);
        }
        Ok(())
    })
}

fn unsupported_name(value: &Value) -> String {
    match value {
        Value::Foreign { name } => format!("foreign({name})"),
        other => other.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fill_core::{Chan, Field, FieldShape, Shape};

    fn person_shape() -> Shape {
        Shape::record(
            "Person",
            vec![
                FieldShape::new("a", Shape::Int64),
                FieldShape::new("b", Shape::String),
                FieldShape::new("c", Shape::optional(Shape::Int64)),
            ],
        )
    }

    #[test]
    fn test_non_reference_rejected() {
        for mut value in [
            Value::Int32(1),
            Value::String("x".into()),
            person_shape().zero_value(),
            Shape::seq(Shape::Bool).zero_value(),
        ] {
            assert!(matches!(
                zero(&mut value),
                Err(FillError::InvalidArgument(_))
            ));
            assert!(matches!(
                random(&mut value),
                Err(FillError::InvalidArgument(_))
            ));
            assert!(matches!(
                random_with(&mut value, &mut Filler::seeded(1)),
                Err(FillError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_absent_reference_rejected() {
        let mut value = Shape::optional(Shape::Int8).zero_value();
        let err = zero(&mut value).unwrap_err();
        assert!(err.to_string().contains("absent reference"));
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut value = Value::reference(Value::Int8(0));
        let mut filler = Filler::seeded(1).with_sizes(9, 3);
        assert!(matches!(
            random_with(&mut value, &mut filler),
            Err(FillError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_scenario() {
        let mut value = Value::reference(person_shape().zero_value());
        zero(&mut value).unwrap();

        let person = value.pointee().unwrap();
        assert_eq!(person.field("a"), Some(&Value::Int64(0)));
        assert_eq!(person.field("b"), Some(&Value::String(String::new())));
        assert_eq!(
            person.field("c").and_then(Value::pointee),
            Some(&Value::Int64(0))
        );
    }

    #[test]
    fn test_unsupported_nested_type() {
        let shape = Shape::record(
            "Conn",
            vec![
                FieldShape::new("id", Shape::Uint32),
                FieldShape::new("socket", Shape::Foreign { name: "Socket".into() }),
            ],
        );
        let mut value = Value::reference(shape.zero_value());
        let err = random_with(&mut value, &mut Filler::seeded(1)).unwrap_err();
        assert_eq!(err, FillError::UnsupportedType("foreign(Socket)".into()));

        let mut value = Value::reference(Value::RawPointer(0));
        let err = zero(&mut value).unwrap_err();
        assert_eq!(err, FillError::UnsupportedType("raw_pointer".into()));
    }

    #[test]
    fn test_unsupported_type_behind_unsettable_member_is_skipped() {
        let shape = Shape::record(
            "Conn",
            vec![
                FieldShape::new("id", Shape::Uint32),
                FieldShape::unsettable("socket", Shape::Foreign { name: "Socket".into() }),
            ],
        );
        let mut value = Value::reference(shape.zero_value());
        assert!(zero(&mut value).is_ok());
    }

    #[test]
    fn test_dynamic_and_func_untouched() {
        let record = Value::Record {
            name: "Handler".into(),
            fields: vec![
                Field::new("slot", Value::Dynamic(Some(Box::new(Value::Int8(3))))),
                Field::new("callback", Value::Func(Some("on_event".into()))),
                Field::new("empty", Value::Dynamic(None)),
            ],
        };
        let mut value = Value::reference(record.clone());
        random_with(&mut value, &mut Filler::seeded(4).with_never_absent(true)).unwrap();
        assert_eq!(value.pointee(), Some(&record));
    }

    #[test]
    fn test_unsettable_field_keeps_value() {
        let mut value = Value::reference(Value::Record {
            name: "Secret".into(),
            fields: vec![
                Field::new("public", Value::Int32(1)),
                Field::unsettable("private", Value::Int32(99)),
            ],
        });
        random_with(&mut value, &mut Filler::seeded(12)).unwrap();
        let record = value.pointee().unwrap();
        assert_eq!(record.field("private"), Some(&Value::Int32(99)));
    }

    #[test]
    fn test_seq_and_map_sizes() {
        let mut filler = Filler::seeded(33).with_sizes(2, 5).with_never_absent(true);
        for _ in 0..200 {
            let mut seq = Value::reference(Shape::seq(Shape::Uint8).zero_value());
            random_with(&mut seq, &mut filler).unwrap();
            let n = seq.pointee().unwrap().element_count().unwrap();
            assert!((2..5).contains(&n));

            let mut map = Value::reference(Shape::map(Shape::Uint64, Shape::Bool).zero_value());
            random_with(&mut map, &mut filler).unwrap();
            let n = map.pointee().unwrap().element_count().unwrap();
            assert!((2..5).contains(&n));
        }
    }

    #[test]
    fn test_map_key_collisions_overwrite() {
        let mut filler = Filler::seeded(2).with_sizes(10, 11).with_never_absent(true);
        let mut map = Value::reference(Shape::map(Shape::Bool, Shape::Int8).zero_value());
        random_with(&mut map, &mut filler).unwrap();
        let n = map.pointee().unwrap().element_count().unwrap();
        assert!((1..=2).contains(&n));
    }

    #[test]
    fn test_absent_outcome_resets_existing_contents() {
        let mut seq = Value::reference(Value::Seq {
            element: Shape::Int8,
            items: Some(vec![Value::Int8(1)]),
        });
        random_with(&mut seq, &mut Filler::seeded(1).with_sizes(0, 1)).unwrap();
        assert!(seq.pointee().unwrap().is_absent());
    }

    #[test]
    fn test_chan_created_with_capacity() {
        let mut value = Value::reference(Value::Chan {
            element: Shape::String,
            handle: Chan::absent(),
        });
        zero(&mut value).unwrap();
        let Some(Value::Chan { handle, .. }) = value.pointee() else {
            panic!("Expected chan value");
        };
        assert_eq!(handle.capacity(), Some(0));
    }

    #[test]
    fn test_array_length_fixed() {
        let mut value = Value::reference(Shape::array(Shape::Float64, 3).zero_value());
        random_with(&mut value, &mut Filler::seeded(8)).unwrap();
        let Some(Value::Array { items, .. }) = value.pointee() else {
            panic!("Expected array value");
        };
        assert_eq!(items.len(), 3);
        for item in items {
            let x = item.as_f64().unwrap();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_depth_limit_bounds_recursion() {
        // A chain of references ten levels deep, filled with a limit of three.
        let mut shape = Shape::Int8;
        for _ in 0..10 {
            shape = Shape::optional(shape);
        }
        let mut value = Value::reference(shape.zero_value());
        let mut filler = Filler::zero().with_max_depth(Some(3));
        random_with(&mut value, &mut filler).unwrap();

        let mut depth = 0;
        let mut current = value.pointee().unwrap();
        while let Some(next) = current.pointee() {
            depth += 1;
            current = next;
        }
        assert_eq!(depth, 3);
    }
}
