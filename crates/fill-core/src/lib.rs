//! Core types for the fill-fixtures engine.
//!
//! This crate is the type-introspection layer the engine walks:
//!
//! - [`Shape`] - Type descriptor covering every category the engine knows
//! - [`Kind`] - The category of a shape or value
//! - [`Value`] - A value whose structure is known only at runtime
//! - [`Chan`] - Optional handle to a bounded channel
//! - [`Complex`] - Complex number with real and imaginary parts
//!
//! # Architecture
//!
//! ```text
//! fill-core (this crate)
//!    │
//!    └─── fill-engine   (populates Rust values and reflected Values)
//!            │
//!            └─── fill-fixtures  (CLI: shape YAML in, filled values out)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fill_core::{FieldShape, Shape, Value};
//!
//! let shape = Shape::record(
//!     "User",
//!     vec![
//!         FieldShape::new("id", Shape::Int64),
//!         FieldShape::new("tags", Shape::seq(Shape::String)),
//!     ],
//! );
//!
//! let user = shape.zero_value();
//! assert_eq!(user.field("id"), Some(&Value::Int64(0)));
//! assert!(user.field("tags").unwrap().is_absent());
//! ```

pub mod chan;
pub mod complex;
pub mod shape;
pub mod value;

// Re-exports for convenience
pub use chan::Chan;
pub use complex::Complex;
pub use shape::{FieldShape, Kind, Shape, ShapeError};
pub use value::{Field, Value};
