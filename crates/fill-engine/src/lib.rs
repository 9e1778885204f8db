//! Recursive value population for test fixtures.
//!
//! This crate walks a value's structure and overwrites every settable part
//! of it with generated content: zero values, or random values under a
//! size, nilness and alphabet policy.
//!
//! # Architecture
//!
//! ```text
//!   FillConfig (YAML)          Filler<R: RandomSource>
//!          │                   ┌───────────────────────┐
//!          └──── filler() ───▶ │ min/max size          │
//!                              │ alphabet              │
//!                              │ never_absent          │
//!                              │ max_depth             │
//!                              │ source (Rng / Zero)   │
//!                              └──────────┬────────────┘
//!                                         │
//!                     ┌───────────────────┴───────────────────┐
//!                     ▼                                       ▼
//!            T: Fill (static types)                 fill_core::Value
//!            zero / random / random_with            dynamic::zero / random / random_with
//! ```
//!
//! # Example
//!
//! ```rust
//! use fill_engine::{fill_record, Filler};
//!
//! #[derive(Default)]
//! struct Order {
//!     id: u64,
//!     items: Vec<String>,
//!     note: Option<String>,
//! }
//!
//! fill_record!(Order { id, items, note });
//!
//! let mut order = Order::default();
//! fill_engine::zero(&mut order).unwrap();
//! assert_eq!(order.id, 0);
//! assert_eq!(order.note.as_deref(), Some(""));
//!
//! let mut filler = Filler::seeded(42).with_sizes(1, 4).with_never_absent(true);
//! fill_engine::random_with(&mut order, &mut filler).unwrap();
//! assert!((1..4).contains(&order.items.len()));
//! ```
//!
//! # Generation rules
//!
//! - Scalars take one draw each; booleans are a fair coin, floats lie in `[0, 1)`
//! - Strings draw a length in `[min_size, max_size)` and characters from the alphabet
//! - Sequences, maps, sets, optional references and channels apply the size
//!   policy: a zero draw leaves them absent unless absence is suppressed
//! - Fixed arrays and records recurse into every element or settable member
//! - Function pointers, dynamic slots and opaque types are left untouched

pub mod config;
pub mod dynamic;
pub mod error;
pub mod fill;
pub mod filler;
pub mod source;

// Re-exports for convenience
pub use config::{Alphabet, FillConfig, BASE64, DEFAULT_MAX_SIZE, PRINTABLE};
pub use error::{ConfigError, FillError};
pub use fill::Fill;
pub use filler::Filler;
pub use source::{seeded, RandomSource, ZeroSource};

pub use fill_core::{Chan, Complex, Shape, Value};

use tracing::debug;

/// Overwrite every settable part of `target` with its zero value.
///
/// Composites come out present and empty; optional references are
/// allocated and zero-filled. That allocation never stops on a
/// self-referential type such as `Option<Box<Node>>`: fill those with
/// [`random_with`] and `Filler::zero().with_max_depth(Some(n))`.
pub fn zero<T: Fill + ?Sized>(target: &mut T) -> Result<(), FillError> {
    random_with(target, &mut Filler::zero())
}

/// Randomly fill `target` with the default policy and the thread-local
/// generator.
///
/// The default policy has no depth limit. Recursive types terminate only
/// when the size policy happens to draw an absent link; use
/// [`random_with`] and [`Filler::with_max_depth`] to bound them.
pub fn random<T: Fill + ?Sized>(target: &mut T) -> Result<(), FillError> {
    random_with(target, &mut Filler::thread_local())
}

/// Randomly fill `target` under `filler`'s policy.
///
/// Fails with [`FillError::InvalidArgument`] if the filler's size bounds
/// are inverted. A failed fill may leave `target` partially populated.
pub fn random_with<T: Fill + ?Sized, R: RandomSource>(
    target: &mut T,
    filler: &mut Filler<R>,
) -> Result<(), FillError> {
    filler.validate()?;
    debug!(
        type_name = std::any::type_name::<T>(),
        min_size = filler.min_size(),
        max_size = filler.max_size(),
        never_absent = filler.never_absent(),
        max_depth = ?filler.max_depth(),
        "Filling value"
    );
    target.fill(filler)
}

/// Build a fresh `T` and fill it.
pub fn generate<T: Fill + Default, R: RandomSource>(filler: &mut Filler<R>) -> Result<T, FillError> {
    let mut value = T::default();
    random_with(&mut value, filler)?;
    Ok(value)
}
