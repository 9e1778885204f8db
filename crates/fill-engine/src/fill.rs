//! The `Fill` trait and its implementations for std types.
//!
//! Each implementation is the generation rule for one type category.
//! Records implement `Fill` through [`fill_record!`](crate::fill_record),
//! which lists the settable members in declaration order. Types the
//! engine must leave alone use [`fill_opaque!`](crate::fill_opaque).

use crate::error::FillError;
use crate::filler::Filler;
use crate::source::RandomSource;
use fill_core::{Chan, Complex};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

/// A type the engine can populate in place.
pub trait Fill {
    /// Overwrite every settable part of `self` with generated content.
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError>;
}

/// Implement [`Fill`] for a record by filling the listed members in order.
///
/// Members left out of the list are not settable: they keep whatever value
/// they held before the fill. Tuple structs list positions (`0, 1`).
///
/// ```rust
/// use fill_engine::{fill_record, Filler};
///
/// #[derive(Default)]
/// struct Account {
///     id: u64,
///     owner: String,
///     audit_log: Vec<String>,
/// }
///
/// // `audit_log` is never touched.
/// fill_record!(Account { id, owner });
///
/// let mut account = Account::default();
/// fill_engine::random_with(&mut account, &mut Filler::seeded(1)).unwrap();
/// assert!(account.audit_log.is_empty());
/// ```
#[macro_export]
macro_rules! fill_record {
    ($ty:ident $(<$($g:ident),+>)? { $($field:tt),* $(,)? }) => {
        impl $(<$($g: $crate::Fill),+>)? $crate::Fill for $ty $(<$($g),+>)? {
            fn fill<R: $crate::RandomSource>(
                &mut self,
                #[allow(unused_variables)] filler: &mut $crate::Filler<R>,
            ) -> ::std::result::Result<(), $crate::FillError> {
                $( $crate::Fill::fill(&mut self.$field, filler)?; )*
                Ok(())
            }
        }
    };
}

/// Implement [`Fill`] as a no-op.
///
/// For tagged unions and other types with no generic generation rule;
/// callers pre-populate them before filling.
#[macro_export]
macro_rules! fill_opaque {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Fill for $ty {
                fn fill<R: $crate::RandomSource>(
                    &mut self,
                    _filler: &mut $crate::Filler<R>,
                ) -> ::std::result::Result<(), $crate::FillError> {
                    Ok(())
                }
            }
        )+
    };
}

impl Fill for bool {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        *self = filler.bool();
        Ok(())
    }
}

// Integers take the low bits of a full-width draw, which is uniform over
// the narrower type.
macro_rules! fill_int {
    ($draw:ident => $($ty:ty),+) => {
        $(
            impl Fill for $ty {
                fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
                    *self = filler.$draw() as $ty;
                    Ok(())
                }
            }
        )+
    };
}

fill_int!(int64 => i8, i16, i32, i64, isize);
fill_int!(uint64 => u8, u16, u32, u64, usize);

impl Fill for u128 {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        let high = filler.uint64() as u128;
        let low = filler.uint64() as u128;
        *self = (high << 64) | low;
        Ok(())
    }
}

impl Fill for i128 {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        let mut bits = 0u128;
        bits.fill(filler)?;
        *self = bits as i128;
        Ok(())
    }
}

impl Fill for f64 {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        *self = filler.float64();
        Ok(())
    }
}

impl Fill for f32 {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        *self = filler.float32();
        Ok(())
    }
}

impl Fill for Complex<f64> {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        self.re = filler.float64();
        self.im = filler.float64();
        Ok(())
    }
}

impl Fill for Complex<f32> {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        self.re = filler.float32();
        self.im = filler.float32();
        Ok(())
    }
}

impl Fill for char {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        *self = filler.char();
        Ok(())
    }
}

impl Fill for String {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        *self = filler.string();
        Ok(())
    }
}

impl<T: Fill, const N: usize> Fill for [T; N] {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        for item in self.iter_mut() {
            item.fill(filler)?;
        }
        Ok(())
    }
}

/// Generate a fresh `T` from its zero value.
pub(crate) fn fresh<T: Fill + Default, R: RandomSource>(
    filler: &mut Filler<R>,
) -> Result<T, FillError> {
    let mut value = T::default();
    value.fill(filler)?;
    Ok(value)
}

// A `Vec` has no absent state distinct from empty, so the absent outcome
// of the size policy leaves it empty.
impl<T: Fill + Default> Fill for Vec<T> {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        self.clear();
        let Some(n) = filler.size() else {
            return Ok(());
        };
        self.reserve(n);
        filler.nested(|filler| {
            for _ in 0..n {
                self.push(fresh(filler)?);
            }
            Ok(())
        })
    }
}

impl<T: Fill + Default> Fill for VecDeque<T> {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        self.clear();
        let Some(n) = filler.size() else {
            return Ok(());
        };
        filler.nested(|filler| {
            for _ in 0..n {
                self.push_back(fresh(filler)?);
            }
            Ok(())
        })
    }
}

impl<K, V, S> Fill for HashMap<K, V, S>
where
    K: Fill + Default + Eq + Hash,
    V: Fill + Default,
    S: BuildHasher,
{
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        self.clear();
        let Some(n) = filler.size() else {
            return Ok(());
        };
        self.reserve(n);
        filler.nested(|filler| {
            for _ in 0..n {
                let key: K = fresh(filler)?;
                let value: V = fresh(filler)?;
                self.insert(key, value);
            }
            Ok(())
        })
    }
}

impl<K, V> Fill for BTreeMap<K, V>
where
    K: Fill + Default + Ord,
    V: Fill + Default,
{
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        self.clear();
        let Some(n) = filler.size() else {
            return Ok(());
        };
        filler.nested(|filler| {
            for _ in 0..n {
                let key: K = fresh(filler)?;
                let value: V = fresh(filler)?;
                self.insert(key, value);
            }
            Ok(())
        })
    }
}

impl<T, S> Fill for HashSet<T, S>
where
    T: Fill + Default + Eq + Hash,
    S: BuildHasher,
{
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        self.clear();
        let Some(n) = filler.size() else {
            return Ok(());
        };
        filler.nested(|filler| {
            for _ in 0..n {
                self.insert(fresh(filler)?);
            }
            Ok(())
        })
    }
}

impl<T: Fill + Default + Ord> Fill for BTreeSet<T> {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        self.clear();
        let Some(n) = filler.size() else {
            return Ok(());
        };
        filler.nested(|filler| {
            for _ in 0..n {
                self.insert(fresh(filler)?);
            }
            Ok(())
        })
    }
}

impl<T: Fill + Default> Fill for Option<T> {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        if filler.size().is_none() {
            *self = None;
            return Ok(());
        }
        let target = self.get_or_insert_with(T::default);
        filler.nested(|filler| target.fill(filler))
    }
}

impl<T: Fill + ?Sized> Fill for Box<T> {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        (**self).fill(filler)
    }
}

// The capacity is offset by one from the drawn size so that unbuffered
// channels are reachable when absence is allowed.
impl<T> Fill for Chan<T> {
    fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
        *self = match filler.size() {
            Some(n) => Chan::with_capacity(n.saturating_sub(1)),
            None => Chan::absent(),
        };
        Ok(())
    }
}

impl<T: ?Sized> Fill for PhantomData<T> {
    fn fill<R: RandomSource>(&mut self, _filler: &mut Filler<R>) -> Result<(), FillError> {
        Ok(())
    }
}

// Dynamic slots: a boxed `dyn Any` goes through the `Box` rule and stops here.
fill_opaque!((), dyn Any, dyn Any + Send, dyn Any + Send + Sync);

// Callables cannot be generated; function pointers are left as they are.
macro_rules! fill_fn_pointer {
    ($($arg:ident),*) => {
        impl<Ret, $($arg),*> Fill for fn($($arg),*) -> Ret {
            fn fill<R: RandomSource>(&mut self, _filler: &mut Filler<R>) -> Result<(), FillError> {
                Ok(())
            }
        }
    };
}

fill_fn_pointer!();
fill_fn_pointer!(A);
fill_fn_pointer!(A, B);
fill_fn_pointer!(A, B, C);
fill_fn_pointer!(A, B, C, D);

macro_rules! fill_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Fill),+> Fill for ($($name,)+) {
            fn fill<R: RandomSource>(&mut self, filler: &mut Filler<R>) -> Result<(), FillError> {
                $( self.$idx.fill(filler)?; )+
                Ok(())
            }
        }
    };
}

fill_tuple!(A: 0);
fill_tuple!(A: 0, B: 1);
fill_tuple!(A: 0, B: 1, C: 2);
fill_tuple!(A: 0, B: 1, C: 2, D: 3);
fill_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
fill_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
fill_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
fill_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
