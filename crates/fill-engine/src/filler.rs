//! The filler: generation policy plus its random source.

use crate::config::{validate_bounds, PRINTABLE, DEFAULT_MAX_SIZE};
use crate::error::FillError;
use crate::source::{seeded, RandomSource, ZeroSource};
use rand::rngs::{StdRng, ThreadRng};

/// Generation policy and the random source it draws from.
///
/// A filler is configured once and reused across fills. It is borrowed
/// mutably for the whole of a fill, so a single source is never shared
/// between concurrent traversals.
#[derive(Debug, Clone)]
pub struct Filler<R> {
    /// Inclusive lower bound for sizes and string lengths
    min_size: usize,
    /// Exclusive upper bound for sizes and string lengths
    max_size: usize,
    /// Characters strings are drawn from; empty means raw bytes
    alphabet: Vec<char>,
    /// Never choose the absent state
    never_absent: bool,
    /// Nesting depth past which variable-size values are left absent
    max_depth: Option<usize>,
    /// Current nesting depth during a fill
    depth: usize,
    source: R,
}

impl<R> Filler<R> {
    /// Create a filler with the default policy: sizes in `[0, 16)`,
    /// printable characters, absence allowed.
    pub fn new(source: R) -> Self {
        Self {
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
            alphabet: PRINTABLE.chars().collect(),
            never_absent: false,
            max_depth: None,
            depth: 0,
            source,
        }
    }

    /// Set the size bounds `[min_size, max_size)`.
    ///
    /// Bounds are checked when a fill starts.
    pub fn with_sizes(mut self, min_size: usize, max_size: usize) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Set the characters strings are drawn from. Empty means raw bytes.
    ///
    /// String lengths are counted in characters, not UTF-8 bytes.
    pub fn with_alphabet(mut self, alphabet: impl IntoIterator<Item = char>) -> Self {
        self.alphabet = alphabet.into_iter().collect();
        self
    }

    pub fn with_never_absent(mut self, never_absent: bool) -> Self {
        self.never_absent = never_absent;
        self
    }

    /// Limit the nesting depth of optional and variable-size values.
    ///
    /// Past the limit those values are left absent (or empty), even when
    /// absence is otherwise suppressed. This bounds self-referential types.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn never_absent(&self) -> bool {
        self.never_absent
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Check the configuration before a fill.
    pub fn validate(&self) -> Result<(), FillError> {
        validate_bounds(self.min_size, self.max_size)
    }
}

impl Filler<ZeroSource> {
    /// Filler for zero-valued data.
    ///
    /// Every draw is zero and absence is suppressed: scalars become zero,
    /// strings, sequences and maps become present but empty, references
    /// are allocated, and channels are created unbuffered. Set a depth
    /// limit before filling a self-referential type.
    pub fn zero() -> Self {
        Filler::new(ZeroSource).with_never_absent(true)
    }
}

impl Filler<ThreadRng> {
    /// Filler with the default policy drawing from the thread-local generator.
    pub fn thread_local() -> Self {
        Filler::new(rand::rng())
    }
}

impl Filler<StdRng> {
    /// Filler with the default policy and a reproducible source.
    pub fn seeded(seed: u64) -> Self {
        Filler::new(seeded(seed))
    }
}

impl<R: RandomSource> Filler<R> {
    /// Apply the size/nilness policy.
    ///
    /// Draws `n` in `[0, max_size - min_size)`. Returns `None` (absent) when
    /// `n` is 0 and absence is allowed, or when the depth limit is reached;
    /// otherwise the size is `min_size + n`.
    pub fn size(&mut self) -> Option<usize> {
        if self.max_depth.is_some_and(|max| self.depth >= max) {
            return None;
        }
        let n = self.source.int_n(self.max_size.saturating_sub(self.min_size));
        if n == 0 && !self.never_absent {
            return None;
        }
        Some(self.min_size + n)
    }

    /// Draw a string length in `[min_size, max_size)`.
    pub fn string_len(&mut self) -> usize {
        self.min_size + self.source.int_n(self.max_size.saturating_sub(self.min_size))
    }

    /// Draw one string character.
    ///
    /// With an empty alphabet this is a raw byte, mapped to the character
    /// with that code point.
    pub fn char(&mut self) -> char {
        if self.alphabet.is_empty() {
            char::from(self.source.int_n(256) as u8)
        } else {
            self.alphabet[self.source.int_n(self.alphabet.len())]
        }
    }

    /// Draw a string under the length and alphabet policy.
    pub fn string(&mut self) -> String {
        let len = self.string_len();
        (0..len).map(|_| self.char()).collect()
    }

    pub fn bool(&mut self) -> bool {
        self.source.int_n(2) == 1
    }

    pub fn int64(&mut self) -> i64 {
        self.source.int64()
    }

    pub fn uint64(&mut self) -> u64 {
        self.source.uint64()
    }

    pub fn float64(&mut self) -> f64 {
        self.source.float64()
    }

    pub fn float32(&mut self) -> f32 {
        self.source.float32()
    }

    /// Run `f` one nesting level deeper.
    pub fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, FillError>,
    ) -> Result<T, FillError> {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
