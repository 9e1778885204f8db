//! Fill configuration.
//!
//! `FillConfig` is the serializable form of a [`Filler`]'s policy. It can be
//! written in YAML:
//!
//! ```yaml
//! min_size: 2
//! max_size: 5
//! alphabet: base64
//! never_absent: true
//! seed: 42
//! ```
//!
//! Every key is optional; missing keys take the default configuration
//! (sizes in `[0, 16)`, printable characters, absence allowed, no depth
//! limit, entropy-seeded source).

use crate::error::{ConfigError, FillError};
use crate::filler::Filler;
use crate::source::seeded;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

/// Default exclusive upper bound for generated sizes.
pub const DEFAULT_MAX_SIZE: usize = 16;

/// Printable ASCII, space through tilde.
pub const PRINTABLE: &str =
    " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// The base64 alphabet.
pub const BASE64: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Characters strings are built from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Alphabet {
    /// Raw bytes: each character is a code point in `[0, 256)`.
    ///
    /// String lengths count characters, and code points from U+0080 up
    /// take two UTF-8 bytes, so `String::len` can reach twice `max_size`.
    Bytes,
    /// Printable ASCII
    #[default]
    Printable,
    /// Base64 characters
    Base64,
    /// Caller-supplied characters
    Chars(String),
}

impl Alphabet {
    /// Characters to choose from. Empty means raw bytes.
    pub fn chars(&self) -> Vec<char> {
        match self {
            Alphabet::Bytes => Vec::new(),
            Alphabet::Printable => PRINTABLE.chars().collect(),
            Alphabet::Base64 => BASE64.chars().collect(),
            Alphabet::Chars(chars) => chars.chars().collect(),
        }
    }

    /// Parse a preset name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bytes" => Some(Alphabet::Bytes),
            "printable" => Some(Alphabet::Printable),
            "base64" => Some(Alphabet::Base64),
            _ => None,
        }
    }
}

impl std::str::FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alphabet::from_name(s).ok_or_else(|| {
            format!("unknown alphabet '{s}' (expected bytes, printable or base64)")
        })
    }
}

// Presets serialize as their name, custom alphabets as {chars: "..."}.

impl Serialize for Alphabet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Alphabet::Bytes => serializer.serialize_str("bytes"),
            Alphabet::Printable => serializer.serialize_str("printable"),
            Alphabet::Base64 => serializer.serialize_str("base64"),
            Alphabet::Chars(chars) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("chars", chars)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Alphabet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct AlphabetVisitor;

        impl<'de> Visitor<'de> for AlphabetVisitor {
            type Value = Alphabet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an alphabet name or a map with a `chars` key")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Alphabet::from_name(value)
                    .ok_or_else(|| E::custom(format!("unknown alphabet: {value}")))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut chars: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "chars" {
                        chars = Some(map.next_value()?);
                    } else {
                        return Err(M::Error::unknown_field(&key, &["chars"]));
                    }
                }
                let chars = chars.ok_or_else(|| M::Error::missing_field("chars"))?;
                Ok(Alphabet::Chars(chars))
            }
        }

        deserializer.deserialize_any(AlphabetVisitor)
    }
}

/// Serializable fill policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Inclusive lower bound for sizes and string lengths
    pub min_size: usize,

    /// Exclusive upper bound for sizes and string lengths
    pub max_size: usize,

    /// Characters strings are drawn from
    pub alphabet: Alphabet,

    /// Never leave optional references, sequences, maps or channels absent
    pub never_absent: bool,

    /// Nesting depth past which variable-size values are left absent
    pub max_depth: Option<usize>,

    /// Seed for a reproducible source; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
            alphabet: Alphabet::default(),
            never_absent: false,
            max_depth: None,
            seed: None,
        }
    }
}

impl FillConfig {
    /// Load a configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: FillConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the size bounds.
    pub fn validate(&self) -> Result<(), FillError> {
        validate_bounds(self.min_size, self.max_size)
    }

    /// Build a filler from this configuration.
    ///
    /// Uses a source seeded with `seed` when set, otherwise one seeded
    /// from the operating system.
    pub fn filler(&self) -> Result<Filler<StdRng>, FillError> {
        self.validate()?;
        let source = match self.seed {
            Some(seed) => seeded(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(self.filler_with(source))
    }

    /// Build a filler from this configuration around an explicit source.
    ///
    /// The `seed` setting is ignored.
    pub fn filler_with<R>(&self, source: R) -> Filler<R> {
        Filler::new(source)
            .with_sizes(self.min_size, self.max_size)
            .with_alphabet(self.alphabet.chars())
            .with_never_absent(self.never_absent)
            .with_max_depth(self.max_depth)
    }
}

pub(crate) fn validate_bounds(min_size: usize, max_size: usize) -> Result<(), FillError> {
    if min_size > max_size {
        return Err(FillError::InvalidArgument(format!(
            "min_size ({min_size}) must not exceed max_size ({max_size})"
        )));
    }
    Ok(())
}
