//! fill-fixtures
//!
//! Populates values with zero or random data for use as test fixtures.
//! The engine lives in `fill_engine`; this crate adds the command-line
//! surface that loads a shape from YAML and prints filled instances.
//!
//! # CLI Usage
//!
//! ```bash
//! # Three random users, reproducible
//! fill-fixtures --shape user.yaml --count 3 --seed 42
//!
//! # Zero value of a shape
//! fill-fixtures --shape user.yaml --zero
//!
//! # Policy from a file, overridden on the command line
//! fill-fixtures --shape user.yaml --config fill.yaml --max-size 4 --never-absent
//! ```
//!
//! A shape file describes one type:
//!
//! ```yaml
//! type: record
//! name: User
//! fields:
//!   - name: id
//!     type: u64
//!   - name: email
//!     type: string
//!   - name: manager
//!     type:
//!       type: optional
//!       element: u64
//! ```

use anyhow::Context;
use clap::Parser;
use fill_engine::{dynamic, Alphabet, FillConfig, Filler};
use std::path::PathBuf;
use tracing::info;

pub use fill_core::{Shape, Value};
pub use fill_engine as engine;

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// YAML file describing the type to fill
    #[arg(long, value_name = "PATH", env = "FILL_SHAPE")]
    pub shape: PathBuf,

    /// YAML fill configuration; flags below override its settings
    #[arg(long, value_name = "PATH", env = "FILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of values to generate
    #[arg(long, default_value = "1", env = "FILL_COUNT")]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long, env = "FILL_SEED")]
    pub seed: Option<u64>,

    /// Inclusive lower bound for sizes and string lengths
    #[arg(long, env = "FILL_MIN_SIZE")]
    pub min_size: Option<usize>,

    /// Exclusive upper bound for sizes and string lengths
    #[arg(long, env = "FILL_MAX_SIZE")]
    pub max_size: Option<usize>,

    /// Character set for strings (printable, base64 or bytes)
    #[arg(long, env = "FILL_ALPHABET")]
    pub alphabet: Option<Alphabet>,

    /// Never leave optional values, sequences, maps or channels absent
    #[arg(long, env = "FILL_NEVER_ABSENT")]
    pub never_absent: bool,

    /// Nesting depth past which variable-size values are left absent
    #[arg(long, env = "FILL_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Produce zero values instead of random ones
    #[arg(long)]
    pub zero: bool,

    /// Print the effective fill configuration as YAML instead of values
    #[arg(long)]
    pub print_config: bool,
}

impl GenerateArgs {
    /// Effective configuration: the config file (or defaults) with
    /// command-line overrides applied.
    pub fn fill_config(&self) -> anyhow::Result<FillConfig> {
        let mut config = match &self.config {
            Some(path) => FillConfig::from_file(path)
                .with_context(|| format!("Failed to load fill config from {path:?}"))?,
            None => FillConfig::default(),
        };

        if let Some(min_size) = self.min_size {
            config.min_size = min_size;
        }
        if let Some(max_size) = self.max_size {
            config.max_size = max_size;
        }
        if let Some(alphabet) = &self.alphabet {
            config.alphabet = alphabet.clone();
        }
        if self.never_absent {
            config.never_absent = true;
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config
            .validate()
            .context("Invalid fill configuration")?;
        Ok(config)
    }
}

/// Load the shape and fill `count` instances of it.
pub fn generate(args: &GenerateArgs) -> anyhow::Result<Vec<Value>> {
    let shape = Shape::from_file(&args.shape)
        .with_context(|| format!("Failed to load shape from {:?}", args.shape))?;
    let config = args.fill_config()?;

    let values = if args.zero {
        let mut filler = Filler::zero().with_max_depth(config.max_depth);
        fill_many(&shape, args.count, &mut filler)?
    } else {
        let mut filler = config.filler()?;
        fill_many(&shape, args.count, &mut filler)?
    };

    info!(
        count = values.len(),
        kind = %shape.kind(),
        zero = args.zero,
        "Generated values"
    );
    Ok(values)
}

fn fill_many<R: fill_engine::RandomSource>(
    shape: &Shape,
    count: usize,
    filler: &mut Filler<R>,
) -> anyhow::Result<Vec<Value>> {
    let mut values = Vec::with_capacity(count);
    for index in 0..count {
        let mut root = Value::reference(shape.zero_value());
        dynamic::random_with(&mut root, filler)
            .with_context(|| format!("Failed to fill value {index}"))?;
        if let Some(value) = root.pointee() {
            values.push(value.clone());
        }
    }
    Ok(values)
}
