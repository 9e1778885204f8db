//! Error types for the filler engine.

use thiserror::Error;

/// Errors that abort a fill operation.
///
/// Both kinds indicate a programming error on the caller's side: a bad
/// argument or configuration, or a type the engine cannot synthesize.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillError {
    /// The target or configuration is not usable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Traversal reached a type category the engine cannot generate.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
}

/// Errors that can occur while loading a fill configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration parsed but is not usable.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] FillError),
}
