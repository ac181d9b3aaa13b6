//! Error types for loading and building parser definitions.

use argv_core::ArgvError;
use thiserror::Error;

/// Errors that can occur while loading a definition or parsing with it.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The definition is well-formed but cannot describe a parser.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// Declaration or parse failure reported by the engine.
    #[error(transparent)]
    Argv(#[from] ArgvError),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
