//! Crate-level error type.

use thiserror::Error;

use crate::analyzer::kubeschema::{ConfigError, ParseError, SchemaError};

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum KubeSchemaError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No schema files were given on the command line or in the config.
    #[error("no schema paths configured - pass --schemas or set schemaPaths in the config file")]
    NoSchemas,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, KubeSchemaError>;
