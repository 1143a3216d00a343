//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed path expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path expression is empty")]
    Empty,

    #[error("empty key segment at position {pos} in \"{path}\"")]
    EmptySegment { path: String, pos: usize },

    #[error("unclosed '[' at position {pos} in \"{path}\"")]
    UnclosedBracket { path: String, pos: usize },

    #[error("invalid index \"{index}\" in \"{path}\"")]
    InvalidIndex { path: String, index: String },

    #[error("unexpected character '{found}' at position {pos} in \"{path}\"")]
    Unexpected { path: String, pos: usize, found: char },
}

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse configuration document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("configuration document root must be a mapping, found {0}")]
    InvalidRoot(&'static str),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("configuration keys must be scalars, found {0}")]
    InvalidKey(&'static str),

    #[error("failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("cannot write \"{path}\": parent of \"{key}\" is not a mapping")]
    NotAMapping { path: String, key: String },

    #[error("cannot write \"{path}\": a sequence is required before index {index}")]
    NotASequence { path: String, index: usize },

    #[error("cannot write \"{path}\": index {index} is out of range")]
    IndexOutOfRange { path: String, index: usize },

    #[error("invalid config option \"{0}\": must be of the form key=value")]
    InvalidOverride(String),

    #[error("invalid address for {key}: \"{value}\"")]
    InvalidAddress { key: String, value: String },

    #[error("invalid value for {key}: \"{value}\" (expected {expected})")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}
