//! Hierarchical configuration with path access and environment variable support.
//!
//! A YAML document is parsed into a [`ConfigTree`] of [`ConfigNode`]s and
//! queried with path expressions such as `webserver.listen_address` or
//! `rules[2]`. String scalars of the form `${NAME}` are replaced with the
//! value of the environment variable `NAME` when read.

mod env;
mod error;
mod node;
mod path;
mod runtime;
mod scalar;
mod tree;

#[cfg(test)]
pub(crate) mod test_env;

pub use env::{expand, expand_with, Expansion};
pub use error::{ConfigError, PathError};
pub use node::{ConfigNode, Mapping};
pub use path::{PathExpr, Step};
pub use runtime::{LogLevel, LoggingConfig, RuntimeConfig, WebserverConfig};
pub use scalar::FromScalar;
pub use tree::ConfigTree;
