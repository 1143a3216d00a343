//! Bootconf - Hierarchical configuration for bootstrapping a runtime.
//!
//! This crate provides the configuration layer a server reads at startup:
//!
//! - **config**: YAML-backed configuration tree with path expressions
//!   (`a.b.c[2]`), typed accessors with defaults, `${NAME}` environment
//!   interpolation and `path=value` command-line overrides
//! - **net**: Syntactic IPv4/IPv6 validation for bind addresses
//! - **bootstrap**: Tracing initialization from the loaded settings
//!
//! # Features
//!
//! - `config` - Configuration tree and runtime settings (enabled by default)
//! - `bootstrap` - Tracing setup (enabled by default)
//! - `net` - Address validation (enabled by `config`)
//! - `full` - All features
//!
//! # Example
//!
//! ```rust,ignore
//! use bootconf::{init_tracing, RuntimeConfig};
//!
//! fn main() -> Result<(), bootconf::ConfigError> {
//!     let overrides: Vec<String> = std::env::args().skip(1).collect();
//!     let config = RuntimeConfig::from_file("/etc/myserver/config.yaml", &overrides)?;
//!     init_tracing(&config.logging).ok();
//!
//!     let listener = std::net::TcpListener::bind(config.webserver.socket_addr());
//!     // ...
//!     Ok(())
//! }
//! ```

#[cfg(feature = "net")]
pub mod net;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "bootstrap")]
pub mod bootstrap;

// Re-exports for convenience
#[cfg(feature = "net")]
pub use net::is_valid_ip;

#[cfg(feature = "config")]
pub use config::{ConfigError, ConfigNode, ConfigTree, RuntimeConfig};

#[cfg(feature = "bootstrap")]
pub use bootstrap::init_tracing;
