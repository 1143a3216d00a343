//! The configuration tree and its path-based accessors.

use std::borrow::Cow;
use std::fmt::Display;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::env::expand;
use super::error::ConfigError;
use super::node::{ConfigNode, Mapping};
use super::path::PathExpr;
use super::scalar::FromScalar;

/// A loaded configuration document addressed by path expressions.
///
/// Reads never fail: a missing key, a malformed path, an unresolved
/// `${NAME}` reference or a value of the wrong type all yield the caller's
/// default. Loading and writing report errors.
///
/// The tree does no internal locking; writes must be serialized with reads
/// by the owner.
///
/// # Example
///
/// ```rust
/// use bootconf::ConfigTree;
///
/// let mut conf = ConfigTree::new();
/// conf.load_from_string("webserver:\n  listen_port: 8765\n").unwrap();
///
/// assert_eq!(conf.get_scalar::<u16>("webserver.listen_port", 0), 8765);
/// assert!(!conf.get_scalar("webserver.enabled", false));
///
/// conf.apply_override("webserver.enabled=true").unwrap();
/// assert!(conf.get_scalar("webserver.enabled", false));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigTree {
    root: ConfigNode,
}

impl ConfigTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            root: ConfigNode::Mapping(Mapping::new()),
        }
    }

    /// Replace the whole tree with the parsed `text`.
    ///
    /// On error the previous tree is left untouched.
    pub fn load_from_string(&mut self, text: &str) -> Result<(), ConfigError> {
        let root = if text.trim().is_empty() {
            ConfigNode::Mapping(Mapping::new())
        } else {
            let value: serde_yaml::Value = serde_yaml::from_str(text)?;
            match ConfigNode::from_yaml(value)? {
                ConfigNode::Null => ConfigNode::Mapping(Mapping::new()),
                root @ ConfigNode::Mapping(_) => root,
                other => return Err(ConfigError::InvalidRoot(other.kind())),
            }
        };
        self.root = root;
        info!(keys = self.len(), "configuration loaded");
        Ok(())
    }

    /// Replace the whole tree with the parsed contents of the file at `path`.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading configuration file");
        self.load_from_string(&text)
    }

    /// Discard all loaded state.
    pub fn clear(&mut self) {
        self.root = ConfigNode::Mapping(Mapping::new());
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.root.as_mapping().map_or(0, Mapping::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// Check whether `path` addresses a node.
    pub fn is_defined(&self, path: &str) -> bool {
        self.get_node(path).is_some()
    }

    /// Resolve `path` to a node.
    ///
    /// Malformed paths are logged and treated as absent.
    pub fn get_node(&self, path: &str) -> Option<&ConfigNode> {
        match PathExpr::parse(path) {
            Ok(expr) => expr.resolve(&self.root),
            Err(e) => {
                warn!(error = %e, "ignoring malformed configuration path");
                None
            }
        }
    }

    /// Read the scalar at `path` as `T`, expanding `${NAME}` references.
    ///
    /// Returns `None` if the path is absent, the node is not a scalar, the
    /// reference names an unset variable, or the text does not convert.
    pub fn find_scalar<T: FromScalar>(&self, path: &str) -> Option<T> {
        let raw = self.get_node(path)?.as_scalar()?;
        let value = expand(raw).value()?;
        T::from_scalar(&value)
    }

    /// Read the scalar at `path` as `T`, or `default`.
    pub fn get_scalar<T: FromScalar>(&self, path: &str, default: T) -> T {
        self.find_scalar(path).unwrap_or(default)
    }

    /// Read the list at `path`, expanding each element.
    ///
    /// A scalar is returned as a one-element list and an absent path as an
    /// empty one. Non-scalar elements are skipped and elements referencing
    /// an unset variable keep their stored text.
    pub fn get_sequence(&self, path: &str) -> Vec<String> {
        let items = match self.get_node(path) {
            Some(ConfigNode::Sequence(items)) => items.as_slice(),
            Some(node @ ConfigNode::Scalar(_)) => std::slice::from_ref(node),
            _ => return Vec::new(),
        };
        items
            .iter()
            .filter_map(ConfigNode::as_scalar)
            .map(|raw| expand(raw).value().unwrap_or(Cow::Borrowed(raw)).into_owned())
            .collect()
    }

    /// Write `value` as the scalar at `path`.
    ///
    /// Missing mapping levels are created. Sequence elements must already
    /// exist.
    pub fn set_scalar<T: Display>(&mut self, path: &str, value: T) -> Result<(), ConfigError> {
        let expr = PathExpr::parse(path)?;
        *expr.resolve_for_write(&mut self.root)? = ConfigNode::Scalar(value.to_string());
        Ok(())
    }

    /// Apply a `path=value` override.
    pub fn apply_override(&mut self, option: &str) -> Result<(), ConfigError> {
        let (path, value) = option
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOverride(option.to_owned()))?;
        self.set_scalar(path, value)?;
        debug!(path, "applied configuration override");
        Ok(())
    }

    /// Apply `path=value` overrides in order; later ones win.
    pub fn apply_overrides<I, S>(&mut self, options: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        options
            .into_iter()
            .try_for_each(|option| self.apply_override(option.as_ref()))
    }

    /// Serialize the tree back to a document, without expanding references.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(&self.root.to_yaml()).map_err(ConfigError::Serialize)
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}
