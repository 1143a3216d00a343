//! In-memory configuration tree nodes.

use serde_yaml::Value;

use super::error::ConfigError;

/// A node of the configuration tree.
///
/// Children are owned by their parent; the tree has no sharing and no cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigNode {
    /// A key declared without a value.
    Null,
    /// A leaf value, stored as text and coerced on read.
    Scalar(String),
    /// An ordered list of nodes.
    Sequence(Vec<ConfigNode>),
    /// Unique keys mapped to nodes, in declaration order.
    Mapping(Mapping),
}

/// Insertion-ordered mapping with unique keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, ConfigNode)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace the node stored under `key`.
    ///
    /// Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, node: ConfigNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((key, node)),
        }
    }

    /// Get the node under `key`, appending the result of `f` if it is missing.
    pub fn get_or_insert_with(
        &mut self,
        key: &str,
        f: impl FnOnce() -> ConfigNode,
    ) -> &mut ConfigNode {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_owned(), f()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl ConfigNode {
    /// Scalar text of this node, if it is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigNode]> {
        match self {
            ConfigNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ConfigNode::Null => "null",
            ConfigNode::Scalar(_) => "scalar",
            ConfigNode::Sequence(_) => "sequence",
            ConfigNode::Mapping(_) => "mapping",
        }
    }

    /// Convert a parsed YAML value into a tree node.
    pub(crate) fn from_yaml(value: Value) -> Result<Self, ConfigError> {
        Ok(match value {
            Value::Null => ConfigNode::Null,
            Value::Bool(b) => ConfigNode::Scalar(b.to_string()),
            Value::Number(n) => ConfigNode::Scalar(n.to_string()),
            Value::String(s) => ConfigNode::Scalar(s),
            Value::Sequence(items) => ConfigNode::Sequence(
                items
                    .into_iter()
                    .map(ConfigNode::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Mapping(entries) => {
                let mut map = Mapping::new();
                for (k, v) in entries {
                    let key = match ConfigNode::from_yaml(k)? {
                        ConfigNode::Scalar(key) => key,
                        ConfigNode::Null => "~".to_owned(),
                        other => return Err(ConfigError::InvalidKey(other.kind())),
                    };
                    map.insert(key, ConfigNode::from_yaml(v)?);
                }
                ConfigNode::Mapping(map)
            }
            Value::Tagged(tagged) => ConfigNode::from_yaml(tagged.value)?,
        })
    }

    /// Convert this node back into a YAML value for write-back.
    pub(crate) fn to_yaml(&self) -> Value {
        match self {
            ConfigNode::Null => Value::Null,
            ConfigNode::Scalar(s) => Value::String(s.clone()),
            ConfigNode::Sequence(items) => {
                Value::Sequence(items.iter().map(ConfigNode::to_yaml).collect())
            }
            ConfigNode::Mapping(map) => Value::Mapping(
                map.iter()
                    .map(|(k, v)| (Value::String(k.to_owned()), v.to_yaml()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(doc: &str) -> ConfigNode {
        ConfigNode::from_yaml(serde_yaml::from_str(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_scalars_are_stored_as_text() {
        let node = parse("id: 1\nflag: true\nratio: 1.5\nname: 'x'\n");
        let map = node.as_mapping().unwrap();
        assert_eq!(map.get("id").and_then(ConfigNode::as_scalar), Some("1"));
        assert_eq!(map.get("flag").and_then(ConfigNode::as_scalar), Some("true"));
        assert_eq!(map.get("ratio").and_then(ConfigNode::as_scalar), Some("1.5"));
        assert_eq!(map.get("name").and_then(ConfigNode::as_scalar), Some("x"));
    }

    #[test]
    fn test_mapping_preserves_declaration_order() {
        let node = parse("b: 1\na: 2\nc: 3\n");
        let keys: Vec<&str> = node.as_mapping().unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_empty_value_is_null() {
        let node = parse("webserver:\n");
        assert_eq!(node.as_mapping().unwrap().get("webserver"), Some(&ConfigNode::Null));
    }

    #[test]
    fn test_non_string_keys_use_scalar_text() {
        let node = parse("8080: http\ntrue: yes\n");
        let map = node.as_mapping().unwrap();
        assert!(map.get("8080").is_some());
        assert!(map.get("true").is_some());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = Mapping::new();
        map.insert("a", ConfigNode::Scalar("1".into()));
        map.insert("b", ConfigNode::Scalar("2".into()));
        map.insert("a", ConfigNode::Scalar("3".into()));
        assert_eq!(map.len(), 2);
        let first = map.iter().next().unwrap();
        assert_eq!(first, ("a", &ConfigNode::Scalar("3".into())));
    }

    #[test]
    fn test_yaml_write_back_keeps_structure() {
        let node = parse("a:\n  b: [x, y]\n  c: ~\n");
        let text = serde_yaml::to_string(&node.to_yaml()).unwrap();
        assert_eq!(parse(&text), node);
    }
}
