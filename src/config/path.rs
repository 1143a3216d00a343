//! Path expressions addressing nodes of the configuration tree.
//!
//! Syntax: `segment(.segment)*`, where a segment is a mapping key followed by
//! zero or more `[index]` suffixes (`webserver.listen_address`,
//! `rules[2]`, `matrix[1][0]`). Steps are applied strictly left to right.

use super::error::{ConfigError, PathError};
use super::node::{ConfigNode, Mapping};

/// One step of a parsed path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step<'a> {
    /// Look up a key in a mapping.
    Key(&'a str),
    /// Take the 0-based element of a sequence.
    Index(usize),
}

/// A parsed path expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathExpr<'a> {
    source: &'a str,
    steps: Vec<Step<'a>>,
}

impl<'a> PathExpr<'a> {
    /// Parse a path expression.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bootconf::config::{PathExpr, Step};
    ///
    /// let expr = PathExpr::parse("base.list[2]").unwrap();
    /// assert_eq!(expr.steps(), &[Step::Key("base"), Step::Key("list"), Step::Index(2)]);
    /// assert!(PathExpr::parse("base..list").is_err());
    /// ```
    pub fn parse(source: &'a str) -> Result<Self, PathError> {
        if source.is_empty() {
            return Err(PathError::Empty);
        }
        let mut steps = Vec::new();
        let mut offset = 0;
        for segment in source.split('.') {
            parse_segment(source, segment, offset, &mut steps)?;
            offset += segment.len() + 1;
        }
        Ok(Self { source, steps })
    }

    pub fn as_str(&self) -> &'a str {
        self.source
    }

    pub fn steps(&self) -> &[Step<'a>] {
        &self.steps
    }

    /// Walk the tree from `root`, returning the addressed node if every step matches.
    pub fn resolve<'t>(&self, root: &'t ConfigNode) -> Option<&'t ConfigNode> {
        self.steps
            .iter()
            .try_fold(root, |node, step| match (node, *step) {
                (ConfigNode::Mapping(map), Step::Key(key)) => map.get(key),
                (ConfigNode::Sequence(items), Step::Index(index)) => items.get(index),
                _ => None,
            })
    }

    /// Walk the tree for writing, creating missing mapping levels on the way.
    ///
    /// Missing keys are inserted as [`ConfigNode::Null`] and `Null` nodes are
    /// turned into mappings when a key step passes through them. Sequence
    /// elements are never created: an index must already exist. A failed
    /// write leaves the tree unchanged.
    pub(crate) fn resolve_for_write<'t>(
        &self,
        root: &'t mut ConfigNode,
    ) -> Result<&'t mut ConfigNode, ConfigError> {
        // Steps after the first unresolved one are created, so they must all be keys.
        let existing = self.existing_prefix_len(root);
        if let Some(Step::Index(index)) = self
            .steps
            .iter()
            .skip(existing + 1)
            .find(|step| matches!(step, Step::Index(_)))
        {
            return Err(self.not_a_sequence(*index));
        }

        let mut node = root;
        for step in &self.steps {
            node = match *step {
                Step::Key(key) => {
                    if matches!(node, ConfigNode::Null) {
                        *node = ConfigNode::Mapping(Mapping::new());
                    }
                    let map = match node {
                        ConfigNode::Mapping(map) => map,
                        _ => return Err(self.not_a_mapping(key)),
                    };
                    map.get_or_insert_with(key, || ConfigNode::Null)
                }
                Step::Index(index) => match node {
                    ConfigNode::Sequence(items) => match items.get_mut(index) {
                        Some(item) => item,
                        None => {
                            return Err(ConfigError::IndexOutOfRange {
                                path: self.source.to_owned(),
                                index,
                            })
                        }
                    },
                    _ => return Err(self.not_a_sequence(index)),
                },
            };
        }
        Ok(node)
    }

    /// Number of leading steps that resolve against `root` as it is.
    fn existing_prefix_len(&self, root: &ConfigNode) -> usize {
        let mut node = root;
        for (i, step) in self.steps.iter().enumerate() {
            let next = match (node, *step) {
                (ConfigNode::Mapping(map), Step::Key(key)) => map.get(key),
                (ConfigNode::Sequence(items), Step::Index(index)) => items.get(index),
                _ => None,
            };
            match next {
                Some(child) => node = child,
                None => return i,
            }
        }
        self.steps.len()
    }

    fn not_a_mapping(&self, key: &str) -> ConfigError {
        ConfigError::NotAMapping {
            path: self.source.to_owned(),
            key: key.to_owned(),
        }
    }

    fn not_a_sequence(&self, index: usize) -> ConfigError {
        ConfigError::NotASequence {
            path: self.source.to_owned(),
            index,
        }
    }
}

fn parse_segment<'a>(
    source: &'a str,
    segment: &'a str,
    offset: usize,
    steps: &mut Vec<Step<'a>>,
) -> Result<(), PathError> {
    let key_end = segment
        .find(|c: char| c == '[' || c == ']')
        .unwrap_or(segment.len());
    if key_end == 0 {
        return Err(PathError::EmptySegment {
            path: source.to_owned(),
            pos: offset,
        });
    }
    steps.push(Step::Key(&segment[..key_end]));

    let mut rest = &segment[key_end..];
    let mut pos = offset + key_end;
    loop {
        match rest.chars().next() {
            None => return Ok(()),
            Some('[') => {
                let body = &rest[1..];
                let close = body.find(']').ok_or_else(|| PathError::UnclosedBracket {
                    path: source.to_owned(),
                    pos,
                })?;
                let digits = &body[..close];
                let index = parse_index(digits).ok_or_else(|| PathError::InvalidIndex {
                    path: source.to_owned(),
                    index: digits.to_owned(),
                })?;
                steps.push(Step::Index(index));
                rest = &body[close + 1..];
                pos += close + 2;
            }
            Some(found) => {
                return Err(PathError::Unexpected {
                    path: source.to_owned(),
                    pos,
                    found,
                })
            }
        }
    }
}

fn parse_index(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(doc: &str) -> ConfigNode {
        ConfigNode::from_yaml(serde_yaml::from_str(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_keys_and_indices() {
        let expr = PathExpr::parse("a.b[0].c[12][3]").unwrap();
        assert_eq!(
            expr.steps(),
            &[
                Step::Key("a"),
                Step::Key("b"),
                Step::Index(0),
                Step::Key("c"),
                Step::Index(12),
                Step::Index(3),
            ]
        );
        assert_eq!(expr.as_str(), "a.b[0].c[12][3]");
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        assert_eq!(PathExpr::parse(""), Err(PathError::Empty));
        assert!(matches!(
            PathExpr::parse("a..b"),
            Err(PathError::EmptySegment { pos: 2, .. })
        ));
        assert!(matches!(
            PathExpr::parse(".a"),
            Err(PathError::EmptySegment { pos: 0, .. })
        ));
        assert!(matches!(
            PathExpr::parse("a."),
            Err(PathError::EmptySegment { .. })
        ));
        assert!(matches!(
            PathExpr::parse("[0]"),
            Err(PathError::EmptySegment { .. })
        ));
        assert!(matches!(
            PathExpr::parse("a[0"),
            Err(PathError::UnclosedBracket { pos: 1, .. })
        ));
        assert!(matches!(
            PathExpr::parse("a[x]"),
            Err(PathError::InvalidIndex { .. })
        ));
        assert!(matches!(
            PathExpr::parse("a[-1]"),
            Err(PathError::InvalidIndex { .. })
        ));
        assert!(matches!(
            PathExpr::parse("a[]"),
            Err(PathError::InvalidIndex { .. })
        ));
        assert!(matches!(
            PathExpr::parse("a[0]b"),
            Err(PathError::Unexpected { found: 'b', pos: 4, .. })
        ));
        assert!(matches!(
            PathExpr::parse("a]"),
            Err(PathError::Unexpected { found: ']', .. })
        ));
    }

    #[test]
    fn test_resolve_walks_mappings_and_sequences() {
        let root = tree("base:\n  list:\n    - elem1\n    - inner: value\n  matrix:\n    - [a, b]\n");
        let get = |p: &str| PathExpr::parse(p).unwrap().resolve(&root).cloned();

        assert_eq!(get("base.list[0]"), Some(ConfigNode::Scalar("elem1".into())));
        assert_eq!(get("base.list[1].inner"), Some(ConfigNode::Scalar("value".into())));
        assert_eq!(get("base.matrix[0][1]"), Some(ConfigNode::Scalar("b".into())));
        assert_eq!(get("base.list[2]"), None);
        assert_eq!(get("base.missing"), None);
        // Key step on a sequence, index step on a mapping.
        assert_eq!(get("base.list.inner"), None);
        assert_eq!(get("base[0]"), None);
    }

    #[test]
    fn test_write_creates_missing_mappings() {
        let mut root = ConfigNode::Mapping(Mapping::new());
        let expr = PathExpr::parse("a.b.c").unwrap();
        *expr.resolve_for_write(&mut root).unwrap() = ConfigNode::Scalar("v".into());
        assert_eq!(expr.resolve(&root), Some(&ConfigNode::Scalar("v".into())));
    }

    #[test]
    fn test_write_through_null_node() {
        let mut root = tree("webserver:\n");
        let expr = PathExpr::parse("webserver.enabled").unwrap();
        *expr.resolve_for_write(&mut root).unwrap() = ConfigNode::Scalar("true".into());
        assert_eq!(expr.resolve(&root), Some(&ConfigNode::Scalar("true".into())));
    }

    #[test]
    fn test_write_never_creates_sequence_elements() {
        let mut root = tree("list: [a]\n");
        let before = root.clone();

        let err = PathExpr::parse("list[1]")
            .unwrap()
            .resolve_for_write(&mut root)
            .unwrap_err();
        assert!(matches!(err, ConfigError::IndexOutOfRange { index: 1, .. }));

        let err = PathExpr::parse("other[0]")
            .unwrap()
            .resolve_for_write(&mut root)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotASequence { index: 0, .. }));
        assert_eq!(root, before);
    }

    #[test]
    fn test_write_existing_sequence_element() {
        let mut root = tree("list: [a, b]\n");
        let expr = PathExpr::parse("list[1]").unwrap();
        *expr.resolve_for_write(&mut root).unwrap() = ConfigNode::Scalar("z".into());
        assert_eq!(expr.resolve(&root), Some(&ConfigNode::Scalar("z".into())));
    }

    #[test]
    fn test_write_through_scalar_fails() {
        let mut root = tree("a: 1\n");
        let err = PathExpr::parse("a.b")
            .unwrap()
            .resolve_for_write(&mut root)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { ref key, .. } if key == "b"));
    }

    #[test]
    fn test_failed_write_leaves_tree_unchanged() {
        let mut root = tree("a: ~
list: [x]
");
        let before = root.clone();
        for path in ["new.sub[0]", "a.b[0]", "a.b.c[1].d", "list[1].x"] {
            assert!(PathExpr::parse(path)
                .unwrap()
                .resolve_for_write(&mut root)
                .is_err());
            assert_eq!(root, before, "path = {path}");
        }
    }
}
