//! Environment variable references inside string scalars.
//!
//! Expansion happens at read time and only looks at the scalar as a whole:
//!
//! | Stored text   | Result                                   |
//! |---------------|------------------------------------------|
//! | `${NAME}`     | value of `NAME`, or unresolved if unset  |
//! | `$${NAME}`    | `${NAME}` (one `$` stripped)             |
//! | `$${NAME`     | unchanged (unbalanced)                   |
//! | `$NAME`       | unchanged                                |
//! | `$$NAME`      | unchanged                                |
//! | ` ${NAME}`    | unchanged                                |
//! | `${A}${B}`    | unchanged (braces inside the name)       |
//! | `$${A} x`     | unchanged                                |
//!
//! Substituted values are not expanded again.

use std::borrow::Cow;

/// Outcome of expanding a scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expansion<'a> {
    /// Text to hand to the caller, borrowed when nothing was rewritten.
    Value(Cow<'a, str>),
    /// The scalar is a `${NAME}` reference to a variable that is not set.
    Unresolved(&'a str),
}

impl<'a> Expansion<'a> {
    /// Expanded text, or `None` when the reference could not be resolved.
    pub fn value(self) -> Option<Cow<'a, str>> {
        match self {
            Expansion::Value(v) => Some(v),
            Expansion::Unresolved(_) => None,
        }
    }
}

/// Shape of a stored scalar with respect to the reference grammar.
#[derive(Debug, PartialEq, Eq)]
enum Reference<'a> {
    /// No reference; the text is returned as is.
    Literal,
    /// `$${NAME}` spanning the whole scalar; one leading `$` is dropped.
    Escaped,
    /// `${NAME}` spanning the whole scalar.
    Braced(&'a str),
}

fn classify(raw: &str) -> Reference<'_> {
    match raw.as_bytes() {
        [b'$', b'$', b'{', .., b'}'] if is_variable_name(&raw[3..raw.len() - 1]) => {
            Reference::Escaped
        }
        [b'$', b'{', .., b'}'] => {
            let name = &raw[2..raw.len() - 1];
            if is_variable_name(name) {
                Reference::Braced(name)
            } else {
                Reference::Literal
            }
        }
        _ => Reference::Literal,
    }
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | '$' | '=' | '\0'))
}

/// Expand `raw` against the process environment.
///
/// # Example
///
/// ```rust
/// use bootconf::config::expand;
///
/// assert_eq!(expand("$HOME").value().as_deref(), Some("$HOME"));
/// assert_eq!(expand("$${HOME}").value().as_deref(), Some("${HOME}"));
/// ```
pub fn expand(raw: &str) -> Expansion<'_> {
    expand_with(raw, |name| std::env::var(name).ok())
}

/// Expand `raw`, resolving variable names through `lookup`.
pub fn expand_with<F>(raw: &str, lookup: F) -> Expansion<'_>
where
    F: FnOnce(&str) -> Option<String>,
{
    match classify(raw) {
        Reference::Literal => Expansion::Value(Cow::Borrowed(raw)),
        Reference::Escaped => Expansion::Value(Cow::Borrowed(&raw[1..])),
        Reference::Braced(name) => match lookup(name) {
            Some(value) => Expansion::Value(Cow::Owned(value)),
            None => {
                tracing::debug!(variable = name, "environment variable is not set");
                Expansion::Unresolved(name)
            }
        },
    }
}
