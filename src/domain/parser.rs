//! Reader for the bracketed tree format.
//!
//! ```text
//! {"a mammal"
//!     {"a dog"}
//!     {"a bird"}
//! }
//! ```
//!
//! A node is a quoted value followed by up to two `{...}` child blocks, "yes"
//! first. Outside quoted spans everything except `"`, `{` and `}` is ignored.

use std::borrow::Cow;

use tracing::{debug, instrument, warn};

use crate::domain::arena::DecisionTree;
use crate::domain::error::{TreeError, TreeResult};

/// Longest value accepted by the parser, in bytes.
pub const MAX_VALUE_LENGTH: usize = 256;

/// Deepest nesting accepted by the parser, in nodes.
pub const MAX_TREE_DEPTH: usize = 128;

/// Bounds applied while reading untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_value_length: usize,
    pub max_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_value_length: MAX_VALUE_LENGTH,
            max_depth: MAX_TREE_DEPTH,
        }
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes input up to and including `target`. False at end of input.
    fn skip_past(&mut self, target: char) -> bool {
        while let Some(c) = self.next_char() {
            if c == target {
                return true;
            }
        }
        false
    }

    /// Reads a value whose opening quote has been consumed, plus its closing quote.
    fn read_quoted(&mut self, limit: usize) -> TreeResult<&'a str> {
        let start = self.pos;
        let rest = &self.input[start..];
        match rest.find('"') {
            Some(len) if len <= limit => {
                self.pos = start + len + 1;
                Ok(&rest[..len])
            }
            Some(len) => Err(TreeError::parse(
                start,
                format!("value is {len} bytes long, limit is {limit}"),
            )),
            None if rest.len() > limit => Err(TreeError::parse(
                start,
                format!("value exceeds {limit} bytes without a closing quote"),
            )),
            None => Err(TreeError::parse(start, "missing closing quote")),
        }
    }
}

/// Reads the next quoted value into an exactly sized owned buffer.
fn read_value(cursor: &mut Cursor<'_>, limits: &ParseLimits) -> TreeResult<String> {
    if !cursor.skip_past('"') {
        return Err(TreeError::parse(cursor.pos, "expected a quoted value"));
    }
    let start = cursor.pos;
    let raw = cursor.read_quoted(limits.max_value_length)?;
    if raw.is_empty() {
        return Err(TreeError::parse(start, "empty value"));
    }

    let mut value = String::new();
    value
        .try_reserve_exact(raw.len())
        .map_err(|e| TreeError::OutOfMemory(e.to_string()))?;
    value.push_str(raw);
    Ok(value)
}

/// Builds a tree from its serialized form.
///
/// Child blocks are tracked on an explicit stack of open nodes, so nesting is
/// bounded by `limits.max_depth` rather than by the call stack. A node with a
/// single child block is accepted here and reported by the validator.
/// Unclosed blocks are closed by the end of input; anything after the root's
/// closing brace is ignored.
#[instrument(level = "debug", skip(input), fields(len = input.len()))]
pub fn parse(input: &str, limits: ParseLimits) -> TreeResult<DecisionTree> {
    let mut tree = DecisionTree::empty(limits);
    let mut cursor = Cursor::new(input);

    let root = tree.insert_root(read_value(&mut cursor, &limits)?);
    let mut open = vec![root];

    while let Some(&current) = open.last() {
        match cursor.next_char() {
            None => {
                debug!(unclosed = open.len(), "input ended inside open nodes");
                break;
            }
            Some('}') => {
                open.pop();
            }
            Some('{') => {
                let offset = cursor.pos - 1;
                let Some(side) = tree.free_side(current)? else {
                    warn!(offset, "third child block");
                    return Err(TreeError::parse(offset, "too many children"));
                };
                if open.len() >= limits.max_depth {
                    return Err(TreeError::parse(
                        offset,
                        format!("nesting deeper than {} nodes", limits.max_depth),
                    ));
                }
                let value = read_value(&mut cursor, &limits)?;
                let child = tree.attach(Cow::Owned(value), Some(current), side)?;
                open.push(child);
            }
            Some(_) => {}
        }
    }

    debug!(nodes = tree.len(), "parsed tree");
    Ok(tree)
}

impl std::str::FromStr for DecisionTree {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s, ParseLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_prefix_text_when_parsing_then_skips_to_first_quote() {
        let tree = parse("# animals\n{\"root\"}", ParseLimits::default()).unwrap();
        let root = tree.get_node(tree.root().unwrap()).unwrap();

        assert_eq!(root.value(), Some("root"));
        assert!(root.owns_value());
    }

    #[test]
    fn given_value_at_limit_when_parsing_then_accepts_it() {
        let limits = ParseLimits {
            max_value_length: 4,
            max_depth: 8,
        };

        assert!(parse("{\"abcd\"}", limits).is_ok());
        assert!(matches!(
            parse("{\"abcde\"}", limits),
            Err(TreeError::Parse { offset: 2, .. })
        ));
    }

    #[test]
    fn given_multibyte_values_when_parsing_then_counts_bytes() {
        let tree = parse("{\"ein Hund?\"{\"Käfer\"}{\"Öl\"}}", ParseLimits::default()).unwrap();
        assert_eq!(tree.leaf_values(), vec!["Käfer", "Öl"]);
    }

    #[test]
    fn given_unclosed_blocks_when_parsing_then_end_of_input_closes_them() {
        let tree = parse("{\"a\"{\"b\"}{\"c\"", ParseLimits::default()).unwrap();
        assert_eq!(tree.len(), 3);
        assert!(tree.status().is_valid());
    }

    #[test]
    fn given_nesting_past_limit_when_parsing_then_parse_error() {
        let limits = ParseLimits {
            max_value_length: 8,
            max_depth: 2,
        };

        assert!(parse("{\"a\"{\"b\"}{\"c\"}}", limits).is_ok());
        let err = parse("{\"a\"{\"b\"{\"c\"}{\"d\"}}{\"e\"}}", limits).unwrap_err();
        assert!(err.to_string().contains("nesting deeper than 2"));
    }
}
