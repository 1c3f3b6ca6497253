//! Serializer for the bracketed tree format.

use tracing::instrument;

use crate::domain::arena::{DecisionTree, NodeId};
use crate::domain::error::{TreeError, TreeResult};

/// Indentation width used per nesting level.
pub const DEFAULT_INDENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

enum Step {
    Open(NodeId, usize),
    Close(usize),
}

fn push_indent(out: &mut String, depth: usize, options: &WriteOptions) {
    out.extend(std::iter::repeat(' ').take(depth * options.indent));
}

impl DecisionTree {
    /// Serializes the tree; the result parses back to the same shape and values.
    ///
    /// Each child starts on its own line one level deeper than its parent and
    /// an internal node's closing brace sits on its own line at the parent's
    /// depth.
    #[instrument(level = "debug", skip(self))]
    pub fn serialize(&self, options: WriteOptions) -> TreeResult<String> {
        self.ensure_valid()?;
        let mut out = String::new();
        let mut stack: Vec<Step> = self.root().map(|r| Step::Open(r, 0)).into_iter().collect();

        while let Some(step) = stack.pop() {
            match step {
                Step::Open(idx, depth) => {
                    let node = self.node(idx)?;
                    let value = node
                        .value()
                        .ok_or_else(|| TreeError::invalid("cannot write a node without a value"))?;
                    if depth > 0 {
                        out.push('\n');
                        push_indent(&mut out, depth, &options);
                    }
                    out.push_str("{\"");
                    out.push_str(value);
                    out.push('"');

                    match (node.left(), node.right()) {
                        (Some(left), Some(right)) => {
                            stack.push(Step::Close(depth));
                            stack.push(Step::Open(right, depth + 1));
                            stack.push(Step::Open(left, depth + 1));
                        }
                        _ => out.push('}'),
                    }
                }
                Step::Close(depth) => {
                    out.push('\n');
                    push_indent(&mut out, depth, &options);
                    out.push('}');
                }
            }
        }
        out.push('\n');
        Ok(out)
    }
}
