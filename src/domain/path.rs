//! Lookup by value and root-to-node paths.

use tracing::{debug, instrument};

use crate::domain::arena::{DecisionTree, NodeId};
use crate::domain::error::{TreeError, TreeResult};

/// Length of the longest root-aligned run of identical nodes in two paths.
///
/// Nodes are compared by identity, so equal values in different subtrees
/// never count as shared.
pub fn common_prefix(a: &[NodeId], b: &[NodeId]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl DecisionTree {
    /// Finds the leaf holding `target`.
    ///
    /// Walks the tree as an Euler tour with two handles of state (the current
    /// node and the one it was entered from): entering an internal node from
    /// its parent descends left, returning from the left child descends right,
    /// returning from the right child ascends. Every leaf is visited once.
    #[instrument(level = "debug", skip(self))]
    pub fn find(&self, target: &str) -> TreeResult<NodeId> {
        if target.is_empty() {
            return Err(TreeError::invalid("empty search value"));
        }
        self.ensure_valid()?;

        let mut current = self.root();
        let mut prev = match current {
            Some(root) => self.node(root)?.parent(),
            None => None,
        };

        while let Some(idx) = current {
            let came_from = prev;
            prev = Some(idx);
            let node = self.node(idx)?;

            current = if node.is_leaf() {
                if node.value() == Some(target) {
                    debug!(?idx, "found");
                    return Ok(idx);
                }
                node.parent()
            } else if came_from == node.parent() {
                node.left()
            } else if came_from == node.left() {
                node.right()
            } else {
                node.parent()
            };
        }

        Err(TreeError::NotFound(target.to_string()))
    }

    /// Collects at most `max_length` nodes from `node` upwards and returns
    /// them root-first, `node` last.
    #[instrument(level = "trace", skip(self))]
    pub fn fill_path(&self, node: NodeId, max_length: usize) -> TreeResult<Vec<NodeId>> {
        if max_length == 0 {
            return Err(TreeError::invalid("path capacity is zero"));
        }
        self.ensure_valid()?;

        let mut path = Vec::with_capacity(max_length.min(self.len()));
        let mut current = Some(node);
        while let Some(idx) = current {
            if path.len() == max_length {
                break;
            }
            path.push(idx);
            current = self.node(idx)?.parent();
        }
        path.reverse();
        Ok(path)
    }

    /// Complete root-to-node path.
    pub fn path_to(&self, node: NodeId) -> TreeResult<Vec<NodeId>> {
        self.fill_path(node, self.len().max(1))
    }

    /// Phrase for stepping from `node` to its child `next`: "is <value>" on
    /// the "yes" side, "is not <value>" on the "no" side.
    pub fn describe_step(&self, node: NodeId, next: NodeId) -> TreeResult<String> {
        let current = self.node(node)?;
        let value = current.value().unwrap_or_default();
        if current.left() == Some(next) {
            Ok(format!("is {value}"))
        } else if current.right() == Some(next) {
            Ok(format!("is not {value}"))
        } else {
            Err(TreeError::invalid(format!(
                "{:?} is not a child of '{}'",
                next, current
            )))
        }
    }
}
