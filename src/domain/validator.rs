//! Structural status of a decision tree.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use tracing::{instrument, warn};

use crate::domain::arena::{DecisionTree, NodeId};
use crate::domain::error::{TreeError, TreeResult};

/// Bitmask of structural violations. Zero means the tree is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Status(u8);

impl Status {
    pub const VALID: Status = Status(0);
    /// The tree handle itself is absent.
    pub const NULL_TREE: Status = Status(1);
    /// The tree has no root node.
    pub const NULL_ROOT: Status = Status(1 << 1);
    /// A node has exactly one child, or a child does not point back at its parent.
    pub const INV_CONNECTIONS: Status = Status(1 << 2);

    const NAMED: [(Status, &'static str); 3] = [
        (Status::NULL_TREE, "NULL_TREE"),
        (Status::NULL_ROOT, "NULL_ROOT"),
        (Status::INV_CONNECTIONS, "INV_CONNECTIONS"),
    ];

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Status) -> bool {
        self.0 & other.0 == other.0
    }

    /// Names of the flags that are set, in bit order.
    pub fn flag_names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Status) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "VALID");
        }
        write!(f, "{}", self.flag_names().join(" | "))
    }
}

/// Status of a possibly absent tree handle.
pub fn status(tree: Option<&DecisionTree>) -> Status {
    match tree {
        None => Status::NULL_TREE,
        Some(tree) => tree.status(),
    }
}

impl DecisionTree {
    #[instrument(level = "trace", skip(self))]
    pub fn status(&self) -> Status {
        match self.root() {
            None => Status::NULL_ROOT,
            Some(root) => self.node_status(root),
        }
    }

    /// Checks the subtree below `start`.
    ///
    /// Uses an explicit stack; a walk that visits more nodes than the arena
    /// holds can only come from a cycle and is reported as broken connections.
    #[instrument(level = "trace", skip(self))]
    pub fn node_status(&self, start: NodeId) -> Status {
        let mut status = Status::VALID;
        let mut stack = vec![start];
        let mut visited = 0usize;

        while let Some(id) = stack.pop() {
            visited += 1;
            if visited > self.len() {
                return status | Status::INV_CONNECTIONS;
            }
            let Some(node) = self.get_node(id) else {
                status |= Status::INV_CONNECTIONS;
                continue;
            };
            if node.left().is_some() != node.right().is_some() {
                status |= Status::INV_CONNECTIONS;
            }
            for child in [node.left(), node.right()].into_iter().flatten() {
                match self.get_node(child) {
                    Some(child_node) if child_node.parent() == Some(id) => stack.push(child),
                    _ => status |= Status::INV_CONNECTIONS,
                }
            }
        }
        status
    }

    /// Fails with `StructuralInvalid` unless the status is zero.
    pub(crate) fn ensure_valid(&self) -> TreeResult<()> {
        let status = self.status();
        if status.is_valid() {
            Ok(())
        } else {
            warn!(%status, "refusing to walk an invalid tree");
            Err(TreeError::StructuralInvalid(status))
        }
    }
}
