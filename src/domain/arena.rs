use std::borrow::Cow;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::parser::ParseLimits;

/// Handle of a node inside its tree's arena.
///
/// Handles of destroyed nodes stay detectable: the arena generation check
/// turns them into `None` lookups instead of dangling references.
pub type NodeId = Index;

/// Child slot of an internal node. Left answers "yes", right answers "no".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Tree node in the arena-based decision tree.
#[derive(Debug)]
pub struct TreeNode {
    /// Question (internal node) or answer (leaf); `None` only for a fresh root
    pub(crate) value: Option<Cow<'static, str>>,
    /// Index of parent node in the arena, None for the root and detached nodes
    pub(crate) parent: Option<NodeId>,
    /// "yes" branch
    pub(crate) left: Option<NodeId>,
    /// "no" branch
    pub(crate) right: Option<NodeId>,
}

impl TreeNode {
    fn new(value: Option<Cow<'static, str>>, parent: Option<NodeId>) -> Self {
        Self {
            value,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the node owns its value's storage (parsed or user text) as
    /// opposed to borrowing a static literal.
    pub fn owns_value(&self) -> bool {
        matches!(self.value, Some(Cow::Owned(_)))
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_slot_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value().unwrap_or("<no value>"))
    }
}

/// Arena-based binary decision tree.
///
/// The tree owns every node through its arena; child links and parent
/// back-references are plain indices, so tearing down a subtree can never
/// leave a dangling upward link behind.
#[derive(Debug)]
pub struct DecisionTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None once the tree has been cleared
    root: Option<NodeId>,
    /// Value length and depth limits shared with the parser
    limits: ParseLimits,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Creates a tree holding a single root without a value.
    pub fn new() -> Self {
        Self::with_limits(ParseLimits::default())
    }

    pub fn with_limits(limits: ParseLimits) -> Self {
        let mut tree = Self::empty(limits);
        tree.root = Some(tree.arena.insert(TreeNode::new(None, None)));
        tree
    }

    /// Creates a tree whose root is a single answer.
    pub fn with_root(value: impl Into<Cow<'static, str>>) -> TreeResult<Self> {
        let mut tree = Self::new();
        if let Some(root) = tree.root {
            tree.set_value(root, value)?;
        }
        Ok(tree)
    }

    /// A tree with no root at all; the parser fills it in.
    pub(crate) fn empty(limits: ParseLimits) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            limits,
        }
    }

    pub(crate) fn insert_root(&mut self, value: String) -> NodeId {
        let root = self.arena.insert(TreeNode::new(Some(Cow::Owned(value)), None));
        self.root = Some(root);
        root
    }

    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut Arena<TreeNode> {
        &mut self.arena
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub(crate) fn node(&self, idx: NodeId) -> TreeResult<&TreeNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| TreeError::invalid(format!("no such node: {:?}", idx)))
    }

    fn node_mut(&mut self, idx: NodeId) -> TreeResult<&mut TreeNode> {
        self.arena
            .get_mut(idx)
            .ok_or_else(|| TreeError::invalid(format!("no such node: {:?}", idx)))
    }

    pub fn limits(&self) -> ParseLimits {
        self.limits
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Checks that `value` can be stored and written back out.
    pub fn check_value(&self, value: &str) -> TreeResult<()> {
        if value.is_empty() {
            return Err(TreeError::invalid("value is empty"));
        }
        if value.contains('"') {
            return Err(TreeError::invalid(format!(
                "value contains a double quote: {value}"
            )));
        }
        if value.contains(|c: char| c == '\n' || c == '\r') {
            return Err(TreeError::invalid("value contains a line break"));
        }
        if value.len() > self.limits.max_value_length {
            return Err(TreeError::invalid(format!(
                "value is {} bytes long, limit is {}",
                value.len(),
                self.limits.max_value_length
            )));
        }
        Ok(())
    }

    /// Creates a node and links it into `parent`'s `side` slot.
    ///
    /// A slot can be filled once; an occupied slot is `InvalidArgument`.
    /// Without a parent the node is created detached.
    #[instrument(level = "trace", skip(self, value))]
    pub fn create_node(
        &mut self,
        value: impl Into<Cow<'static, str>>,
        parent: Option<NodeId>,
        side: Side,
    ) -> TreeResult<NodeId> {
        let value = value.into();
        self.check_value(&value)?;
        self.attach(value, parent, side)
    }

    /// Links without checking the value; the parser has its own limits.
    pub(crate) fn attach(
        &mut self,
        value: Cow<'static, str>,
        parent: Option<NodeId>,
        side: Side,
    ) -> TreeResult<NodeId> {
        if let Some(parent_idx) = parent {
            let parent_node = self.node(parent_idx)?;
            if parent_node.child(side).is_some() {
                return Err(TreeError::invalid(format!(
                    "{:?} child slot of '{}' is already occupied",
                    side, parent_node
                )));
            }
        }

        let node_idx = self.arena.insert(TreeNode::new(Some(value), parent));
        if let Some(parent_idx) = parent {
            *self.node_mut(parent_idx)?.child_slot_mut(side) = Some(node_idx);
        }
        Ok(node_idx)
    }

    /// First free child slot of `idx`, left before right.
    pub(crate) fn free_side(&self, idx: NodeId) -> TreeResult<Option<Side>> {
        let node = self.node(idx)?;
        Ok(if node.left.is_none() {
            Some(Side::Left)
        } else if node.right.is_none() {
            Some(Side::Right)
        } else {
            None
        })
    }

    /// Replaces the value of a node.
    pub fn set_value(
        &mut self,
        idx: NodeId,
        value: impl Into<Cow<'static, str>>,
    ) -> TreeResult<()> {
        let value = value.into();
        self.check_value(&value)?;
        self.node_mut(idx)?.value = Some(value);
        Ok(())
    }

    /// Destroys a single node. No-op for a handle that is already gone.
    ///
    /// The node is unlinked from its parent and its children lose their
    /// parent back-reference; the children themselves stay in the arena
    /// detached and must be torn down with [`DecisionTree::destroy_subtree`].
    #[instrument(level = "trace", skip(self))]
    pub fn destroy_node(&mut self, idx: NodeId) -> Option<TreeNode> {
        let node = self.arena.remove(idx)?;

        if let Some(parent) = node.parent.and_then(|p| self.arena.get_mut(p)) {
            if parent.left == Some(idx) {
                parent.left = None;
            }
            if parent.right == Some(idx) {
                parent.right = None;
            }
        }
        for child in [node.left, node.right].into_iter().flatten() {
            if let Some(child) = self.arena.get_mut(child) {
                child.parent = None;
            }
        }
        if self.root == Some(idx) {
            self.root = None;
        }
        Some(node)
    }

    /// Destroys `idx` and everything below it, each node after its children.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy_subtree(&mut self, idx: NodeId) -> usize {
        let doomed: Vec<NodeId> = self.iter_postorder_from(idx).map(|(id, _)| id).collect();
        let count = doomed.len();
        for id in doomed {
            self.destroy_node(id);
        }
        debug!(count, "destroyed subtree");
        count
    }

    /// Destroys every node reachable from the root; status becomes `NULL_ROOT`.
    pub fn clear(&mut self) {
        if let Some(root) = self.root {
            self.destroy_subtree(root);
        }
        self.root = None;
    }

    /// Turns a leaf into a question.
    ///
    /// The leaf takes `question` as its value, the new "yes" child holds
    /// `new_answer` and the new "no" child inherits the old answer together
    /// with its ownership.
    #[instrument(level = "debug", skip(self, new_answer, question))]
    pub fn split_leaf(
        &mut self,
        leaf: NodeId,
        new_answer: impl Into<Cow<'static, str>>,
        question: impl Into<Cow<'static, str>>,
    ) -> TreeResult<()> {
        self.ensure_valid()?;
        let new_answer = new_answer.into();
        let question = question.into();
        self.check_value(&new_answer)?;
        self.check_value(&question)?;

        let node = self.node(leaf)?;
        if !node.is_leaf() {
            return Err(TreeError::invalid(format!("'{}' is not a leaf", node)));
        }
        if node.value.is_none() {
            return Err(TreeError::invalid("cannot split a leaf without a value"));
        }

        let node = self.node_mut(leaf)?;
        let old_answer = std::mem::replace(&mut node.value, Some(question))
            .unwrap_or_default();
        self.attach(new_answer, Some(leaf), Side::Left)?;
        self.attach(old_answer, Some(leaf), Side::Right)?;
        debug!(leaf = %self.node(leaf)?, "learned a new question");
        Ok(())
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder_from(&self, start: NodeId) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, start)
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                for child in [node.left, node.right].into_iter().flatten() {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Answers held by the leaves, left to right.
    pub fn leaf_values(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .filter_map(|(_, node)| node.value())
            .collect()
    }
}

/// Pre-order walk from the root, "yes" branch first.
pub struct TreeIterator<'a> {
    tree: &'a DecisionTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DecisionTree) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push right first so the left child comes out next
                self.stack.extend(node.right);
                self.stack.extend(node.left);
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order walk: every node after both of its children.
pub struct PostOrderIterator<'a> {
    tree: &'a DecisionTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a DecisionTree, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for child in [node.right, node.left].into_iter().flatten() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_new_tree_when_inspecting_root_then_has_no_value() {
        let tree = DecisionTree::new();
        let root = tree.get_node(tree.root().unwrap()).unwrap();

        assert!(root.value().is_none());
        assert!(root.is_leaf());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn given_literal_and_owned_values_when_creating_then_ownership_follows_cow() {
        let mut tree = DecisionTree::with_root("a mammal").unwrap();
        let root = tree.root().unwrap();

        let yes = tree.create_node("a dog", Some(root), Side::Left).unwrap();
        let no = tree
            .create_node(String::from("a bird"), Some(root), Side::Right)
            .unwrap();

        assert!(!tree.get_node(yes).unwrap().owns_value());
        assert!(tree.get_node(no).unwrap().owns_value());
        assert_eq!(tree.get_node(no).unwrap().parent(), Some(root));
    }

    #[test]
    fn given_occupied_slot_when_creating_then_invalid_argument() {
        let mut tree = DecisionTree::with_root("a mammal").unwrap();
        let root = tree.root().unwrap();
        tree.create_node("a dog", Some(root), Side::Left).unwrap();

        let result = tree.create_node("a cat", Some(root), Side::Left);

        assert!(matches!(result, Err(TreeError::InvalidArgument(_))));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn given_leaf_when_splitting_then_old_answer_moves_right() {
        let mut tree = DecisionTree::with_root(String::from("a dog")).unwrap();
        let root = tree.root().unwrap();

        tree.split_leaf(root, "a cat", "meowing").unwrap();

        let node = tree.get_node(root).unwrap();
        assert_eq!(node.value(), Some("meowing"));
        let yes = tree.get_node(node.left().unwrap()).unwrap();
        let no = tree.get_node(node.right().unwrap()).unwrap();
        assert_eq!(yes.value(), Some("a cat"));
        assert_eq!(no.value(), Some("a dog"));
        assert!(no.owns_value());
        assert!(!yes.owns_value());
    }

    #[test]
    fn given_internal_node_when_destroying_single_node_then_children_are_detached() {
        let mut tree = DecisionTree::with_root("a mammal").unwrap();
        let root = tree.root().unwrap();
        tree.split_leaf(root, "a dog", "barking").unwrap();
        let barking = tree.get_node(root).unwrap().left().unwrap();
        tree.split_leaf(barking, "a wolf", "wild").unwrap();
        let wolf = tree.get_node(barking).unwrap().left().unwrap();

        let removed = tree.destroy_node(barking).unwrap();

        assert_eq!(removed.value(), Some("wild"));
        assert!(tree.get_node(root).unwrap().left().is_none());
        assert!(tree.get_node(wolf).unwrap().parent().is_none());
        assert!(tree.destroy_node(barking).is_none());
    }

    #[test]
    fn given_subtree_when_destroying_then_removes_all_descendants() {
        let mut tree = DecisionTree::with_root("x").unwrap();
        let root = tree.root().unwrap();
        tree.split_leaf(root, "y", "q1").unwrap();
        let left = tree.get_node(root).unwrap().left().unwrap();
        tree.split_leaf(left, "z", "q2").unwrap();

        let removed = tree.destroy_subtree(left);

        assert_eq!(removed, 3);
        assert_eq!(tree.len(), 2);
        assert!(tree.get_node(root).unwrap().left().is_none());
    }

    #[test]
    fn given_tree_when_walking_then_preorder_is_yes_first() {
        let mut tree = DecisionTree::with_root("a").unwrap();
        let root = tree.root().unwrap();
        tree.split_leaf(root, "b", "q").unwrap();

        let values: Vec<_> = tree.iter().filter_map(|(_, n)| n.value()).collect();
        let post: Vec<_> = tree
            .iter_postorder_from(root)
            .filter_map(|(_, n)| n.value())
            .collect();

        assert_eq!(values, vec!["q", "b", "a"]);
        assert_eq!(post, vec!["b", "a", "q"]);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_values(), vec!["b", "a"]);
    }
}
