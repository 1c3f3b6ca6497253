//! Diagnostic views of a decision tree: terminal tree and Graphviz source.

use std::fmt::Write;

use termtree::Tree;

use crate::domain::arena::{DecisionTree, NodeId, Side};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(tree: &DecisionTree, node_idx: NodeId, side: Option<Side>) -> String {
    let value = tree
        .get_node(node_idx)
        .map(|n| n.to_string())
        .unwrap_or_default();
    match side {
        None => value,
        Some(Side::Left) => format!("yes: {value}"),
        Some(Side::Right) => format!("no: {value}"),
    }
}

impl TreeNodeConvert for DecisionTree {
    fn to_tree_string(&self) -> Tree<String> {
        if let Some(root_idx) = self.root() {
            let mut tree = Tree::new(label(self, root_idx, None));

            fn build_tree(arena: &DecisionTree, node_idx: NodeId, parent_tree: &mut Tree<String>) {
                if let Some(node) = arena.get_node(node_idx) {
                    for side in [Side::Left, Side::Right] {
                        if let Some(child_idx) = node.child(side) {
                            let mut child_tree = Tree::new(label(arena, child_idx, Some(side)));
                            build_tree(arena, child_idx, &mut child_tree);
                            parent_tree.push(child_tree);
                        }
                    }
                }
            }

            build_tree(self, root_idx, &mut tree);
            tree
        } else {
            Tree::new("Empty tree".to_string())
        }
    }
}

fn vertex(idx: NodeId) -> String {
    let (slot, generation) = idx.into_raw_parts();
    format!("V{slot}_{generation}")
}

impl DecisionTree {
    /// Graphviz DOT source: one vertex per node, edges labelled by answer.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph G {\n\trankdir=TB\n\tlayout=dot\n");
        for (idx, node) in self.iter() {
            let value = node.to_string().replace('"', "\\\"");
            writeln!(out, "\t{} [label=\"{}\"]", vertex(idx), value).ok();
            if let Some(parent) = node.parent() {
                let answer = match self.get_node(parent).and_then(|p| p.right()) {
                    Some(right) if right == idx => "no",
                    _ => "yes",
                };
                writeln!(
                    out,
                    "\t{} -> {} [label=\"{}\"]",
                    vertex(parent),
                    vertex(idx),
                    answer
                )
                .ok();
            }
        }
        out.push('}');
        out.push('\n');
        out
    }
}
