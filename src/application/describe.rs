//! Natural-language descriptions built from root-to-leaf paths.

use tracing::instrument;

use crate::domain::{common_prefix, DecisionTree, NodeId, TreeResult};

/// One phrase per step along `path`, e.g. `["is a mammal", "is not a cat"]`.
pub fn describe_path(tree: &DecisionTree, path: &[NodeId]) -> TreeResult<Vec<String>> {
    path.windows(2)
        .map(|step| tree.describe_step(step[0], step[1]))
        .collect()
}

/// Description of the leaf holding `word`.
#[instrument(level = "debug", skip(tree))]
pub fn define(tree: &DecisionTree, word: &str) -> TreeResult<Vec<String>> {
    let leaf = tree.find(word)?;
    let path = tree.path_to(leaf)?;
    describe_path(tree, &path)
}

/// How two answers relate to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Both words name the same leaf.
    Same,
    /// Phrases shared by both answers, then what sets each one apart.
    Different {
        common: Vec<String>,
        first: Vec<String>,
        second: Vec<String>,
    },
}

/// Compares the answers `a` and `b`.
///
/// Paths diverging at node index `d` share `d - 1` phrases: the phrase for a
/// step names the child taken, so the question at the divergence point
/// belongs to the distinguishing part.
#[instrument(level = "debug", skip(tree))]
pub fn compare(tree: &DecisionTree, a: &str, b: &str) -> TreeResult<Comparison> {
    let leaf_a = tree.find(a)?;
    let leaf_b = tree.find(b)?;
    if leaf_a == leaf_b {
        return Ok(Comparison::Same);
    }

    let path_a = tree.path_to(leaf_a)?;
    let path_b = tree.path_to(leaf_b)?;
    let shared = common_prefix(&path_a, &path_b).saturating_sub(1);

    let mut first = describe_path(tree, &path_a)?;
    let second = describe_path(tree, &path_b)?.split_off(shared);
    let common = first.drain(..shared).collect();

    Ok(Comparison::Different {
        common,
        first,
        second,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> DecisionTree {
        "{\"a mammal\"{\"barking\"{\"a dog\"}{\"a cat\"}}{\"a bird\"}}"
            .parse()
            .unwrap()
    }

    #[test]
    fn given_leaf_when_defining_then_lists_each_answer() {
        let tree = animals();

        assert_eq!(
            define(&tree, "a cat").unwrap(),
            vec!["is a mammal", "is not barking"]
        );
    }

    #[test]
    fn given_siblings_when_comparing_then_shares_parent_answers() {
        let tree = animals();

        let comparison = compare(&tree, "a dog", "a cat").unwrap();

        assert_eq!(
            comparison,
            Comparison::Different {
                common: vec!["is a mammal".to_string()],
                first: vec!["is barking".to_string()],
                second: vec!["is not barking".to_string()],
            }
        );
    }

    #[test]
    fn given_root_split_when_comparing_then_nothing_in_common() {
        let tree = animals();

        let Comparison::Different { common, first, second } =
            compare(&tree, "a dog", "a bird").unwrap()
        else {
            panic!("expected different answers");
        };

        assert!(common.is_empty());
        assert_eq!(first, vec!["is a mammal", "is barking"]);
        assert_eq!(second, vec!["is not a mammal"]);
    }

    #[test]
    fn given_same_word_when_comparing_then_same() {
        assert_eq!(compare(&animals(), "a dog", "a dog").unwrap(), Comparison::Same);
    }
}
