//! Tests for writing trees back to the bracketed format

use proptest::prelude::*;

use guesser::domain::{DecisionTree, ParseLimits, Side, TreeError, WriteOptions};

fn shape_of(tree: &DecisionTree) -> Vec<(String, bool)> {
    tree.iter()
        .map(|(_, node)| (node.to_string(), node.is_leaf()))
        .collect()
}

#[test]
fn given_single_leaf_when_serializing_then_one_line() {
    let tree: DecisionTree = "{\"root\"}".parse().unwrap();

    let text = tree.serialize(WriteOptions::default()).unwrap();

    assert_eq!(text, "{\"root\"}\n");
}

#[test]
fn given_nested_tree_when_serializing_then_children_indented_per_level() {
    // Arrange
    let tree: DecisionTree = "{\"a mammal\"{\"barking\"{\"a dog\"}{\"a cat\"}}{\"a bird\"}}"
        .parse()
        .unwrap();

    // Act
    let text = tree.serialize(WriteOptions { indent: 2 }).unwrap();

    // Assert
    let expected = "\
{\"a mammal\"
  {\"barking\"
    {\"a dog\"}
    {\"a cat\"}
  }
  {\"a bird\"}
}
";
    assert_eq!(text, expected);
}

#[test]
fn given_written_tree_when_reparsing_then_same_shape_and_values() {
    let tree: DecisionTree = "{\"is it alive\"{\"a dog\"}{\"a rock\"}}".parse().unwrap();

    let text = tree.serialize(WriteOptions::default()).unwrap();
    let reparsed: DecisionTree = text.parse().unwrap();

    assert_eq!(shape_of(&reparsed), shape_of(&tree));
    assert_eq!(reparsed.serialize(WriteOptions::default()).unwrap(), text);
}

#[test]
fn given_tree_built_by_hand_when_serializing_then_borrowed_values_written() {
    let mut tree = DecisionTree::with_root("is it alive").unwrap();
    let root = tree.root().unwrap();
    tree.create_node("a dog", Some(root), Side::Left).unwrap();
    tree.create_node(String::from("a rock"), Some(root), Side::Right)
        .unwrap();

    let text = tree.serialize(WriteOptions { indent: 0 }).unwrap();

    assert_eq!(text, "{\"is it alive\"\n{\"a dog\"}\n{\"a rock\"}\n}\n");
}

#[test]
fn given_invalid_tree_when_serializing_then_refuses() {
    let tree: DecisionTree = "{\"a\"{\"b\"}}".parse().unwrap();

    assert!(matches!(
        tree.serialize(WriteOptions::default()),
        Err(TreeError::StructuralInvalid(_))
    ));
}

#[test]
fn given_valueless_root_when_serializing_then_invalid_argument() {
    let tree = DecisionTree::new();

    assert!(matches!(
        tree.serialize(WriteOptions::default()),
        Err(TreeError::InvalidArgument(_))
    ));
}

// ============================================================
// Round trip
// ============================================================

#[derive(Debug, Clone)]
enum Shape {
    Leaf,
    Question(Box<Shape>, Box<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    Just(Shape::Leaf).prop_recursive(8, 64, 2, |inner| {
        (inner.clone(), inner)
            .prop_map(|(yes, no)| Shape::Question(Box::new(yes), Box::new(no)))
    })
}

fn render(shape: &Shape, counter: &mut usize, out: &mut String) {
    *counter += 1;
    match shape {
        Shape::Leaf => out.push_str(&format!("{{\"answer {}\"}}", counter)),
        Shape::Question(yes, no) => {
            out.push_str(&format!("{{\"question {}\"", counter));
            render(yes, counter, out);
            render(no, counter, out);
            out.push('}');
        }
    }
}

proptest! {
    // Property: serialize, parse and serialize again yields identical text
    #[test]
    fn prop_serialize_parse_round_trip(shape in shape_strategy(), indent in 0usize..6) {
        let mut text = String::new();
        render(&shape, &mut 0, &mut text);
        let tree: DecisionTree = text.parse().unwrap();
        let options = WriteOptions { indent };

        let written = tree.serialize(options).unwrap();
        let reparsed = guesser::domain::parse(&written, ParseLimits::default()).unwrap();

        prop_assert_eq!(shape_of(&reparsed), shape_of(&tree));
        prop_assert_eq!(reparsed.serialize(options).unwrap(), written);
    }
}
