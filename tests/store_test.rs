//! Tests for loading and saving tree files

use std::fs;
use std::io::ErrorKind;

use tempfile::TempDir;

use guesser::application::{load, save, ApplicationError};
use guesser::domain::{DecisionTree, ParseLimits, TreeError, WriteOptions};
use guesser::util::testing;

#[test]
fn given_saved_tree_when_loading_then_same_answers() {
    testing::init_test_setup();
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("animals.db");
    let tree: DecisionTree = "{\"a mammal\"{\"a dog\"}{\"a bird\"}}".parse().unwrap();

    // Act
    save(&tree, &path, WriteOptions::default()).unwrap();
    let loaded = load(&path, ParseLimits::default()).unwrap();

    // Assert
    assert_eq!(loaded.leaf_values(), vec!["a dog", "a bird"]);
    assert!(loaded.status().is_valid());
}

#[test]
fn given_existing_file_when_saving_then_replaced_without_leftovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.db");
    fs::write(&path, "{\"old\"}").unwrap();
    let tree: DecisionTree = "{\"new\"}".parse().unwrap();

    save(&tree, &path, WriteOptions::default()).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"new\"}\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn given_missing_file_when_loading_then_io_not_found() {
    let dir = TempDir::new().unwrap();

    let result = load(&dir.path().join("missing.db"), ParseLimits::default());

    match result {
        Err(ApplicationError::Io { source, .. }) => assert_eq!(source.kind(), ErrorKind::NotFound),
        other => panic!("unexpected result: {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn given_malformed_file_when_loading_then_load_error_names_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.db");
    fs::write(&path, "{\"a\"{\"b\"}{\"c\"}{\"d\"}}").unwrap();

    let err = load(&path, ParseLimits::default()).unwrap_err();

    assert!(matches!(
        &err,
        ApplicationError::Load {
            source: TreeError::Parse { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("broken.db"));
}

#[test]
fn given_invalid_tree_when_saving_then_target_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tree.db");
    fs::write(&path, "{\"old\"}").unwrap();
    let tree: DecisionTree = "{\"a\"{\"b\"}}".parse().unwrap();

    let result = save(&tree, &path, WriteOptions::default());

    assert!(matches!(
        result,
        Err(ApplicationError::Tree(TreeError::StructuralInvalid(_)))
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"old\"}");
}
