//! Loading and saving tree files.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::{parse, DecisionTree, ParseLimits, WriteOptions};

/// Reads and parses a tree file.
#[instrument(level = "debug")]
pub fn load(path: &Path, limits: ParseLimits) -> ApplicationResult<DecisionTree> {
    let content = fs::read_to_string(path)
        .map_err(|e| ApplicationError::io(format!("read {}", path.display()), e))?;
    let tree = parse(&content, limits).map_err(|source| ApplicationError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(nodes = tree.len(), "loaded tree");
    Ok(tree)
}

/// Serializes `tree` and atomically replaces `path` with the result.
///
/// The text goes to a temporary file next to the target first, so a failed
/// write leaves the previous file untouched.
#[instrument(level = "debug", skip(tree))]
pub fn save(tree: &DecisionTree, path: &Path, options: WriteOptions) -> ApplicationResult<()> {
    let text = tree.serialize(options)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| ApplicationError::io(format!("create temp file in {}", dir.display()), e))?;
    tmp.write_all(text.as_bytes())
        .map_err(|e| ApplicationError::io(format!("write {}", tmp.path().display()), e))?;
    tmp.persist(path)
        .map_err(|e| ApplicationError::io(format!("replace {}", path.display()), e.error))?;
    debug!(bytes = text.len(), "saved tree");
    Ok(())
}
