//! Domain layer: the decision tree engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod parser;
pub mod path;
pub mod render;
pub mod validator;
pub mod writer;

pub use arena::{DecisionTree, NodeId, Side, TreeNode};
pub use error::{TreeError, TreeResult};
pub use parser::{parse, ParseLimits, MAX_TREE_DEPTH, MAX_VALUE_LENGTH};
pub use path::common_prefix;
pub use render::TreeNodeConvert;
pub use validator::{status, Status};
pub use writer::{WriteOptions, DEFAULT_INDENT};
