//! Application layer: game session, descriptions and tree files
//!
//! This layer orchestrates domain logic and owns the I/O around it.

pub mod describe;
pub mod error;
pub mod session;
pub mod store;

pub use describe::{compare, define, describe_path, Comparison};
pub use error::{ApplicationError, ApplicationResult};
pub use session::Session;
pub use store::{load, save};
