//! A twenty-questions guessing game backed by a persistent binary decision tree.
//!
//! Internal nodes hold yes/no questions, leaves hold answers. Trees are read
//! from and written to a bracketed text format (`{"question"{"yes"}{"no"}}`),
//! grow when a guess fails, and can describe any answer by the questions
//! leading to it.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
