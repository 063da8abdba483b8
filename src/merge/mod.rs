//! Merge module - Matching generated documents to resources and writing them.
//!
//! - [`path_merger`] turns a document into field-path assignments and applies them.
//! - [`matcher`] pairs documents with desired resources by name and kind.
//! - [`writer`] routes documents according to the [`TargetMode`].
//! - [`report`] turns what a write touched into success messages.

pub mod matcher;
pub mod path_merger;
pub mod report;
mod writer;


pub use matcher::{match_resources, MatchSet};
pub use path_merger::{apply, apply_object, decompose, Assignment};
pub use report::summarize;
pub use writer::*;
