//! Field path module - Addresses leaves inside structured objects.
//!
//! Paths are written in dotted map-key and bracketed list-index syntax,
//! e.g. `spec.template.spec.containers[0].name`.

mod parser;
mod paved;
mod path;

pub use parser::*;
pub use paved::*;
pub use path::*;

use thiserror::Error;

/// FieldPathError represents a failure to parse a path or write through it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldPathError {
    #[error("field path cannot be empty")]
    EmptyPath,

    #[error("invalid field path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("{path}: not an object, found {found}")]
    NotAnObject { path: String, found: String },

    #[error("{path}: not an array, found {found}")]
    NotAnArray { path: String, found: String },

    #[error("{path}: expected a string value, found {found}")]
    NotAString { path: String, found: String },
}

impl FieldPathError {
    /// Creates a not-an-object error for the given path prefix.
    pub fn not_an_object(path: &Path, found: &str) -> Self {
        FieldPathError::NotAnObject {
            path: display_root(path),
            found: found.to_string(),
        }
    }

    /// Creates a not-an-array error for the given path prefix.
    pub fn not_an_array(path: &Path, found: &str) -> Self {
        FieldPathError::NotAnArray {
            path: display_root(path),
            found: found.to_string(),
        }
    }
}

fn display_root(path: &Path) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
