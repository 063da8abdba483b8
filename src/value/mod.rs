//! Value module - In-memory representation of generated YAML/JSON documents.
//!
//! Documents are a tagged union so that tree walks pattern-match instead of
//! down-casting at every level.

mod value;

pub use value::*;
