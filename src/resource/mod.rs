//! Resource module - The objects generated documents are written onto.
//!
//! Every target exposes the same [`FieldTarget`] capability set, so the merge
//! engine never needs to know which concrete variant it is writing to.

mod composed;
mod unstructured;

pub use composed::*;
pub use unstructured::*;
