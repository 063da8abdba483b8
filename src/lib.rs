//! # function-cue
//!
//! A composition function that renders generated documents into the desired
//! state of a Kubernetes composition pipeline.
//!
//! Generated documents are written to one of four targets: the composite
//! resource, new composed resources named after the input, existing desired
//! composed resources matched by `(name, kind)`, or declared base resources.
//! Merging walks each document down to its scalar leaves and sets them one
//! field path at a time, so sibling fields already present are kept.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`fieldpath`] - Field paths and paved access into nested objects
//! - [`resource`] - Unstructured objects and composite/composed resource wrappers
//! - [`merge`] - Matching, path merging and mode-dependent writes
//! - [`function`] - Request handling, template compilation and responses
//! - [`config`] - Settings shared by every invocation
//! - [`error`] - Errors reported as fatal results

pub mod config;
pub mod error;
pub mod fieldpath;
pub mod function;
pub mod merge;
pub mod resource;
pub mod value;

pub use config::FunctionConfig;
pub use error::{FunctionError, Result};
pub use fieldpath::{FieldPathError, Path, PathElement};
pub use function::{
    CueInput, Function, RunFunctionRequest, RunFunctionResponse, TemplateCompiler, YamlStreamCompiler,
};
pub use merge::{match_resources, MatchSet, ResourceWriter, ResourceWriterBuilder, TargetMode};
pub use resource::{Composite, DesiredComposed, FieldTarget, Identity, Name, Unstructured};
pub use value::Value;
