//! Errors surfaced by the function.

use thiserror::Error;

use crate::fieldpath::FieldPathError;

/// FunctionError is every terminal failure of a single invocation.
#[derive(Debug, Clone, Error)]
pub enum FunctionError {
    #[error("invalid function input: {message}")]
    Validation { message: String },

    #[error("cannot get function input: {message}")]
    Input { message: String },

    #[error("{message}")]
    Lookup { message: String },

    #[error("failed to match all resources: matched {matched} of {total}, unmatched {}", .unmatched.join(", "))]
    IncompleteMatch {
        matched: usize,
        total: usize,
        unmatched: Vec<String>,
    },

    #[error("setting {path}:{value} failed: {source}")]
    FieldSet {
        path: String,
        value: String,
        #[source]
        source: FieldPathError,
    },

    #[error("cannot parse base template of composed resource {name:?}: {source}")]
    BaseTemplate {
        name: String,
        #[source]
        source: FieldPathError,
    },

    #[error("{message}")]
    Template { message: String },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<FunctionError>,
    },
}

impl FunctionError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        FunctionError::Validation {
            message: message.into(),
        }
    }

    /// Creates a lookup error.
    pub fn lookup(message: impl Into<String>) -> Self {
        FunctionError::Lookup {
            message: message.into(),
        }
    }

    /// Creates a template error.
    pub fn template(message: impl Into<String>) -> Self {
        FunctionError::Template {
            message: message.into(),
        }
    }

    /// Wraps the error with a description of the step that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        FunctionError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping context wrappers.
    pub fn root(&self) -> &FunctionError {
        match self {
            FunctionError::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = FunctionError> = std::result::Result<T, E>;

/// Adds step context to results, mirroring the wrapping done at each call site.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }
}
