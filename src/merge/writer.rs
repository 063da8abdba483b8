//! Mode-dependent writing of generated documents into the desired state.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::matcher::match_resources;
use super::path_merger::apply_object;
use crate::error::{FunctionError, Result};
use crate::fieldpath::Path;
use crate::resource::{
    Composite, DesiredComposed, DesiredComposedResources, FieldTarget, Identity, Name, Unstructured,
};
use crate::value::{Map, Value};

/// TargetMode selects where generated documents are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetMode {
    /// Merge every document onto the desired composite resource.
    #[serde(rename = "XR", alias = "CompositeResource")]
    CompositeResource,
    /// Create (or shallow-merge) desired composed resources named after the input.
    #[default]
    #[serde(rename = "Resources", alias = "CreateNamedResources")]
    CreateNamedResources,
    /// Merge documents onto existing desired composed resources.
    #[serde(rename = "PatchDesired", alias = "PatchDesiredResources")]
    PatchDesiredResources,
    /// Render declared base resources, then merge documents onto them.
    #[serde(rename = "PatchResources", alias = "PatchNamedResources")]
    PatchNamedResources,
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetMode::CompositeResource => "XR",
            TargetMode::CreateNamedResources => "Resources",
            TargetMode::PatchDesiredResources => "PatchDesired",
            TargetMode::PatchNamedResources => "PatchResources",
        };
        write!(f, "{}", name)
    }
}

/// A resource declared by the input, rendered from its base document
/// before patches are matched against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredResource {
    pub name: String,
    #[serde(default)]
    pub base: Value,
}

/// Whether a write brought an object into existence or changed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Created => write!(f, "created"),
            Action::Updated => write!(f, "updated"),
        }
    }
}

/// An object a write touched. `key` is `None` for the composite resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Touched {
    pub key: Option<Name>,
    pub identity: Identity,
    pub action: Action,
}

impl fmt::Display for Touched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} resource {:?} of kind {:?}",
            self.action, self.identity.name, self.identity.kind
        )
    }
}

/// WriteOutcome lists what a successful write touched, in write order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub mode: TargetMode,
    pub touched: Vec<Touched>,
}

/// ResourceWriterBuilder is a builder for creating a ResourceWriter.
#[derive(Debug, Default)]
pub struct ResourceWriterBuilder {
    basename: String,
    declared: Vec<DeclaredResource>,
}

impl ResourceWriterBuilder {
    /// Creates a new ResourceWriterBuilder.
    pub fn new() -> Self {
        ResourceWriterBuilder::default()
    }

    /// Sets the key (or key prefix) for created resources.
    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    /// Sets the declared resources rendered in [`TargetMode::PatchNamedResources`].
    pub fn declared(mut self, declared: Vec<DeclaredResource>) -> Self {
        self.declared = declared;
        self
    }

    /// Builds the ResourceWriter.
    pub fn build(self) -> ResourceWriter {
        ResourceWriter {
            basename: self.basename,
            declared: self.declared,
        }
    }
}

/// ResourceWriter routes generated documents into the desired state.
#[derive(Debug, Clone, Default)]
pub struct ResourceWriter {
    basename: String,
    declared: Vec<DeclaredResource>,
}

impl ResourceWriter {
    /// Creates a new ResourceWriterBuilder.
    pub fn builder() -> ResourceWriterBuilder {
        ResourceWriterBuilder::new()
    }

    /// Writes `documents` according to `mode`.
    ///
    /// Work happens on copies of `composite` and `desired`; they are only
    /// replaced when the whole write succeeds, so an error leaves both as
    /// they were.
    pub fn write(
        &self,
        mode: TargetMode,
        composite: &mut Composite,
        desired: &mut DesiredComposedResources,
        documents: &[Map],
    ) -> Result<WriteOutcome> {
        debug!("writing {} document(s) in {} mode", documents.len(), mode);
        let touched = match mode {
            TargetMode::CompositeResource => {
                let mut scratch = composite.clone();
                let touched = self.write_composite(&mut scratch, documents)?;
                *composite = scratch;
                touched
            }
            TargetMode::CreateNamedResources => {
                let mut scratch = desired.clone();
                let touched = self.create_named(&mut scratch, documents);
                *desired = scratch;
                touched
            }
            TargetMode::PatchDesiredResources => {
                let mut scratch = desired.clone();
                let touched = patch_matched(&mut scratch, documents)?;
                *desired = scratch;
                touched
            }
            TargetMode::PatchNamedResources => {
                let mut scratch = desired.clone();
                let touched = self.patch_declared(&mut scratch, documents)?;
                *desired = scratch;
                touched
            }
        };

        for t in &touched {
            info!("{}", t);
        }
        Ok(WriteOutcome { mode, touched })
    }

    fn write_composite(&self, composite: &mut Composite, documents: &[Map]) -> Result<Vec<Touched>> {
        let action = if composite.resource.kind().is_empty() {
            Action::Created
        } else {
            Action::Updated
        };
        for document in documents {
            apply_object(document, &Path::new(), composite)?;
        }
        Ok(vec![Touched {
            key: None,
            identity: composite.identity(),
            action,
        }])
    }

    fn create_named(&self, desired: &mut DesiredComposedResources, documents: &[Map]) -> Vec<Touched> {
        let mut touched = Vec::with_capacity(documents.len());
        for document in documents {
            let identity = Identity::of(document);
            // A single document takes the basename as is; several are
            // told apart by their own name.
            let key = if documents.len() > 1 {
                Name::from(format!("{}-{}", self.basename, identity.name))
            } else {
                Name::from(self.basename.as_str())
            };

            let (content, action) = match desired.get(&key) {
                Some(existing) => (
                    shallow_merge(existing.resource.unstructured_content(), document),
                    Action::Updated,
                ),
                None => (document.clone(), Action::Created),
            };
            desired.insert(key.clone(), DesiredComposed::new(Unstructured::from_map(content)));
            touched.push(Touched {
                key: Some(key),
                identity,
                action,
            });
        }
        touched
    }

    fn patch_declared(&self, desired: &mut DesiredComposedResources, documents: &[Map]) -> Result<Vec<Touched>> {
        let mut touched = Vec::with_capacity(self.declared.len());
        for declared in &self.declared {
            let resource = Unstructured::from_value(declared.base.clone()).map_err(|source| {
                FunctionError::BaseTemplate {
                    name: declared.name.clone(),
                    source,
                }
            })?;
            let key = if resource.name().is_empty() {
                Name::from(declared.name.as_str())
            } else {
                Name::from(resource.name())
            };
            debug!("rendered declared resource {:?} as {}", declared.name, key);
            touched.retain(|t: &Touched| t.key.as_ref() != Some(&key));
            touched.push(Touched {
                key: Some(key.clone()),
                identity: resource.identity(),
                action: Action::Created,
            });
            desired.insert(key, DesiredComposed::new(resource));
        }

        for patched in patch_matched(desired, documents)? {
            match touched.iter_mut().find(|t| t.key == patched.key) {
                Some(existing) => existing.identity = patched.identity,
                None => touched.push(patched),
            }
        }
        Ok(touched)
    }
}

/// Matches documents to desired resources and merges each onto its match.
fn patch_matched(desired: &mut DesiredComposedResources, documents: &[Map]) -> Result<Vec<Touched>> {
    let matches = match_resources(desired, documents)?;
    debug!("matched {} document(s) to {} resource(s)", documents.len(), matches.len());

    let mut touched = Vec::with_capacity(matches.len());
    for (name, assigned) in matches {
        let target = desired
            .get_mut(&name)
            .ok_or_else(|| FunctionError::lookup(format!("desired resource {} disappeared", name)))?;
        for document in &assigned {
            apply_object(document, &Path::new(), target)?;
        }
        touched.push(Touched {
            identity: target.identity(),
            key: Some(name),
            action: Action::Updated,
        });
    }
    Ok(touched)
}

/// Top-level union of two objects; keys from `patch` replace keys in `base`
/// wholesale.
pub fn shallow_merge(base: &Map, patch: &Map) -> Map {
    let mut merged = base.clone();
    for (key, value) in patch.iter() {
        merged.set(key.clone(), value.clone());
    }
    merged
}
