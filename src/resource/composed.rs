//! Composite and composed resource wrappers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::unstructured::{FieldTarget, Unstructured};
use crate::fieldpath::{FieldPathError, Path};
use crate::value::{Map, Value};

/// Name is the key a composed resource is stored under in the desired state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Name(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name(s.to_string())
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Readiness a function reports for a desired composed resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ready {
    #[default]
    Unspecified,
    True,
    False,
}

/// Composite is the composite resource (XR) a function renders for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composite {
    pub resource: Unstructured,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connection_details: BTreeMap<String, String>,
}

impl Composite {
    pub fn new(resource: Unstructured) -> Self {
        Composite {
            resource,
            connection_details: BTreeMap::new(),
        }
    }
}

/// An observed composed resource, as it exists in the cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedComposed {
    pub resource: Unstructured,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connection_details: BTreeMap<String, String>,
}

/// DesiredComposed is a composed resource the pipeline wants to exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredComposed {
    pub resource: Unstructured,
    #[serde(default)]
    pub ready: Ready,
}

impl DesiredComposed {
    pub fn new(resource: Unstructured) -> Self {
        DesiredComposed {
            resource,
            ready: Ready::Unspecified,
        }
    }
}

/// The desired composed resources, keyed by name. Iteration is in key order.
pub type DesiredComposedResources = BTreeMap<Name, DesiredComposed>;

/// The observed composed resources, keyed by name.
pub type ObservedComposedResources = BTreeMap<Name, ObservedComposed>;

impl FieldTarget for Composite {
    fn set_api_version(&mut self, api_version: &str) {
        self.resource.set_api_version(api_version);
    }

    fn set_kind(&mut self, kind: &str) {
        self.resource.set_kind(kind);
    }

    fn set_field_at_path(&mut self, path: &Path, value: Value) -> Result<(), FieldPathError> {
        self.resource.set_field_at_path(path, value)
    }

    fn content(&self) -> &Map {
        self.resource.content()
    }
}

impl FieldTarget for DesiredComposed {
    fn set_api_version(&mut self, api_version: &str) {
        self.resource.set_api_version(api_version);
    }

    fn set_kind(&mut self, kind: &str) {
        self.resource.set_kind(kind);
    }

    fn set_field_at_path(&mut self, path: &Path, value: Value) -> Result<(), FieldPathError> {
        self.resource.set_field_at_path(path, value)
    }

    fn content(&self) -> &Map {
        self.resource.content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Identity;
    use crate::value::from_json;

    #[test]
    fn test_desired_composed_serde() {
        let dc: DesiredComposed = serde_json::from_str(
            r#"{"resource":{"apiVersion":"nobu.dev/v1","kind":"Cluster","metadata":{"name":"c"}}}"#,
        )
        .unwrap();
        assert_eq!(dc.ready, Ready::Unspecified);
        assert_eq!(dc.identity(), Identity::new("c", "Cluster"));

        let json = serde_json::to_value(&dc).unwrap();
        assert_eq!(json["ready"], "Unspecified");
        assert_eq!(json["resource"]["kind"], "Cluster");
    }

    #[test]
    fn test_composite_delegates_to_resource() {
        let mut xr = Composite::default();
        xr.set_api_version("example.org/v1");
        xr.set_kind("XR");
        assert_eq!(xr.resource.api_version(), "example.org/v1");
        assert_eq!(xr.identity(), Identity::new("", "XR"));
        assert_eq!(
            Value::Map(xr.content().clone()),
            from_json(r#"{"apiVersion":"example.org/v1","kind":"XR"}"#).unwrap()
        );
    }

    #[test]
    fn test_names_sort_by_key() {
        let mut desired = DesiredComposedResources::new();
        desired.insert(Name::from("b"), DesiredComposed::default());
        desired.insert(Name::from("a"), DesiredComposed::default());
        let keys: Vec<&str> = desired.keys().map(Name::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
