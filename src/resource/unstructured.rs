//! Unstructured Kubernetes-style objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fieldpath::{self, FieldPathError, Path};
use crate::value::{Map, Value};

/// Identity of a resource: the pair a generated document is matched on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    pub name: String,
    pub kind: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Identity {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Reads `metadata.name` and `kind` from a document; absent fields are empty.
    pub fn of(object: &Map) -> Self {
        Identity {
            name: object.nested_str(&["metadata", "name"]).unwrap_or_default().to_string(),
            kind: object.nested_str(&["kind"]).unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.kind)
    }
}

/// FieldTarget is the capability set a document can be merged onto.
pub trait FieldTarget {
    /// Sets the object's `apiVersion`.
    fn set_api_version(&mut self, api_version: &str);

    /// Sets the object's `kind`.
    fn set_kind(&mut self, kind: &str);

    /// Writes a value at the given field path.
    fn set_field_at_path(&mut self, path: &Path, value: Value) -> Result<(), FieldPathError>;

    /// Returns a read-only view of the object's content.
    fn content(&self) -> &Map;

    /// Returns the object's (name, kind) identity.
    fn identity(&self) -> Identity {
        Identity::of(self.content())
    }
}

/// Unstructured is an object with no schema beyond `apiVersion`, `kind`
/// and `metadata.name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unstructured {
    object: Map,
}

impl Unstructured {
    /// Creates an empty object.
    pub fn new() -> Self {
        Unstructured::default()
    }

    /// Wraps an existing map.
    pub fn from_map(object: Map) -> Self {
        Unstructured { object }
    }

    /// Parses an object from a JSON or YAML value.
    ///
    /// Anything other than a mapping (including null) is rejected.
    pub fn from_value(value: Value) -> Result<Self, FieldPathError> {
        let found = value.type_name();
        value
            .into_map()
            .map(Unstructured::from_map)
            .ok_or_else(|| FieldPathError::not_an_object(&Path::new(), found))
    }

    pub fn api_version(&self) -> &str {
        self.object.nested_str(&["apiVersion"]).unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.object.nested_str(&["kind"]).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.object.nested_str(&["metadata", "name"]).unwrap_or_default()
    }

    /// Reads the value at a field path.
    pub fn get_value(&self, path: &Path) -> Option<&Value> {
        fieldpath::get_value(&self.object, path)
    }

    /// Returns the underlying map.
    pub fn unstructured_content(&self) -> &Map {
        &self.object
    }

    /// Consumes the object and returns the underlying map.
    pub fn into_content(self) -> Map {
        self.object
    }
}

impl FieldTarget for Unstructured {
    fn set_api_version(&mut self, api_version: &str) {
        self.object.set("apiVersion", Value::from(api_version));
    }

    fn set_kind(&mut self, kind: &str) {
        self.object.set("kind", Value::from(kind));
    }

    fn set_field_at_path(&mut self, path: &Path, value: Value) -> Result<(), FieldPathError> {
        fieldpath::set_value(&mut self.object, path, value)
    }

    fn content(&self) -> &Map {
        &self.object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldpath::parse;
    use crate::value::from_json;

    #[test]
    fn test_accessors() {
        let u = Unstructured::from_value(
            from_json(r#"{"apiVersion":"apps/v1","kind":"Deployment","metadata":{"name":"echoserver"}}"#)
                .unwrap(),
        )
        .unwrap();
        assert_eq!(u.api_version(), "apps/v1");
        assert_eq!(u.kind(), "Deployment");
        assert_eq!(u.name(), "echoserver");
        assert_eq!(u.identity(), Identity::new("echoserver", "Deployment"));
        assert_eq!(u.identity().to_string(), "echoserver:Deployment");
    }

    #[test]
    fn test_empty_accessors() {
        let u = Unstructured::new();
        assert_eq!(u.name(), "");
        assert_eq!(u.kind(), "");
        assert_eq!(u.identity(), Identity::default());
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Unstructured::from_value(Value::Null).is_err());
        assert!(Unstructured::from_value(Value::from("x")).is_err());
        assert!(Unstructured::from_value(Value::List(vec![])).is_err());
    }

    #[test]
    fn test_field_target() {
        let mut u = Unstructured::new();
        u.set_api_version("example.org/v1");
        u.set_kind("XR");
        u.set_field_at_path(&parse("metadata.name").unwrap(), Value::from("xr-1"))
            .unwrap();
        assert_eq!(u.identity(), Identity::new("xr-1", "XR"));
        assert_eq!(u.api_version(), "example.org/v1");
        assert_eq!(
            u.get_value(&parse("metadata.name").unwrap()),
            Some(&Value::from("xr-1"))
        );
    }
}
