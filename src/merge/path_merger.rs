//! Decomposition of documents into field-path assignments.

use crate::error::{FunctionError, Result};
use crate::fieldpath::{FieldPathError, Path, PathElement};
use crate::resource::FieldTarget;
use crate::value::{Map, Value};

/// Assignment is a single leaf write produced by walking a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: Path,
    pub value: Value,
}

/// Walks `document` and returns one assignment per scalar leaf.
///
/// Map entries extend the path with their key, list items with their index.
/// Empty maps and lists produce nothing. Map keys are visited in sorted
/// order, list items in order.
pub fn decompose(document: &Value, base: &Path) -> Vec<Assignment> {
    let mut out = Vec::new();
    walk(document, base, &mut out);
    out
}

/// Same as [`decompose`] for a top-level object.
pub fn decompose_object(object: &Map, base: &Path) -> Vec<Assignment> {
    let mut out = Vec::new();
    walk_map(object, base, &mut out);
    out
}

fn walk_map(map: &Map, path: &Path, out: &mut Vec<Assignment>) {
    for (key, child) in map.iter() {
        walk(child, &path.with(PathElement::field(key.as_str())), out);
    }
}

fn walk(value: &Value, path: &Path, out: &mut Vec<Assignment>) {
    match value {
        Value::Map(map) => walk_map(map, path, out),
        Value::List(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(child, &path.with(PathElement::index(i)), out);
            }
        }
        leaf => out.push(Assignment {
            path: path.clone(),
            value: leaf.clone(),
        }),
    }
}

/// Writes one assignment to a target.
///
/// Top-level `apiVersion` and `kind` go through their dedicated setters and
/// must be strings; every other path is a plain field write.
pub fn assign<T: FieldTarget + ?Sized>(target: &mut T, assignment: &Assignment) -> Result<()> {
    let Assignment { path, value } = assignment;
    let result = if path.is_top_level_field("apiVersion") {
        string_leaf(path, value).map(|v| target.set_api_version(v))
    } else if path.is_top_level_field("kind") {
        string_leaf(path, value).map(|v| target.set_kind(v))
    } else {
        target.set_field_at_path(path, value.clone())
    };
    result.map_err(|source| FunctionError::FieldSet {
        path: path.to_string(),
        value: value.to_string(),
        source,
    })
}

fn string_leaf<'a>(path: &Path, value: &'a Value) -> Result<&'a str, FieldPathError> {
    value.as_str().ok_or_else(|| FieldPathError::NotAString {
        path: path.to_string(),
        found: value.type_name().to_string(),
    })
}

/// Applies a document onto a target.
///
/// All assignments are written to a scratch copy of the target first; the
/// target is only replaced once every assignment has succeeded, so a failed
/// apply leaves it untouched.
pub fn apply<T: FieldTarget + Clone>(document: &Value, base: &Path, target: &mut T) -> Result<()> {
    commit(&decompose(document, base), target)
}

/// Same as [`apply`] for a top-level object.
pub fn apply_object<T: FieldTarget + Clone>(object: &Map, base: &Path, target: &mut T) -> Result<()> {
    commit(&decompose_object(object, base), target)
}

fn commit<T: FieldTarget + Clone>(assignments: &[Assignment], target: &mut T) -> Result<()> {
    let mut scratch = target.clone();
    for assignment in assignments {
        assign(&mut scratch, assignment)?;
    }
    *target = scratch;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldpath::parse;
    use crate::resource::{Composite, Identity, Unstructured};
    use crate::value::from_json;
    use pretty_assertions::assert_eq;

    fn doc(json: &str) -> Value {
        from_json(json).unwrap()
    }

    #[test]
    fn test_decompose_paths() {
        let document = doc(
            r#"{"kind":"Deployment","spec":{"template":{"spec":{"containers":[{"name":"echoserver"}]}}}}"#,
        );
        let paths: Vec<String> = decompose(&document, &Path::new())
            .iter()
            .map(|a| a.path.to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["kind", "spec.template.spec.containers[0].name"]
        );
    }

    #[test]
    fn test_decompose_with_base() {
        let base = parse("spec.forProvider").unwrap();
        let assignments = decompose(&doc(r#"{"region":"us-east-2"}"#), &base);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].path.to_string(), "spec.forProvider.region");
    }

    #[test]
    fn test_empty_containers_are_inert() {
        let document = doc(r#"{"metadata":{"labels":{}},"spec":{"items":[]}}"#);
        assert!(decompose(&document, &Path::new()).is_empty());

        let mut target = Unstructured::from_value(doc(r#"{"metadata":{"labels":{"a":"b"}}}"#)).unwrap();
        let before = target.clone();
        apply(&document, &Path::new(), &mut target).unwrap();
        assert_eq!(target, before);
    }

    #[test]
    fn test_apply_composite_scenario() {
        let document = doc(
            r#"{
                "apiVersion": "eks.nobu.dev/v1beta",
                "kind": "XNodepool",
                "metadata": {"name": "TestNodepool"},
                "spec": {"parameters": {"region": "us-east-2"}}
            }"#,
        );
        let mut xr = Composite::default();
        apply(&document, &Path::new(), &mut xr).unwrap();

        assert_eq!(xr.resource.api_version(), "eks.nobu.dev/v1beta");
        assert_eq!(xr.resource.kind(), "XNodepool");
        assert_eq!(xr.identity(), Identity::new("TestNodepool", "XNodepool"));
        assert_eq!(
            xr.resource.get_value(&parse("spec.parameters.region").unwrap()),
            Some(&Value::from("us-east-2"))
        );
    }

    #[test]
    fn test_round_trip_scalar_leaves() {
        let document = doc(
            r#"{
                "metadata": {"name": "basic", "annotations": {"prometheus.io/port": "7080"}},
                "spec": {"replicas": 1, "ratio": 0.25, "paused": false, "note": null,
                         "ports": [80, 443], "matrix": [[1, 2], [3]]}
            }"#,
        );
        let mut target = Unstructured::new();
        apply(&document, &Path::new(), &mut target).unwrap();

        for assignment in decompose(&document, &Path::new()) {
            assert_eq!(
                target.get_value(&assignment.path),
                Some(&assignment.value),
                "path {}",
                assignment.path
            );
        }
        assert_eq!(Value::Map(target.into_content()), document);
    }

    #[test]
    fn test_apply_overwrites_leaves_and_keeps_siblings() {
        let mut target = Unstructured::from_value(doc(
            r#"{"apiVersion":"v1","kind":"ConfigMap","data":{"a":"1","b":"2"}}"#,
        ))
        .unwrap();
        apply(&doc(r#"{"data":{"b":"3","c":"4"}}"#), &Path::new(), &mut target).unwrap();
        assert_eq!(
            Value::Map(target.into_content()),
            doc(r#"{"apiVersion":"v1","kind":"ConfigMap","data":{"a":"1","b":"3","c":"4"}}"#)
        );
    }

    #[test]
    fn test_apply_failure_leaves_target_untouched() {
        let mut target = Unstructured::from_value(doc(r#"{"spec":"flat","status":{}}"#)).unwrap();
        let before = target.clone();
        // "metadata" sorts before "spec", so it would be written first.
        let err = apply(
            &doc(r#"{"metadata":{"name":"x"},"spec":{"replicas":2}}"#),
            &Path::new(),
            &mut target,
        )
        .unwrap_err();

        match err {
            FunctionError::FieldSet { path, value, .. } => {
                assert_eq!(path, "spec.replicas");
                assert_eq!(value, "2");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(target, before);
    }

    #[test]
    fn test_kind_must_be_a_string() {
        let mut target = Unstructured::new();
        let err = apply(&doc(r#"{"kind":7}"#), &Path::new(), &mut target).unwrap_err();
        assert!(matches!(
            err,
            FunctionError::FieldSet {
                source: FieldPathError::NotAString { .. },
                ..
            }
        ));
        assert_eq!(target.content(), &Map::new());
    }

    #[test]
    fn test_nested_kind_is_a_plain_field() {
        let mut target = Unstructured::new();
        apply(&doc(r#"{"spec":{"kind":7}}"#), &Path::new(), &mut target).unwrap();
        assert_eq!(target.kind(), "");
        assert_eq!(target.get_value(&parse("spec.kind").unwrap()), Some(&Value::Int(7)));
    }
}
