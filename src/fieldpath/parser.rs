//! Parsing of dotted/bracketed field path strings.
//!
//! Accepted forms:
//! - `spec.replicas` - dot separated field names
//! - `spec.containers[0]` - bracketed list index
//! - `metadata.annotations[prometheus.io/scrape]` - bracketed field name
//! - `metadata.labels["app"]` - quoted bracketed field name

use std::str::FromStr;

use super::path::{Path, PathElement};
use super::FieldPathError;

/// Parses a field path string into a [`Path`].
pub fn parse(s: &str) -> Result<Path, FieldPathError> {
    if s.is_empty() {
        return Err(FieldPathError::EmptyPath);
    }

    let invalid = |reason: &str| FieldPathError::InvalidPath {
        path: s.to_string(),
        reason: reason.to_string(),
    };

    let mut path = Path::new();
    let mut chars = s.char_indices().peekable();
    // Set after a `.` so that `a..b` and a trailing `.` are rejected.
    let mut expect_field = true;

    while let Some((start, c)) = chars.next() {
        match c {
            '.' => {
                if expect_field {
                    return Err(invalid("empty field name"));
                }
                expect_field = true;
            }
            '[' => {
                if expect_field && !path.is_empty() {
                    return Err(invalid("unexpected '[' after '.'"));
                }
                let mut end = None;
                for (i, ch) in chars.by_ref() {
                    if ch == ']' {
                        end = Some(i);
                        break;
                    }
                }
                let end = end.ok_or_else(|| invalid("unterminated '['"))?;
                path.push(bracket_element(&s[start + 1..end]).ok_or_else(|| invalid("empty brackets"))?);
                expect_field = false;
            }
            ']' => return Err(invalid("unexpected ']'")),
            _ => {
                if !expect_field {
                    return Err(invalid("expected '.' or '[' between segments"));
                }
                let mut end = s.len();
                while let Some(&(i, ch)) = chars.peek() {
                    if ch == '.' || ch == '[' || ch == ']' {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                path.push(PathElement::field(&s[start..end]));
                expect_field = false;
            }
        }
    }

    if expect_field {
        return Err(invalid("trailing '.'"));
    }
    Ok(path)
}

fn bracket_element(content: &str) -> Option<PathElement> {
    if content.is_empty() {
        return None;
    }
    if content.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = content.parse::<usize>() {
            return Some(PathElement::index(i));
        }
    }
    let unquoted = content
        .strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .or_else(|| content.strip_prefix('\'').and_then(|c| c.strip_suffix('\'')))
        .unwrap_or(content);
    Some(PathElement::field(unquoted))
}

impl FromStr for Path {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> PathElement {
        PathElement::field(name)
    }

    #[test]
    fn test_parse_dotted() {
        let path = parse("spec.parameters.region").unwrap();
        assert_eq!(
            path,
            Path::from_elements(vec![field("spec"), field("parameters"), field("region")])
        );
    }

    #[test]
    fn test_parse_indices() {
        let path = parse("spec.template.spec.containers[0].name").unwrap();
        assert_eq!(
            path.as_slice(),
            &[
                field("spec"),
                field("template"),
                field("spec"),
                field("containers"),
                PathElement::index(0),
                field("name"),
            ]
        );
        assert_eq!(parse("items[1][2]").unwrap().len(), 3);
    }

    #[test]
    fn test_parse_bracketed_keys() {
        let path = parse("metadata.annotations[prometheus.io/scrape]").unwrap();
        assert_eq!(path.as_slice()[2], field("prometheus.io/scrape"));

        let quoted = parse(r#"metadata.labels["app.kubernetes.io/name"]"#).unwrap();
        assert_eq!(quoted.as_slice()[2], field("app.kubernetes.io/name"));
    }

    #[test]
    fn test_parse_roundtrips_display() {
        for s in [
            "apiVersion",
            "spec.containers[0].name",
            "metadata.annotations[prometheus.io/scrape]",
            "spec.matrix[1][0]",
        ] {
            assert_eq!(parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(""), Err(FieldPathError::EmptyPath)));
        for bad in ["a..b", "a.", ".a", "a[0", "a]", "a[]", "a.[0]", "a[0]b"] {
            assert!(
                matches!(parse(bad), Err(FieldPathError::InvalidPath { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }
}
