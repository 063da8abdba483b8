//! Path element and path types.

use std::cmp::Ordering;
use std::fmt;

/// PathElement represents one level of path navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Field name for map fields.
    Field(String),
    /// Position in a list.
    Index(usize),
}

impl PathElement {
    /// Creates a new field name path element.
    pub fn field(name: impl Into<String>) -> Self {
        PathElement::Field(name.into())
    }

    /// Creates a new index path element.
    pub fn index(i: usize) -> Self {
        PathElement::Index(i)
    }

    /// Returns the field name if this is a field element.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            PathElement::Field(name) => Some(name),
            PathElement::Index(_) => None,
        }
    }

    /// Field names that would split or nest when rendered with dots
    /// have to be written in bracket form.
    fn needs_brackets(name: &str) -> bool {
        name.is_empty() || name.contains(['.', '[', ']'])
    }
}

impl PartialOrd for PathElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathElement {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PathElement::Field(a), PathElement::Field(b)) => a.cmp(b),
            (PathElement::Index(a), PathElement::Index(b)) => a.cmp(b),
            // Field names come before indices
            (PathElement::Field(_), PathElement::Index(_)) => Ordering::Less,
            (PathElement::Index(_), PathElement::Field(_)) => Ordering::Greater,
        }
    }
}

/// Path represents a complete path to a nested field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Creates a path from a vector of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    /// Returns the number of elements in the path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns an iterator over the path elements.
    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    /// Appends a path element.
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// Removes and returns the last path element.
    pub fn pop(&mut self) -> Option<PathElement> {
        self.elements.pop()
    }

    /// Creates a new path with the given element appended.
    pub fn with(&self, element: PathElement) -> Self {
        let mut new_path = self.clone();
        new_path.push(element);
        new_path
    }

    /// Returns a slice of the path elements.
    pub fn as_slice(&self) -> &[PathElement] {
        &self.elements
    }

    /// Returns the path made of the first `len` elements.
    pub fn prefix(&self, len: usize) -> Path {
        Path {
            elements: self.elements[..len.min(self.elements.len())].to_vec(),
        }
    }

    /// Returns true if this path is exactly the single top-level field `name`.
    pub fn is_top_level_field(&self, name: &str) -> bool {
        matches!(self.elements.as_slice(), [PathElement::Field(f)] if f == name)
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = PathElement;
    type IntoIter = std::vec::IntoIter<PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Field(name) if PathElement::needs_brackets(name) => write!(f, "[{}]", name),
            PathElement::Field(name) => write!(f, ".{}", name),
            PathElement::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Renders the path in dotted/bracketed form without a leading separator,
/// e.g. `spec.template.spec.containers[0].name`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                PathElement::Field(name) if i == 0 && !PathElement::needs_brackets(name) => {
                    write!(f, "{}", name)?
                }
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}
