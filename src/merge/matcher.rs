//! Pairing of generated documents with existing resources.

use std::collections::HashMap;

use crate::error::{FunctionError, Result};
use crate::resource::{DesiredComposedResources, FieldTarget, Identity, Name};
use crate::value::Map;

/// MatchSet maps each matched resource to the documents assigned to it.
///
/// Resources appear in the order their first document arrived; documents
/// keep their arrival order per resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSet {
    entries: Vec<(Name, Vec<Map>)>,
    // Position of each name in `entries`.
    positions: HashMap<Name, usize>,
}

impl MatchSet {
    /// Creates a new empty MatchSet.
    pub fn new() -> Self {
        MatchSet::default()
    }

    fn push(&mut self, name: &Name, document: Map) {
        match self.positions.get(name) {
            Some(&at) => self.entries[at].1.push(document),
            None => {
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push((name.clone(), vec![document]));
            }
        }
    }

    /// Returns the number of matched resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the total number of assigned documents.
    pub fn document_count(&self) -> usize {
        self.entries.iter().map(|(_, docs)| docs.len()).sum()
    }

    /// Returns the documents assigned to a resource.
    pub fn get(&self, name: &Name) -> Option<&[Map]> {
        self.positions
            .get(name)
            .map(|&at| self.entries[at].1.as_slice())
    }

    /// Returns an iterator over matched resources and their documents.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &[Map])> {
        self.entries.iter().map(|(n, docs)| (n, docs.as_slice()))
    }
}

impl IntoIterator for MatchSet {
    type Item = (Name, Vec<Map>);
    type IntoIter = std::vec::IntoIter<(Name, Vec<Map>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Assigns every document to the desired resource with the same
/// `metadata.name` and `kind`.
///
/// The batch either matches completely or fails: a single unmatched
/// document yields [`FunctionError::IncompleteMatch`]. When two resources
/// share an identity, the one with the lowest key wins.
pub fn match_resources(desired: &DesiredComposedResources, documents: &[Map]) -> Result<MatchSet> {
    let mut index: HashMap<Identity, &Name> = HashMap::with_capacity(desired.len());
    for (name, resource) in desired {
        index.entry(resource.identity()).or_insert(name);
    }

    let mut matches = MatchSet::new();
    let mut unmatched = Vec::new();
    for document in documents {
        let identity = Identity::of(document);
        match index.get(&identity) {
            Some(name) => matches.push(name, document.clone()),
            None => unmatched.push(identity.to_string()),
        }
    }

    let matched = matches.document_count();
    if matched != documents.len() {
        return Err(FunctionError::IncompleteMatch {
            matched,
            total: documents.len(),
            unmatched,
        });
    }
    Ok(matches)
}
