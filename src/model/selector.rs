//! Column selection pushed down to storage

use std::collections::{BTreeMap, BTreeSet};

/// Which columns a scan returns.
///
/// An empty selector returns every column. A family added with
/// [`ColumnSelector::family`] returns all of its qualifiers; a family that
/// only has explicit columns returns just those.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSelector {
    families: BTreeMap<Vec<u8>, BTreeSet<Vec<u8>>>,
}

impl ColumnSelector {
    /// Selects every column
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds a whole family
    pub fn family(mut self, family: impl Into<Vec<u8>>) -> Self {
        self.families.entry(family.into()).or_default().clear();
        self
    }

    /// Adds one column
    pub fn column(mut self, family: impl Into<Vec<u8>>, qualifier: impl Into<Vec<u8>>) -> Self {
        let family = family.into();
        match self.families.get_mut(&family) {
            // whole family already selected
            Some(qualifiers) if qualifiers.is_empty() => {}
            Some(qualifiers) => {
                qualifiers.insert(qualifier.into());
            }
            None => {
                self.families
                    .insert(family, BTreeSet::from([qualifier.into()]));
            }
        }
        self
    }

    /// Returns true if no restriction is set
    pub fn is_all(&self) -> bool {
        self.families.is_empty()
    }

    /// Returns true if the column is selected
    pub fn selects(&self, family: &[u8], qualifier: &[u8]) -> bool {
        if self.families.is_empty() {
            return true;
        }
        match self.families.get(family) {
            Some(qualifiers) => qualifiers.is_empty() || qualifiers.contains(qualifier),
            None => false,
        }
    }
}
