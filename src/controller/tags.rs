//! Tag-set diffing for tag-aware saves.

use crate::domain::TagId;
use std::collections::BTreeSet;

/// The links to add and remove to move a note from one tag set to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChanges {
    pub add: Vec<TagId>,
    pub remove: Vec<TagId>,
}

impl TagChanges {
    /// Computes the symmetric difference between the current and desired tag ids.
    pub fn between(current: &BTreeSet<TagId>, desired: &BTreeSet<TagId>) -> Self {
        Self {
            add: desired.difference(current).copied().collect(),
            remove: current.difference(desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}
