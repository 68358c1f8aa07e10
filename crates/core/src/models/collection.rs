use serde::{Deserialize, Serialize};

use super::resource::{ErrorMap, Resource, ResourceId};
use super::status::Status;

/// Per-kind slice of the state tree.
///
/// Replaced wholesale on every transition, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionState {
    pub status: Status,
    /// Server order; ids are unique but the sequence is not sorted.
    pub items: Vec<Resource>,
    /// Empty unless the last operation failed.
    pub errors: ErrorMap,
}

impl CollectionState {
    /// `{status: INITIAL, items: [], errors: {}}`
    pub fn initial() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn find(&self, id: ResourceId) -> Option<&Resource> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    #[must_use]
    pub fn contains(&self, id: ResourceId) -> bool {
        self.find(id).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
