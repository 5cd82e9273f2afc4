use std::collections::HashMap;
use std::sync::Arc;

use crate::{Instance, Kind};

/// Point-in-time copy of a registry's kind → instance mapping.
///
/// Instances are shared with the registry (same `Arc`s), the mapping is not:
/// later constructions or a reset do not change a snapshot already taken.
#[derive(Clone, Default)]
pub struct Snapshot {
    entries: HashMap<Kind, Instance>,
}

impl Snapshot {
    pub(crate) fn new(entries: HashMap<Kind, Instance>) -> Self {
        Snapshot { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, kind: &Kind) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn get(&self, kind: &Kind) -> Option<&Instance> {
        self.entries.get(kind)
    }

    /// The instance for `kind` downcast to `T`; `None` if absent or of another type.
    pub fn get_as<T: Send + Sync + 'static>(&self, kind: &Kind) -> Option<Arc<T>> {
        self.entries.get(kind)?.clone().downcast::<T>().ok()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.entries.keys()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
