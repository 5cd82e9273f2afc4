//! Backing storage shared by every registry implementation.
//!
//! Instances live behind a reader-friendly `RwLock` so existing singletons are
//! served without touching the construction lock. Construction itself is
//! serialized by one `Mutex` for all kinds, and the map is re-checked under it
//! before a factory runs.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use crate::{BoxError, Factory, Instance, Kind, RegistryError, Snapshot};

/// How a lookup-or-construct call was satisfied.
#[derive(Debug)]
pub(crate) enum Resolved {
    /// An instance was already present (possibly built by a racing caller).
    Existing(Instance),
    /// This call ran the factory and stored the result.
    Constructed(Instance),
}

impl Resolved {
    pub(crate) fn into_instance(self) -> Instance {
        match self {
            Resolved::Existing(instance) | Resolved::Constructed(instance) => instance,
        }
    }
}

/// Instances, factories and the construction lock of one registry.
///
/// Registries keep a `Store` in a `LazyLock` static and hand it out through
/// [`RegistryApi::storage`](crate::RegistryApi::storage).
#[derive(Default)]
pub struct Store {
    instances: RwLock<HashMap<Kind, Instance>>,
    factories: RwLock<HashMap<Kind, Factory>>,
    construction: Mutex<()>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lookup(&self, kind: &Kind) -> Option<Instance> {
        self.instances.read().get(kind).cloned()
    }

    pub(crate) fn contains(&self, kind: &Kind) -> bool {
        self.instances.read().contains_key(kind)
    }

    pub(crate) fn factory(&self, kind: &Kind) -> Option<Factory> {
        self.factories.read().get(kind).cloned()
    }

    pub(crate) fn set_factory(&self, kind: Kind, factory: Factory) {
        self.factories.write().insert(kind, factory);
    }

    /// Returns the instance for `kind`, running `construct` at most once.
    ///
    /// A failing `construct` leaves the map untouched. `construct` must not call
    /// back into the same store for a missing kind: the construction lock is not
    /// reentrant and the call deadlocks.
    pub(crate) fn get_or_construct<F>(
        &self,
        kind: &Kind,
        construct: F,
    ) -> Result<Resolved, RegistryError>
    where
        F: FnOnce() -> Result<Instance, BoxError>,
    {
        if let Some(instance) = self.lookup(kind) {
            return Ok(Resolved::Existing(instance));
        }

        let _guard = self.construction.lock();

        // another caller may have finished while we waited for the lock
        if let Some(instance) = self.lookup(kind) {
            return Ok(Resolved::Existing(instance));
        }

        let instance = construct().map_err(|source| RegistryError::ConstructionFailed {
            kind: kind.clone(),
            source,
        })?;

        self.instances
            .write()
            .insert(kind.clone(), instance.clone());

        Ok(Resolved::Constructed(instance))
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.instances.read().clone())
    }

    /// Drops every instance. Factories stay registered.
    pub(crate) fn clear(&self) {
        let _guard = self.construction.lock();
        self.instances.write().clear();
    }
}
