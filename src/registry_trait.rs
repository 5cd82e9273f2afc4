//! Core trait defining registry behavior.
//!
//! This module provides the `RegistryApi` trait with default implementations for
//! lazy, construct-once lookup of singleton instances, factory registration, and
//! tracing.
//!
//! Each kind maps to at most one instance. Once stored, an instance is never
//! replaced; only [`RegistryApi::reset_all`] drops instances, and it drops all of
//! them.

use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use crate::store::Resolved;
use crate::{
    BoxError, Factory, Instance, Kind, RegistryError, RegistryEvent, Singleton, Snapshot, Store,
    Visibility,
};

/// Static holding a registry's [`Store`].
pub type Storage = LazyLock<Store>;

/// Static holding a registry's trace callback.
pub type TraceCallback = LazyLock<Tracer>;

type Callback = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

/// Slot for an optional user-supplied event callback.
#[derive(Default)]
pub struct Tracer {
    callback: Mutex<Option<Callback>>,
}

impl Tracer {
    fn set(&self, callback: Callback) {
        *self.callback.lock() = Some(callback);
    }

    fn clear(&self) {
        *self.callback.lock() = None;
    }

    fn emit(&self, event: &RegistryEvent) {
        // release the slot before calling out so the callback may touch the registry
        let callback = self.callback.lock().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// two accessor methods (`storage` and `trace`) to be implemented by the implementor.
///
/// # Reentrancy
///
/// A factory must not request a kind from the same registry that has no instance
/// yet. Construction holds one non-reentrant lock for the whole registry, so such
/// a call deadlocks.
pub trait RegistryApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback static.
    fn trace() -> &'static TraceCallback;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked for every registry operation, after the operation
    /// has released the storage locks.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        Self::trace().set(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Does not affect stored instances or factories.
    fn clear_trace_callback(&self) {
        Self::trace().clear();
    }

    /// Emit a registry event to the current callback, if any.
    fn emit_event(&self, event: &RegistryEvent) {
        Self::trace().emit(event);
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Access the storage static.
    fn storage() -> &'static Storage;

    /// Install the construction capability for `kind`.
    ///
    /// Replaces a previously registered factory. Instances that already exist are
    /// not affected.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty named kind
    /// - `FactoryTypeMismatch` when `kind` is a type tag and the factory produces another type
    fn register_factory(&self, kind: Kind, factory: Factory) -> Result<(), RegistryError> {
        kind.validate()?;

        if let Some(id) = kind.type_id() {
            if id != factory.produces_type() {
                return Err(RegistryError::FactoryTypeMismatch {
                    kind,
                    produces: factory.produces(),
                });
            }
        }

        tracing::debug!(kind = %kind, produces = factory.produces(), "registered singleton factory");
        self.emit_event(&RegistryEvent::RegisterFactory { kind: kind.clone() });
        Self::storage().set_factory(kind, factory);
        Ok(())
    }

    /// Install `T::default` as the factory for `Kind::of::<T>()`.
    fn register_default<T: Default + Send + Sync + 'static>(&self) {
        let kind = Kind::of::<T>();
        tracing::debug!(kind = %kind, "registered default factory");
        self.emit_event(&RegistryEvent::RegisterFactory { kind: kind.clone() });
        Self::storage().set_factory(kind, Factory::from_default::<T>());
    }

    /// Return the instance for `kind`, constructing it on first use.
    ///
    /// Existing instances are served from a read lock. Otherwise the kind's
    /// factory runs under the registry's construction lock, at most once even
    /// when several threads ask for the same kind at the same time.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty named kind
    /// - `NoConstructor` when no factory is registered for `kind`
    /// - `AccessDenied` when the factory is [`Visibility::Restricted`]
    /// - `ConstructionFailed` when the factory fails; nothing is stored and the
    ///   next call runs the factory again
    fn get_instance(&self, kind: &Kind) -> Result<Instance, RegistryError> {
        kind.validate()?;

        if let Some(instance) = self.lookup(kind) {
            return Ok(instance);
        }

        let factory = Self::storage()
            .factory(kind)
            .ok_or_else(|| RegistryError::NoConstructor { kind: kind.clone() })?;

        if factory.visibility() == Visibility::Restricted {
            return Err(RegistryError::AccessDenied { kind: kind.clone() });
        }

        resolve(self, kind, || factory.invoke())
    }

    /// Typed [`get_instance`](RegistryApi::get_instance) for `Kind::of::<T>()`.
    ///
    /// # Errors
    ///
    /// Same as `get_instance`.
    fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        self.get_as(&Kind::of::<T>())
    }

    /// [`get_instance`](RegistryApi::get_instance) downcast to `T`.
    ///
    /// # Errors
    ///
    /// Same as `get_instance`, plus `TypeMismatch` when the instance is not a `T`.
    fn get_as<T: Send + Sync + 'static>(&self, kind: &Kind) -> Result<Arc<T>, RegistryError> {
        let instance = self.get_instance(kind)?;
        downcast(kind, instance)
    }

    /// Return the instance of `T`, constructing it with [`Singleton::construct`]
    /// on first use.
    ///
    /// # Errors
    ///
    /// `ConstructionFailed` when `T::construct` fails; nothing is stored.
    fn instance<T: Singleton>(&self) -> Result<Arc<T>, RegistryError> {
        let kind = Kind::of::<T>();

        let instance = match self.lookup(&kind) {
            Some(instance) => instance,
            None => resolve(self, &kind, || {
                T::construct().map(|value| Arc::new(value) as Instance)
            })?,
        };

        downcast(&kind, instance)
    }

    #[doc(hidden)]
    fn lookup(&self, kind: &Kind) -> Option<Instance> {
        let instance = Self::storage().lookup(kind);
        let found = instance.is_some();

        if found {
            tracing::trace!(kind = %kind, "singleton already constructed");
        }
        self.emit_event(&RegistryEvent::Get {
            kind: kind.clone(),
            found,
        });

        instance
    }

    /// Check whether an instance of `kind` currently exists.
    ///
    /// An empty named kind can never hold an instance and is reported as absent.
    fn contains(&self, kind: &Kind) -> bool {
        let found = Self::storage().contains(kind);

        self.emit_event(&RegistryEvent::Contains {
            kind: kind.clone(),
            found,
        });

        found
    }

    /// Copy of the current kind → instance mapping.
    fn snapshot(&self) -> Snapshot {
        Self::storage().snapshot()
    }

    /// Drop every stored instance.
    ///
    /// Intended for isolating tests. The next lookup of any kind constructs a
    /// fresh instance. Does NOT affect:
    /// - Already-retrieved `Arc` handles (they remain valid)
    /// - Registered factories
    /// - The tracing callback (use `clear_trace_callback()` to clear that)
    fn reset_all(&self) {
        self.emit_event(&RegistryEvent::Clear {});
        tracing::debug!("resetting singleton registry");
        Self::storage().clear();
    }
}

fn resolve<R, F>(registry: &R, kind: &Kind, construct: F) -> Result<Instance, RegistryError>
where
    R: RegistryApi + ?Sized,
    F: FnOnce() -> Result<Instance, BoxError>,
{
    match R::storage().get_or_construct(kind, construct) {
        Ok(Resolved::Constructed(instance)) => {
            tracing::debug!(kind = %kind, "constructed singleton");
            registry.emit_event(&RegistryEvent::Construct { kind: kind.clone() });
            Ok(instance)
        }
        Ok(resolved) => Ok(resolved.into_instance()),
        Err(err) => {
            tracing::warn!(kind = %kind, error = %err, "singleton construction failed");
            registry.emit_event(&RegistryEvent::ConstructFailed { kind: kind.clone() });
            Err(err)
        }
    }
}

fn downcast<T: Send + Sync + 'static>(kind: &Kind, instance: Instance) -> Result<Arc<T>, RegistryError> {
    instance
        .downcast::<T>()
        .map_err(|_| RegistryError::TypeMismatch {
            kind: kind.clone(),
            expected: std::any::type_name::<T>(),
        })
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{RegistryApi, Storage, TraceCallback, Tracer};
    use crate::{BoxError, Factory, Kind, RegistryError, Singleton, Store};

    use serial_test::serial;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::{Arc, LazyLock, Mutex};

    static STORAGE: Storage = LazyLock::new(Store::new);
    static TRACE: TraceCallback = LazyLock::new(Tracer::default);

    struct Api;

    impl RegistryApi for Api {
        fn storage() -> &'static Storage {
            &STORAGE
        }

        fn trace() -> &'static TraceCallback {
            &TRACE
        }
    }

    const API: Api = Api;

    struct IntegerBox {
        a: AtomicI32,
    }

    impl Singleton for IntegerBox {
        fn construct() -> Result<Self, BoxError> {
            Ok(IntegerBox {
                a: AtomicI32::new(1),
            })
        }
    }

    fn record_events() -> Arc<Mutex<Vec<String>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        API.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(format!("{}", e));
        });
        events
    }

    #[test]
    #[serial]
    fn test_instance_is_shared() -> Result<(), RegistryError> {
        API.reset_all();

        let first = API.instance::<IntegerBox>()?;
        assert_eq!(first.a.load(Ordering::SeqCst), 1);
        first.a.store(7, Ordering::SeqCst);

        let second = API.instance::<IntegerBox>()?;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.a.load(Ordering::SeqCst), 7);
        assert_eq!(API.snapshot().len(), 1);

        Ok(())
    }

    #[test]
    #[serial]
    fn test_get_with_registered_factory() -> Result<(), RegistryError> {
        API.reset_all();
        API.register_factory(Kind::of::<String>(), Factory::new(|| "a".to_string()))?;

        let value: Arc<String> = API.get()?;
        assert_eq!(&*value, "a");
        assert!(Arc::ptr_eq(&value, &API.get::<String>()?));

        Ok(())
    }

    #[test]
    #[serial]
    fn test_register_default() {
        API.reset_all();
        API.register_default::<Vec<u32>>();

        let value = API.get::<Vec<u32>>().unwrap();
        assert!(value.is_empty());
    }

    #[test]
    #[serial]
    fn test_missing_constructor() {
        API.reset_all();

        for _ in 0..3 {
            let result = API.get::<(u8, u8)>();
            assert!(matches!(result, Err(RegistryError::NoConstructor { .. })));
        }
        assert!(!API.contains(&Kind::of::<(u8, u8)>()));
    }

    #[test]
    #[serial]
    fn test_empty_kind_is_rejected_without_mutation() {
        API.reset_all();
        let before = API.snapshot().len();

        for _ in 0..3 {
            let result = API.get_instance(&Kind::named(""));
            assert!(matches!(result, Err(RegistryError::InvalidArgument { .. })));
        }
        assert!(!API.contains(&Kind::named("")));

        let result = API.register_factory(Kind::named(" "), Factory::new(|| 1u8));
        assert!(matches!(result, Err(RegistryError::InvalidArgument { .. })));

        assert_eq!(API.snapshot().len(), before);
    }

    #[test]
    #[serial]
    fn test_restricted_factory_is_access_denied() {
        API.reset_all();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        API.register_factory(
            Kind::named("locked"),
            Factory::new(move || counter.fetch_add(1, Ordering::SeqCst)).restricted(),
        )
        .unwrap();

        let result = API.get_instance(&Kind::named("locked"));
        assert!(matches!(result, Err(RegistryError::AccessDenied { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    #[serial]
    fn test_factory_type_must_match_type_kind() {
        API.reset_all();
        let err = API
            .register_factory(Kind::of::<u32>(), Factory::new(|| 1u64))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::FactoryTypeMismatch {
                produces: "u64",
                ..
            }
        ));
        assert_eq!(err.to_string(), "factory for `u32` produces `u64`");
        assert!(matches!(
            API.get::<u32>(),
            Err(RegistryError::NoConstructor { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_get_as_wrong_type() {
        API.reset_all();
        API.register_factory(Kind::named("port"), Factory::new(|| 8080u16))
            .unwrap();

        assert_eq!(*API.get_as::<u16>(&Kind::named("port")).unwrap(), 8080);
        assert!(matches!(
            API.get_as::<u32>(&Kind::named("port")),
            Err(RegistryError::TypeMismatch { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_failed_construction_is_retryable() {
        API.reset_all();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        API.register_factory(
            Kind::named("flaky"),
            Factory::fallible(move || {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("first attempt fails")
                } else {
                    Ok(5i64)
                }
            }),
        )
        .unwrap();

        let err = API.get_instance(&Kind::named("flaky")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "constructing `flaky` failed: first attempt fails"
        );
        assert!(!API.snapshot().contains(&Kind::named("flaky")));

        let value = API.get_as::<i64>(&Kind::named("flaky")).unwrap();
        assert_eq!(*value, 5);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[serial]
    fn test_reset_then_reconstruct() {
        API.reset_all();
        let before = API.instance::<IntegerBox>().unwrap();
        before.a.store(99, Ordering::SeqCst);

        API.reset_all();
        assert!(API.snapshot().is_empty());

        let after = API.instance::<IntegerBox>().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.a.load(Ordering::SeqCst), 1);
        // handles taken before the reset stay valid
        assert_eq!(before.a.load(Ordering::SeqCst), 99);
    }

    #[test]
    #[serial]
    fn test_trace_construct_then_hit() {
        API.reset_all();
        API.register_default::<u8>();
        let events = record_events();

        let _ = API.get::<u8>();
        let _ = API.get::<u8>();

        API.clear_trace_callback();
        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "get { kind: u8, found: false }",
                "construct { kind: u8 }",
                "get { kind: u8, found: true }",
            ]
        );
    }

    #[test]
    #[serial]
    fn test_trace_failed_construction() {
        API.reset_all();
        API.register_factory(
            Kind::named("broken"),
            Factory::fallible(|| Err::<u8, _>("nope")),
        )
        .unwrap();
        let events = record_events();

        let _ = API.get_instance(&Kind::named("broken"));

        API.clear_trace_callback();
        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "get { kind: broken, found: false }",
                "construct_failed { kind: broken }",
            ]
        );
    }

    #[test]
    #[serial]
    fn test_trace_callback_clear_event() {
        API.reset_all();
        let events = record_events();

        API.reset_all();

        API.clear_trace_callback();
        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0], "Clearing the Registry");
    }

    #[test]
    #[serial]
    fn test_callback_may_query_registry() {
        API.reset_all();
        API.register_default::<u16>();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();

        API.set_trace_callback(move |event| {
            if let crate::RegistryEvent::Construct { kind } = event {
                let snapshot = API.snapshot();
                assert!(snapshot.contains(kind));
                seen_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        API.get::<u16>().unwrap();
        API.clear_trace_callback();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
