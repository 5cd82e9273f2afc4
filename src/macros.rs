//! Macros for creating singleton registries.
//!
//! This module provides a simple macro-based approach to declare isolated,
//! thread-safe registries of lazily constructed singletons.

/// Creates a complete singleton registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Storage static (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `RegistryApi`, and an `API` constant
/// - Free functions mirroring every `RegistryApi` operation
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::{define_registry, Factory, Kind};
/// use std::sync::Arc;
///
/// define_registry!(services);
///
/// services::register_factory(Kind::named("greeting"), Factory::new(|| "hello".to_string()))
///     .unwrap();
///
/// let first: Arc<String> = services::get_as(&Kind::named("greeting")).unwrap();
/// let second: Arc<String> = services::get_as(&Kind::named("greeting")).unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(services::snapshot().len(), 1);
/// ```
///
/// # Multiple Registries
///
/// Each registry owns its instances, factories and trace callback:
///
/// ```rust
/// use lazy_singleton_registry::define_registry;
/// use std::sync::Arc;
///
/// define_registry!(left);
/// define_registry!(right);
///
/// left::register_default::<Vec<u8>>();
/// right::register_default::<Vec<u8>>();
///
/// let a: Arc<Vec<u8>> = left::get().unwrap();
/// let b: Arc<Vec<u8>> = right::get().unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
/// ```
#[macro_export]
macro_rules! define_registry {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            // Instances and factories (module-private)
            static STORAGE: $crate::Storage = LazyLock::new($crate::Store::new);

            // Trace callback storage (module-private)
            static TRACE: $crate::TraceCallback = LazyLock::new($crate::Tracer::default);

            /// Zero-sized type that implements the registry API.
            ///
            /// All registry operations are provided by the `RegistryApi` trait's
            /// default implementations. This struct only provides access to the statics.
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn storage() -> &'static $crate::Storage {
                    &STORAGE
                }

                fn trace() -> &'static $crate::TraceCallback {
                    &TRACE
                }
            }

            /// Constant for trait-based access to this registry.
            pub const API: Api = Api;

            /// Install the construction capability for `kind`.
            pub fn register_factory(
                kind: $crate::Kind,
                factory: $crate::Factory,
            ) -> Result<(), $crate::RegistryError> {
                use $crate::RegistryApi;
                API.register_factory(kind, factory)
            }

            /// Install `T::default` as the factory for `T`.
            pub fn register_default<T: Default + Send + Sync + 'static>() {
                use $crate::RegistryApi;
                API.register_default::<T>()
            }

            /// Return the instance for `kind`, constructing it on first use.
            pub fn get_instance(kind: &$crate::Kind) -> Result<$crate::Instance, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.get_instance(kind)
            }

            /// Return the instance of `T`, constructing it with its registered factory on first use.
            pub fn get<T: Send + Sync + 'static>() -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.get::<T>()
            }

            /// Return the instance for `kind` as a `T`.
            pub fn get_as<T: Send + Sync + 'static>(
                kind: &$crate::Kind,
            ) -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.get_as::<T>(kind)
            }

            /// Return the instance of `T`, constructing it with `T::construct` on first use.
            pub fn instance<T: $crate::Singleton>() -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.instance::<T>()
            }

            /// Check whether an instance of `kind` currently exists.
            pub fn contains(kind: &$crate::Kind) -> bool {
                use $crate::RegistryApi;
                API.contains(kind)
            }

            /// Copy of the current kind to instance mapping.
            pub fn snapshot() -> $crate::Snapshot {
                use $crate::RegistryApi;
                API.snapshot()
            }

            /// Drop every stored instance. Intended for isolating tests.
            pub fn reset_all() {
                use $crate::RegistryApi;
                API.reset_all()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static) {
                use $crate::RegistryApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::RegistryApi;
                API.clear_trace_callback()
            }
        }
    };
}
