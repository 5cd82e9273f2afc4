use std::sync::Arc;

use crate::{BoxError, RegistryApi, RegistryError};

/// A type that knows how to build its own singleton instance.
///
/// Implementing this trait is the compile-time alternative to registering a
/// [`Factory`](crate::Factory): `instance::<T>()` calls `T::construct` the first
/// time `T` is requested and never fails with `NoConstructor`.
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::{BoxError, Singleton};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicI32, Ordering};
///
/// struct Counter {
///     value: AtomicI32,
/// }
///
/// impl Singleton for Counter {
///     fn construct() -> Result<Self, BoxError> {
///         Ok(Counter { value: AtomicI32::new(1) })
///     }
/// }
///
/// let a = Counter::instance().unwrap();
/// a.value.store(7, Ordering::SeqCst);
///
/// let b = Counter::instance().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(b.value.load(Ordering::SeqCst), 7);
/// ```
pub trait Singleton: Send + Sync + Sized + 'static {
    /// Builds the instance. Called at most once per registry on success.
    fn construct() -> Result<Self, BoxError>;

    /// The shared instance from the process-wide default registry.
    fn instance() -> Result<Arc<Self>, RegistryError> {
        crate::global::API.instance::<Self>()
    }
}
