//! Zero-argument construction capabilities.
//!
//! A [`Factory`] is what the registry invokes the first time a kind is requested.
//! It is type-erased so closures, plain functions, `Default` impls and
//! [`Singleton::construct`](crate::Singleton::construct) can all sit in one table.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::Singleton;

/// Error produced by a failing factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A type-erased singleton instance as stored by the registry.
pub type Instance = Arc<dyn Any + Send + Sync>;

type Produce = dyn Fn() -> Result<Instance, BoxError> + Send + Sync;

/// Whether the registry may invoke a factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// The registry may call the factory.
    #[default]
    Public,
    /// The factory is known but the registry may not call it; lookups fail with
    /// `RegistryError::AccessDenied`.
    Restricted,
}

/// Zero-argument construction capability for one kind.
///
/// Factories may be called more than once: a failed construction leaves the kind
/// unregistered and the next lookup calls the factory again.
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::Factory;
///
/// let plain = Factory::new(|| 1u32);
/// let fallible = Factory::fallible(|| "42".parse::<u32>());
/// let defaulted = Factory::from_default::<Vec<u8>>();
///
/// assert_eq!(plain.produces(), "u32");
/// assert_eq!(fallible.produces(), "u32");
/// assert_eq!(defaulted.produces(), "alloc::vec::Vec<u8>");
/// ```
#[derive(Clone)]
pub struct Factory {
    produce: Arc<Produce>,
    produces: TypeId,
    type_name: &'static str,
    visibility: Visibility,
}

impl Factory {
    /// Factory from an infallible closure or function.
    pub fn new<T, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::erase::<T>(Arc::new(move || -> Result<Instance, BoxError> {
            Ok(Arc::new(f()))
        }))
    }

    /// Factory from a closure or function that may fail.
    pub fn fallible<T, E, F>(f: F) -> Self
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::erase::<T>(Arc::new(move || -> Result<Instance, BoxError> {
            match f() {
                Ok(value) => Ok(Arc::new(value)),
                Err(err) => Err(err.into()),
            }
        }))
    }

    /// Factory calling `T::default()`.
    pub fn from_default<T: Default + Send + Sync + 'static>() -> Self {
        Self::new(T::default)
    }

    /// Factory calling [`Singleton::construct`].
    pub fn of<T: Singleton>() -> Self {
        Self::fallible(T::construct)
    }

    /// Marks the factory as not invocable by the registry.
    pub fn restricted(mut self) -> Self {
        self.visibility = Visibility::Restricted;
        self
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Type name of the values this factory produces.
    pub fn produces(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn produces_type(&self) -> TypeId {
        self.produces
    }

    pub(crate) fn invoke(&self) -> Result<Instance, BoxError> {
        (self.produce)()
    }

    fn erase<T: 'static>(produce: Arc<Produce>) -> Self {
        Factory {
            produce,
            produces: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            visibility: Visibility::Public,
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("produces", &self.type_name)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}
