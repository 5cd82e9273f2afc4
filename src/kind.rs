//! Identifiers for singleton categories.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::RegistryError;

/// Identifies one singleton category in a registry.
///
/// A kind is either a type tag (`Kind::of::<T>()`) or an explicit string key
/// (`Kind::named("...")`). Each kind maps to at most one instance.
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::Kind;
///
/// assert_eq!(Kind::of::<u32>(), Kind::of::<u32>());
/// assert_ne!(Kind::of::<u32>(), Kind::of::<u64>());
/// assert_eq!(Kind::named("cache").to_string(), "cache");
/// ```
#[derive(Clone, Debug)]
pub enum Kind {
    /// Keyed by the Rust type of the instance.
    Type {
        /// Identity used for equality and hashing.
        id: TypeId,
        /// Type name, for diagnostics only.
        name: &'static str,
    },

    /// Keyed by an explicit name.
    Named(Cow<'static, str>),
}

impl Kind {
    /// Type tag for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Kind::Type {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Explicit string key.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Kind::Named(name.into())
    }

    /// Human readable name: the type name or the explicit key.
    pub fn name(&self) -> &str {
        match self {
            Kind::Type { name, .. } => name,
            Kind::Named(name) => name,
        }
    }

    /// The `TypeId` behind a type tag, `None` for named kinds.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Kind::Type { id, .. } => Some(*id),
            Kind::Named(_) => None,
        }
    }

    /// Rejects kinds that cannot identify anything.
    ///
    /// # Errors
    ///
    /// `RegistryError::InvalidArgument` for a named kind that is empty or only whitespace.
    pub fn validate(&self) -> Result<(), RegistryError> {
        match self {
            Kind::Named(name) if name.trim().is_empty() => Err(RegistryError::InvalidArgument {
                reason: "kind name is empty",
            }),
            _ => Ok(()),
        }
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Kind::Type { id: a, .. }, Kind::Type { id: b, .. }) => a == b,
            (Kind::Named(a), Kind::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Kind::Type { id, .. } => {
                state.write_u8(0);
                id.hash(state);
            }
            Kind::Named(name) => {
                state.write_u8(1);
                name.hash(state);
            }
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
