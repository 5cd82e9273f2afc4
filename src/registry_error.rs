use thiserror::Error;

use crate::{BoxError, Kind};

/// Errors returned by registry operations.
///
/// Every lookup is fallible. `InvalidArgument`, `NoConstructor`, `AccessDenied`
/// and the type mismatches point at a configuration bug; `ConstructionFailed` is a
/// failure of the factory itself and may be retried.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The kind cannot identify a singleton (e.g. an empty name).
    #[error("invalid kind: {reason}")]
    InvalidArgument { reason: &'static str },

    /// No zero-argument factory is registered for the kind.
    #[error("no constructor registered for `{kind}`")]
    NoConstructor { kind: Kind },

    /// The factory ran and failed. The kind stays unregistered.
    #[error("constructing `{kind}` failed: {source}")]
    ConstructionFailed {
        kind: Kind,
        #[source]
        source: BoxError,
    },

    /// A factory exists but is not invocable by the registry.
    #[error("constructor for `{kind}` is not accessible to the registry")]
    AccessDenied { kind: Kind },

    /// The instance for the kind is not of the requested type.
    #[error("`{kind}` does not hold a `{expected}`")]
    TypeMismatch { kind: Kind, expected: &'static str },

    /// A factory registered for a type kind builds some other type.
    #[error("factory for `{kind}` produces `{produces}`")]
    FactoryTypeMismatch { kind: Kind, produces: &'static str },
}

impl RegistryError {
    /// The kind the error refers to, if any.
    pub fn kind(&self) -> Option<&Kind> {
        match self {
            RegistryError::InvalidArgument { .. } => None,
            RegistryError::NoConstructor { kind }
            | RegistryError::ConstructionFailed { kind, .. }
            | RegistryError::AccessDenied { kind }
            | RegistryError::TypeMismatch { kind, .. }
            | RegistryError::FactoryTypeMismatch { kind, .. } => Some(kind),
        }
    }
}
