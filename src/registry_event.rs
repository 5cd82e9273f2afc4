use crate::Kind;

/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::{Kind, RegistryEvent};
///
/// let event = RegistryEvent::Construct { kind: Kind::of::<i32>() };
/// assert_eq!(event.to_string(), "construct { kind: i32 }");
/// ```
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// A factory was installed for a kind.
    RegisterFactory { kind: Kind },

    /// An instance was requested.
    Get {
        kind: Kind,
        /// Whether an instance already existed.
        found: bool,
    },

    /// A factory ran and its instance was stored.
    Construct { kind: Kind },

    /// A factory ran and failed; nothing was stored.
    ConstructFailed { kind: Kind },

    /// An existence check was performed.
    Contains { kind: Kind, found: bool },

    /// The registry was reset.
    Clear {},
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::RegisterFactory { kind } => {
                write!(f, "register_factory {{ kind: {} }}", kind)
            }
            RegistryEvent::Get { kind, found } => {
                write!(f, "get {{ kind: {}, found: {} }}", kind, found)
            }
            RegistryEvent::Construct { kind } => write!(f, "construct {{ kind: {} }}", kind),
            RegistryEvent::ConstructFailed { kind } => {
                write!(f, "construct_failed {{ kind: {} }}", kind)
            }
            RegistryEvent::Contains { kind, found } => {
                write!(f, "contains {{ kind: {}, found: {} }}", kind, found)
            }
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_event_display() {
        let event = RegistryEvent::RegisterFactory {
            kind: Kind::of::<u8>(),
        };
        assert_eq!(event.to_string(), "register_factory { kind: u8 }");

        let event = RegistryEvent::Get {
            kind: Kind::named("db"),
            found: false,
        };
        assert_eq!(event.to_string(), "get { kind: db, found: false }");

        let event = RegistryEvent::ConstructFailed {
            kind: Kind::named("db"),
        };
        assert_eq!(event.to_string(), "construct_failed { kind: db }");

        let event = RegistryEvent::Contains {
            kind: Kind::of::<String>(),
            found: true,
        };
        assert_eq!(
            event.to_string(),
            "contains { kind: alloc::string::String, found: true }"
        );

        assert_eq!(RegistryEvent::Clear {}.to_string(), "Clearing the Registry");
    }

    #[test]
    fn test_registry_event_clone() {
        let event = RegistryEvent::Construct {
            kind: Kind::named("cache"),
        };
        let cloned = event.clone();
        assert_eq!(format!("{:?}", event), format!("{:?}", cloned));
    }
}
