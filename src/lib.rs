//! # Lazy Singleton Registry
//!
//! A thread-safe registry that hands out exactly one instance per kind,
//! constructing it on first access and reusing it afterwards.
//!
//! A kind is either a Rust type (`Kind::of::<T>()`) or an explicit name
//! (`Kind::named("...")`). A kind becomes constructible either by implementing
//! [`Singleton`] or by registering a zero-argument [`Factory`].
//!
//! ## Quick Start
//!
//! ```rust
//! use lazy_singleton_registry::{get_instance, register_factory, Factory, Kind};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//!
//! struct IntegerBox {
//!     a: AtomicI32,
//! }
//!
//! register_factory(
//!     Kind::named("integer-box"),
//!     Factory::new(|| IntegerBox { a: AtomicI32::new(1) }),
//! )
//! .unwrap();
//!
//! let first = get_instance(&Kind::named("integer-box")).unwrap();
//! let second = get_instance(&Kind::named("integer-box")).unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//!
//! let boxed = first.downcast::<IntegerBox>().unwrap();
//! assert_eq!(boxed.a.load(Ordering::SeqCst), 1);
//! ```
//!
//! ## Features
//!
//! - **Construct once**: concurrent first-time callers share a single construction
//! - **Cheap reads of existing instances**: reads never take the construction lock
//! - **Retryable failures**: a failing factory leaves its kind unregistered
//! - **Isolated registries**: [`define_registry!`] declares independent registries
//! - **Tracing support**: optional callback for every registry operation, plus `tracing` events
//!
//! ## Main Functions
//!
//! The process-wide default registry is exposed as free functions:
//!
//! - [`get_instance`] - Instance for a kind, constructed on first use
//! - [`get`] / [`get_as`] - Typed lookups
//! - [`instance`] - Lookup for a [`Singleton`] type
//! - [`register_factory`] / [`register_default`] - Make a kind constructible
//! - [`contains`] / [`snapshot`] - Inspect what has been constructed
//! - [`reset_all`] - Drop every instance (tests only)
//! - [`set_trace_callback`] - Set up tracing for registry operations
//!
//! ## Limitations
//!
//! A factory must not look up a not-yet-constructed kind in the registry that is
//! constructing it; construction holds one non-reentrant lock per registry and
//! such a call deadlocks. Instances are never torn down.

#[macro_use]
mod macros;

mod factory;
mod kind;
mod registry_error;
mod registry_event;
mod registry_trait;
mod singleton;
mod snapshot;
mod store;

pub use factory::{BoxError, Factory, Instance, Visibility};
pub use kind::Kind;
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use registry_trait::{RegistryApi, Storage, TraceCallback, Tracer};
pub use singleton::Singleton;
pub use snapshot::Snapshot;
pub use store::Store;

define_registry!(
    /// The process-wide default registry.
    ///
    /// Its free functions are re-exported at the crate root.
    global
);

pub use global::{
    clear_trace_callback, contains, get, get_as, get_instance, instance, register_default,
    register_factory, reset_all, set_trace_callback, snapshot,
};
