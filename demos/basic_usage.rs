//! Basic usage example for lazy-singleton-registry.
//!
//! Demonstrates:
//! - Making kinds constructible with `Singleton`, `register_factory` and `register_default`
//! - First access constructs, later accesses share the same instance
//! - Handling missing and failing constructors
//! - Inspecting the registry with `contains()` and `snapshot()`
//!
//! Run with: `cargo run --example basic_usage`

use lazy_singleton_registry::{define_registry, BoxError, Factory, Kind, Singleton};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

// Create an isolated registry for this example
define_registry!(app);

/// Application configuration, built once.
#[derive(Debug)]
struct AppConfig {
    name: String,
    version: u32,
    debug_mode: bool,
}

impl Singleton for AppConfig {
    fn construct() -> Result<Self, BoxError> {
        println!("   (constructing AppConfig)");
        Ok(AppConfig {
            name: "MyApp".to_string(),
            version: 1,
            debug_mode: true,
        })
    }
}

/// Shared request counter.
#[derive(Default)]
struct Requests {
    served: AtomicU32,
}

fn main() {
    println!("=== lazy-singleton-registry: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Make kinds constructible
    // -------------------------------------------------------------------------
    println!("1. Registering factories...");

    app::register_default::<Requests>();
    app::register_factory(
        Kind::named("greeting"),
        Factory::new(|| "Hello, lazy-singleton-registry!".to_string()),
    )
    .unwrap();
    app::register_factory(
        Kind::named("database"),
        Factory::fallible(|| Err::<String, _>("no database configured")),
    )
    .unwrap();

    println!("   Registered: Requests (default), greeting, database");
    println!("   Constructed so far: {}", app::snapshot().len());

    // -------------------------------------------------------------------------
    // 2. First access constructs, second access reuses
    // -------------------------------------------------------------------------
    println!("\n2. Accessing a Singleton type twice...");

    let first: Arc<AppConfig> = app::instance().unwrap();
    let second: Arc<AppConfig> = app::instance().unwrap();

    println!("   AppConfig: {:?}", *first);
    println!(
        "   {} v{} (debug: {})",
        first.name, first.version, first.debug_mode
    );
    println!("   Same instance: {}", Arc::ptr_eq(&first, &second));

    // -------------------------------------------------------------------------
    // 3. Mutations are shared
    // -------------------------------------------------------------------------
    println!("\n3. Mutating through one handle...");

    let requests: Arc<Requests> = app::get().unwrap();
    requests.served.fetch_add(3, Ordering::SeqCst);

    let again: Arc<Requests> = app::get().unwrap();
    println!("   served = {}", again.served.load(Ordering::SeqCst));

    // -------------------------------------------------------------------------
    // 4. Named kinds
    // -------------------------------------------------------------------------
    println!("\n4. Retrieving a named kind...");

    let greeting: Arc<String> = app::get_as(&Kind::named("greeting")).unwrap();
    println!("   greeting = {}", greeting);

    // -------------------------------------------------------------------------
    // 5. Handle errors
    // -------------------------------------------------------------------------
    println!("\n5. Handling errors...");

    match app::get::<Vec<u8>>() {
        Ok(value) => println!("   Found Vec<u8>: {:?}", value),
        Err(e) => println!("   Error (expected): {}", e),
    }

    match app::get_instance(&Kind::named("database")) {
        Ok(_) => println!("   database constructed"),
        Err(e) => println!("   Error (expected): {}", e),
    }
    println!(
        "   database stored after failure: {}",
        app::contains(&Kind::named("database"))
    );

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------
    println!("\n=== Example Complete ===");
    println!(
        "The registry now holds {} singletons (AppConfig, Requests, greeting).",
        app::snapshot().len()
    );
}
