//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! underwriting core test suite.
//!
//! # Modules
//!
//! - `fixtures`: Product configurations for every family and fixed dates
//! - `builders`: Fluent construction of policy drafts
//! - `assertions`: Assertion helpers for violations and money
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;

/// Installs a tracing subscriber for tests
///
/// Honours `RUST_LOG` and defaults to `warn`. Safe to call from every test;
/// only the first call installs anything.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
