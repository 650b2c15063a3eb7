//! Runtime helpers shared across binaries.
//!
//! Centralizes environment configuration, logging setup, and exit codes so
//! the CLIs behave the same way instead of re-implementing them.

use crate::error::ResolveError;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Comma- or whitespace-separated list of extra table files.
pub const TABLES_ENV: &str = "FIELDMAP_TABLES";

/// Exit code for usage and loading errors.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the context or field type is unknown.
pub const EXIT_LOOKUP: i32 = 2;
/// Exit code when the mapping is unimplemented.
pub const EXIT_UNIMPLEMENTED: i32 = 3;

/// Table paths named by `FIELDMAP_TABLES`, in order.
pub fn table_paths_from_env() -> Vec<PathBuf> {
    env::var(TABLES_ENV)
        .ok()
        .map(|value| crate::split_list(&value).into_iter().map(PathBuf::from).collect())
        .unwrap_or_default()
}

/// Install a stderr subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Process exit code for a resolution failure.
pub fn exit_code_for(err: &ResolveError) -> i32 {
    match err {
        ResolveError::Lookup { .. } => EXIT_LOOKUP,
        ResolveError::Unimplemented { .. } => EXIT_UNIMPLEMENTED,
    }
}
