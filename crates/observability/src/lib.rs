//! Process-wide logging setup shared by the service binaries.

/// Tracing subscriber configuration (filters, formatting).
pub mod tracing;

pub use self::tracing::{LogFormat, init, init_with};
