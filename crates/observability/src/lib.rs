//! Process-wide tracing setup shared by every `bpcatalog` binary.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide observability (tracing/logging).
///
/// Reads `RUST_LOG` for filtering and `BPCATALOG_LOG_FORMAT` for the output
/// format. Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = LogFormat::from_env_value(std::env::var("BPCATALOG_LOG_FORMAT").ok().as_deref());
    self::tracing::init(format);
}
