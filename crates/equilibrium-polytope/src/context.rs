//! Process-wide numeric constants for the double-description method.
//!
//! Set up once on first use and kept for the lifetime of the process.

use std::sync::OnceLock;

/// Tolerances shared by every conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DdConstants {
    /// Epsilon handed to the enumeration; slacks within it count as zero.
    pub zero_tolerance: f64,
    /// Largest allowed violation when verifying output rows.
    pub verify_tolerance: f64,
}

impl Default for DdConstants {
    fn default() -> Self {
        Self {
            zero_tolerance: 1e-9,
            verify_tolerance: 1e-6,
        }
    }
}

static CONTEXT: OnceLock<DdConstants> = OnceLock::new();

/// Initialize the shared constants. Idempotent; later calls return the
/// existing value.
pub fn initialize() -> &'static DdConstants {
    CONTEXT.get_or_init(|| {
        tracing::debug!("initializing double-description constants");
        DdConstants::default()
    })
}

/// Shared constants, initializing on first access.
pub fn dd_context() -> &'static DdConstants {
    initialize()
}

pub fn is_initialized() -> bool {
    CONTEXT.get().is_some()
}
