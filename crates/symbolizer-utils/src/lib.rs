//! # Symbolizer Utilities
//!
//! Shared logging helpers for the symbolizer workspace.
//!
//! Library crates only emit `tracing` events; whoever embeds them decides
//! where the events go by calling one of the initializers here once at
//! startup.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    init_file_logging, init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingError, LoggingGuard,
};
pub use tracing::{debug, error, info, trace, warn};
