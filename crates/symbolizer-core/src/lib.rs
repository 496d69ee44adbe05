//! # symbolizer-core
//!
//! Crash-dump backed symbol resolution.
//!
//! This crate opens a post-mortem dump, indexes the modules it records, finds
//! symbol files for them, and answers two queries:
//!
//! - **symbolize**: address → `module!symbol+0x10` or `module+0x1a2b`
//! - **resolve**: `module!symbol` or `symbol` → address
//!
//! ## Layers
//!
//! - [`Session`]: validates inputs, owns one engine, maps failures to
//!   [`SymbolizerError`]
//! - [`engine`]: the [`ResolutionEngine`](engine::ResolutionEngine) interface
//!   and the minidump-backed [`DumpEngine`](engine::DumpEngine)
//! - [`symbols`]: symbol file parsing (ELF, Mach-O, PE, PDB) and DWARF line
//!   lookups
//! - [`types`]: addresses, trace styles, symbol names, modules

pub mod engine;
pub mod error;
pub mod prelude;
pub mod session;
pub mod symbols;
pub mod types;
pub mod version;

pub use engine::{DumpEngine, ResolutionEngine};
// Re-export commonly used types
pub use error::{SymbolizerError, SymbolizerResult};
pub use session::Session;
pub use types::{Address, TraceStyle};
