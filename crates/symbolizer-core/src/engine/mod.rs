//! # Resolution Engines
//!
//! The interface between a [`Session`](crate::Session) and whatever does the
//! actual symbol resolution.
//!
//! A session owns exactly one engine. It validates inputs, then calls
//! [`ResolutionEngine::initialize`] once; after that it only issues queries.
//! Every query answers with an explicit `Option`: there are no sentinel values,
//! so address `0` and "not found" are never confused.
//!
//! [`DumpEngine`] is the engine shipped with this crate. Tests substitute
//! their own implementations to exercise the session without a real dump.

mod config;
mod dump;
mod dump_engine;
mod store;

pub use config::{EngineConfig, CACHE_VAR, SEARCH_IMAGE_PATHS_VAR};
pub use dump::ModuleDescriptor;
pub use dump_engine::DumpEngine;
pub use store::SymbolStore;

use std::path::Path;

use crate::error::EngineError;
use crate::types::{Address, ModuleInfo, SourceLocation, TraceStyle};

/// Capability interface of a symbol resolution engine.
///
/// ## Lifecycle
///
/// 1. Construct the engine (cheap, no I/O)
/// 2. `initialize(dump, symbols)` loads the dump and prepares the index
/// 3. Issue any number of queries
///
/// Paths passed to `initialize` have already been checked to exist and are
/// canonical.
///
/// ## Thread Safety
///
/// Queries take `&self`. Implementations that keep mutable state (caches,
/// lazily loaded symbols) synchronize it internally.
pub trait ResolutionEngine
{
    /// Load `dump` and, if given, register `symbols` as the symbol location.
    ///
    /// May be slow: the cost grows with the size of the dump and the symbol
    /// store.
    ///
    /// ## Errors
    ///
    /// Any failure to build a usable resolution context.
    fn initialize(&mut self, dump: &Path, symbols: Option<&Path>) -> Result<(), EngineError>;

    /// Render `address` in `style`, or `None` if it maps to nothing.
    fn symbolize_address(&self, address: Address, style: TraceStyle) -> Option<String>;

    /// Address bound to `name`, or `None` if no loaded module defines it.
    fn resolve_symbol(&self, name: &str) -> Option<Address>;

    /// Source file and line for `address`, when debug information has it.
    fn source_location(&self, _address: Address) -> Option<SourceLocation>
    {
        None
    }

    /// Modules recorded in the dump, in dump order.
    fn modules(&self) -> Vec<ModuleInfo>
    {
        Vec::new()
    }
}
