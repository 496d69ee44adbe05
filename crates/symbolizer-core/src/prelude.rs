//! Common module for library exports

pub use crate::engine::{DumpEngine, EngineConfig, ResolutionEngine};
pub use crate::error::{EngineError, Query, SymbolizerError, SymbolizerResult};
pub use crate::session::Session;
pub use crate::types::{Address, ModuleInfo, SourceLocation, SymbolName, TraceStyle};
