//! # Types
//!
//! Plain data types shared by the session façade and the engines.
//!
//! None of these types touch the dump: they are the transient parameters and
//! results of queries, plus the descriptions of what a dump contains.

pub mod address;
pub mod module;
pub mod style;
pub mod symbols;

// Re-export all public types
pub use address::Address;
pub use module::ModuleInfo;
pub use style::TraceStyle;
pub use symbols::{SourceLocation, SymbolName};
