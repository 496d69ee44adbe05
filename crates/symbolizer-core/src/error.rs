//! # Error Types
//!
//! Error handling for symbolization sessions and the engines behind them.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! There are two layers:
//!
//! - [`SymbolizerError`] is what callers of a [`Session`](crate::Session) see.
//!   It has exactly three kinds of failure.
//! - [`EngineError`] is what a [`ResolutionEngine`](crate::engine::ResolutionEngine)
//!   reports when it cannot build a resolution context. The session wraps it
//!   into [`SymbolizerError::EngineInitializationFailed`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Address;

/// Main error type for session operations
///
/// ## Error Categories
///
/// 1. **Caller errors**: `InvalidArgument` (checked without touching the engine)
/// 2. **Engine errors**: `EngineInitializationFailed` (the dump/symbols could not be loaded)
/// 3. **Query errors**: `ResolutionFailed` (a well-formed query had no answer)
///
/// Every variant carries the offending input so the message is actionable on
/// its own.
#[derive(Error, Debug)]
pub enum SymbolizerError
{
    /// Caller-supplied value violates a precondition
    ///
    /// Examples:
    /// - The dump path is empty or does not exist
    /// - The symbol path is given but does not exist
    /// - A trace style name or discriminant outside the known set
    /// - An empty symbol name
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine could not build a resolution context for a dump
    ///
    /// The paths were acceptable, but the content was not: a corrupt or
    /// truncated dump, a file that is not a dump at all, or an unreadable
    /// symbol store.
    #[error("Failed to initialize {}: {source}", dump.display())]
    EngineInitializationFailed
    {
        /// Canonical path of the dump that failed to load
        dump: PathBuf,
        /// Underlying engine failure
        #[source]
        source: EngineError,
    },

    /// A query against a ready session found no answer
    ///
    /// This is a not-found condition, not a crash: the address lies outside
    /// every module, the module has no symbols, or no symbol has that name.
    #[error("Resolution failed: {0}")]
    ResolutionFailed(Query),
}

/// The input of a query that could not be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query
{
    /// Address to symbol
    Address(Address),
    /// Symbol to address
    Symbol(String),
    /// Address to source location
    Location(Address),
}

impl fmt::Display for Query
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Query::Address(address) => write!(f, "failed to symbolize address {address}"),
            Query::Symbol(name) => write!(f, "failed to resolve symbol '{name}'"),
            Query::Location(address) => write!(f, "no source location for address {address}"),
        }
    }
}

/// Errors raised by a resolution engine while loading a dump or symbols.
#[derive(Error, Debug)]
pub enum EngineError
{
    /// Reading the dump or a symbol file from disk failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The dump is not a minidump or is missing a required stream
    #[error("Minidump error: {0}")]
    Minidump(#[from] minidump::Error),

    /// An ELF/Mach-O/PE symbol file could not be parsed
    #[error("Object file error: {0}")]
    Object(#[from] object::read::Error),

    /// A PDB symbol file could not be parsed
    #[error("PDB error: {0}")]
    Pdb(#[from] pdb::Error),

    /// DWARF debug information could not be read
    #[error("DWARF error: {context}: {source}")]
    Dwarf
    {
        /// What was being read when the error occurred
        context: &'static str,
        /// The gimli error
        #[source]
        source: gimli::Error,
    },
}

/// Convenience type alias for `Result<T, SymbolizerError>`
///
/// ```rust
/// use symbolizer_core::error::SymbolizerResult;
/// fn foo() -> SymbolizerResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type SymbolizerResult<T> = std::result::Result<T, SymbolizerError>;
