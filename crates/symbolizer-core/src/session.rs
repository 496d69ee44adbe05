//! # Session
//!
//! The single entry point for opening a dump and querying it.
//!
//! A [`Session`] binds one crash dump (and optionally one symbol location) to
//! exactly one [`ResolutionEngine`]. Construction either fully succeeds or
//! fails without leaving anything behind; once constructed, the session stays
//! ready until it is dropped, and dropping it releases the engine.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use symbolizer_core::{Session, TraceStyle};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>>
//! {
//!     let mut session = Session::open_with_symbols("crash.dmp", "symbols")?;
//!
//!     let main = session.resolve("app!main")?;
//!     println!("{}", session.symbolize(main)?); // app!main+0x0
//!
//!     session.set_style(TraceStyle::Modoff);
//!     println!("{}", session.symbolize(main)?); // app+0x1a40
//!     println!("{}", session.symbolize_with(main, TraceStyle::FullSymbol)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! The session adds no locking of its own. Queries take `&self` and the
//! shipped [`DumpEngine`] synchronizes internally; changing the default style
//! needs `&mut self`.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::engine::{DumpEngine, ResolutionEngine};
use crate::error::{Query, SymbolizerError, SymbolizerResult};
use crate::types::{Address, ModuleInfo, SourceLocation, TraceStyle};

/// An open, ready debugging context bound to one crash dump.
pub struct Session<E: ResolutionEngine = DumpEngine>
{
    dump_path: PathBuf,
    symbol_path: Option<PathBuf>,
    style: TraceStyle,
    engine: E,
}

impl Session<DumpEngine>
{
    /// Open `dump` with the default [`DumpEngine`] and no symbol location.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: `dump` is empty or does not exist
    /// - `EngineInitializationFailed`: `dump` is not a loadable dump
    pub fn open<P: AsRef<Path>>(dump: P) -> SymbolizerResult<Self>
    {
        Self::with_engine(DumpEngine::new(), dump.as_ref(), None)
    }

    /// Open `dump` with the default [`DumpEngine`], searching `symbols` for
    /// symbol files.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: either path is empty or does not exist
    /// - `EngineInitializationFailed`: `dump` is not a loadable dump
    pub fn open_with_symbols<P: AsRef<Path>, S: AsRef<Path>>(dump: P, symbols: S) -> SymbolizerResult<Self>
    {
        Self::with_engine(DumpEngine::new(), dump.as_ref(), Some(symbols.as_ref()))
    }
}

impl<E: ResolutionEngine> Session<E>
{
    /// Open `dump` with a caller-provided engine.
    ///
    /// Both paths are checked for existence and canonicalized before the
    /// engine sees them. If the engine fails to initialize, it is dropped and
    /// the error carries the canonical dump path.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: either path is empty, does not exist, or cannot
    ///   be canonicalized
    /// - `EngineInitializationFailed`: the engine rejected the dump/symbols
    pub fn with_engine(mut engine: E, dump: &Path, symbols: Option<&Path>) -> SymbolizerResult<Self>
    {
        let dump_path = normalize_path(dump, "dump")?;
        let symbol_path = symbols.map(|path| normalize_path(path, "symbol")).transpose()?;

        debug!(
            dump = %dump_path.display(),
            symbols = ?symbol_path.as_deref().map(Path::display),
            "Initializing resolution engine"
        );
        engine
            .initialize(&dump_path, symbol_path.as_deref())
            .map_err(|source| SymbolizerError::EngineInitializationFailed {
                dump: dump_path.clone(),
                source,
            })?;

        info!(dump = %dump_path.display(), "Session ready");
        Ok(Self {
            dump_path,
            symbol_path,
            style: TraceStyle::default(),
            engine,
        })
    }

    /// Canonical path of the dump this session is bound to.
    pub fn dump_path(&self) -> &Path
    {
        &self.dump_path
    }

    /// Canonical symbol location, if one was given.
    pub fn symbol_path(&self) -> Option<&Path>
    {
        self.symbol_path.as_deref()
    }

    /// Default trace style for [`Session::symbolize`].
    pub fn style(&self) -> TraceStyle
    {
        self.style
    }

    /// Change the default trace style.
    ///
    /// Affects later [`Session::symbolize`] calls only; calls that pass an
    /// explicit style are never affected.
    pub fn set_style(&mut self, style: TraceStyle)
    {
        self.style = style;
    }

    /// The engine behind this session.
    pub fn engine(&self) -> &E
    {
        &self.engine
    }

    /// Symbolize `address` using the session's default style.
    ///
    /// ## Errors
    ///
    /// `ResolutionFailed` if the address maps to no known module or symbol.
    pub fn symbolize(&self, address: impl Into<Address>) -> SymbolizerResult<String>
    {
        self.symbolize_with(address, self.style)
    }

    /// Symbolize `address` using `style` for this call only.
    ///
    /// ## Errors
    ///
    /// `ResolutionFailed` if the address maps to no known module or symbol.
    pub fn symbolize_with(&self, address: impl Into<Address>, style: TraceStyle) -> SymbolizerResult<String>
    {
        let address = address.into();
        self.engine
            .symbolize_address(address, style)
            .filter(|rendered| !rendered.is_empty())
            .ok_or(SymbolizerError::ResolutionFailed(Query::Address(address)))
    }

    /// Address bound to the symbol `name`.
    ///
    /// `name` may be qualified as `module!symbol`. Address `0` is a valid
    /// answer if the engine reports it.
    ///
    /// With [`DumpEngine`], Rust symbols resolve by either their mangled or
    /// demangled name, but `FullSymbol` output always shows the demangled
    /// one: resolving `_ZN3app4main17h...E` and symbolizing the result gives
    /// `app!app::main+0x0`.
    ///
    /// ## Errors
    ///
    /// - `InvalidArgument`: `name` is empty or only whitespace
    /// - `ResolutionFailed`: no loaded module defines `name`
    pub fn resolve(&self, name: &str) -> SymbolizerResult<Address>
    {
        if name.trim().is_empty() {
            return Err(SymbolizerError::InvalidArgument("symbol name is empty".to_string()));
        }

        self.engine
            .resolve_symbol(name)
            .ok_or_else(|| SymbolizerError::ResolutionFailed(Query::Symbol(name.to_string())))
    }

    /// Source file and line of `address`, from the module's debug information.
    ///
    /// ## Errors
    ///
    /// `ResolutionFailed` if the address is unmapped or has no line information.
    pub fn source_location(&self, address: impl Into<Address>) -> SymbolizerResult<SourceLocation>
    {
        let address = address.into();
        self.engine
            .source_location(address)
            .ok_or(SymbolizerError::ResolutionFailed(Query::Location(address)))
    }

    /// Modules recorded in the dump, in dump order.
    pub fn modules(&self) -> Vec<ModuleInfo>
    {
        self.engine.modules()
    }
}

impl<E: ResolutionEngine> fmt::Debug for Session<E>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Session")
            .field("dump_path", &self.dump_path)
            .field("symbol_path", &self.symbol_path)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

/// Check that `path` names something on disk and make it canonical.
fn normalize_path(path: &Path, role: &str) -> SymbolizerResult<PathBuf>
{
    if path.as_os_str().is_empty() {
        return Err(SymbolizerError::InvalidArgument(format!("{role} path is empty")));
    }

    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            return Err(SymbolizerError::InvalidArgument(format!(
                "{role} path {} does not exist",
                path.display()
            )));
        }
        Err(err) => {
            return Err(SymbolizerError::InvalidArgument(format!(
                "unable to check {role} path {}: {err}",
                path.display()
            )));
        }
    }

    path.canonicalize().map_err(|err| {
        SymbolizerError::InvalidArgument(format!("unable to canonicalize {}: {err}", path.display()))
    })
}
