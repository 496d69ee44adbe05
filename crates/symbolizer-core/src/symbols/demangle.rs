//! Symbol demangling.
//!
//! Rust names (legacy `_ZN...17h<hash>E` and v0 `_R...`) are rendered in
//! their alternate form, without the trailing hash, so `core::panicking::panic`
//! can be queried and printed as written. Everything else keeps its linkage
//! name: C++ and MSVC decorations are left alone, since debugger-style
//! `module!symbol` output for those names is conventionally the raw name.

use rustc_demangle::try_demangle;

use crate::types::SymbolName;

/// Create a `SymbolName` from a raw symbol string.
pub(crate) fn make_symbol_name(raw: String) -> SymbolName
{
    let demangled = try_demangle(&raw).ok().map(|d| format!("{d:#}"));
    SymbolName::new(raw, demangled)
}

/// Strip the leading underscore Mach-O adds to every C-level symbol.
pub(crate) fn strip_macho_prefix(raw: &str) -> &str
{
    raw.strip_prefix('_').unwrap_or(raw)
}
