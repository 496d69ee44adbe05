//! Symbol names and source locations returned by queries.

use std::fmt;

/// Name of a function or data symbol as found in a symbol file.
///
/// Rust symbols carry a demangled form as well. Lookups accept either form,
/// while rendered output always uses [`SymbolName::display_name`], so a symbol
/// resolved by its mangled name is printed back demangled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolName
{
    raw: String,
    demangled: Option<String>,
}

impl SymbolName
{
    pub fn new(raw: String, demangled: Option<String>) -> Self
    {
        Self { raw, demangled }
    }

    /// Linkage name exactly as stored in the symbol file.
    pub fn raw(&self) -> &str
    {
        &self.raw
    }

    pub fn demangled(&self) -> Option<&str>
    {
        self.demangled.as_deref()
    }

    /// Name used in `module!symbol` output.
    pub fn display_name(&self) -> &str
    {
        self.demangled.as_deref().unwrap_or(&self.raw)
    }

    /// Whether `query` names this symbol, in either form.
    pub fn matches(&self, query: &str) -> bool
    {
        self.raw == query || self.demangled.as_deref() == Some(query)
    }
}

impl fmt::Display for SymbolName
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.display_name())
    }
}

/// File, line and column of an instruction, from DWARF line tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation
{
    /// Path as recorded by the compiler, not necessarily present locally.
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl fmt::Display for SourceLocation
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(&self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        Ok(())
    }
}
