//! Trace styles.

use std::fmt;
use std::str::FromStr;

use crate::error::SymbolizerError;

/// Formatting mode used when rendering a resolved address.
///
/// The style never decides *whether* an address resolves, only how a
/// successful result is rendered. The set is closed: parsing rejects anything
/// outside it with [`SymbolizerError::InvalidArgument`].
///
/// | Style        | Output                               |
/// |--------------|--------------------------------------|
/// | `Modoff`     | `ntdll+0x1a2b`                       |
/// | `FullSymbol` | `ntdll!RtlUserThreadStart+0x21`      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TraceStyle
{
    /// Module name plus offset from the module base.
    Modoff = 0,
    /// `module!symbol` plus displacement from the symbol start.
    #[default]
    FullSymbol = 1,
}

impl TraceStyle
{
    /// Every style, in discriminant order.
    pub const ALL: [TraceStyle; 2] = [TraceStyle::Modoff, TraceStyle::FullSymbol];

    /// Stable lowercase name of the style.
    pub const fn as_str(self) -> &'static str
    {
        match self {
            TraceStyle::Modoff => "modoff",
            TraceStyle::FullSymbol => "fullsymbol",
        }
    }
}

impl fmt::Display for TraceStyle
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraceStyle
{
    type Err = SymbolizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.trim().to_lowercase().as_str() {
            "modoff" | "mod-off" | "module+offset" => Ok(TraceStyle::Modoff),
            "fullsymbol" | "full-symbol" | "full" | "symbol" => Ok(TraceStyle::FullSymbol),
            _ => Err(SymbolizerError::InvalidArgument(format!(
                "unknown trace style '{s}', expected 'modoff' or 'fullsymbol'"
            ))),
        }
    }
}

impl TryFrom<u8> for TraceStyle
{
    type Error = SymbolizerError;

    fn try_from(value: u8) -> Result<Self, Self::Error>
    {
        match value {
            0 => Ok(TraceStyle::Modoff),
            1 => Ok(TraceStyle::FullSymbol),
            _ => Err(SymbolizerError::InvalidArgument(format!("unknown trace style discriminant {value}"))),
        }
    }
}
