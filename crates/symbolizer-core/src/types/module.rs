//! Modules recorded in a dump.

use std::fmt;

use super::Address;

/// A module (executable or shared library) loaded in the dumped process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo
{
    /// Short module name used in `module!symbol` and `module+offset` forms.
    pub name: String,
    /// Path of the image as recorded in the dump.
    pub code_file: String,
    /// Name or path of the debug file (`.pdb`, `.debug`), if recorded.
    pub debug_file: Option<String>,
    /// Load address of the image.
    pub base: Address,
    /// Size of the mapped image in bytes.
    pub size: u64,
}

impl ModuleInfo
{
    /// Whether `address` lies in `[base, base + size)`.
    pub fn contains(&self, address: Address) -> bool
    {
        address
            .offset_from(self.base)
            .is_some_and(|offset| offset < self.size)
    }

    /// Exclusive end address of the module, saturating at `u64::MAX`.
    pub fn end(&self) -> Address
    {
        Address::new(self.base.value().saturating_add(self.size))
    }
}

impl fmt::Display for ModuleInfo
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} {}-{} {}", self.name, self.base, self.end(), self.code_file)
    }
}
