//! Reading the module table of a minidump.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use minidump::{Minidump, MinidumpModuleList, Module};

use crate::error::EngineError;
use crate::types::Address;

/// A module as recorded in the dump, before any symbols are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor
{
    /// Image path at capture time (may be a Windows path).
    pub code_file: String,
    /// Image identifier (PE timestamp+size, ELF build id).
    pub code_id: Option<String>,
    /// Debug file name or path (`ntdll.pdb`, `libc.so.6.debug`).
    pub debug_file: Option<String>,
    /// Debug identifier in symbol-server form (GUID+age, upper-case hex).
    pub debug_id: Option<String>,
    pub base: Address,
    pub size: u64,
}

/// Read the module list stream of the minidump at `path`.
///
/// ## Errors
///
/// - `Io`: the file cannot be read
/// - `Minidump`: bad header, or no module list stream
pub(crate) fn read_modules(path: &Path) -> Result<Vec<ModuleDescriptor>, EngineError>
{
    let bytes = fs::read(path)?;
    let dump = Minidump::read(bytes)?;
    let module_list = dump.get_stream::<MinidumpModuleList>()?;

    let modules = module_list
        .iter()
        .map(|module| ModuleDescriptor {
            code_file: module.code_file().into_owned(),
            code_id: module.code_identifier().map(|id| id.to_string()),
            debug_file: module.debug_file().map(Cow::into_owned),
            debug_id: module.debug_identifier().map(|id| id.breakpad().to_string()),
            base: Address::new(module.base_address()),
            size: module.size(),
        })
        .collect();

    Ok(modules)
}

/// Last component of a path recorded in a dump.
///
/// Dumps from Windows hosts carry `\`-separated paths, so both separators are
/// honoured regardless of the platform we run on.
pub(crate) fn file_basename(path: &str) -> &str
{
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Short module name: the basename up to its first `.`.
///
/// `C:\Windows\System32\ntdll.dll` becomes `ntdll`, `/usr/lib/libc.so.6`
/// becomes `libc`.
pub(crate) fn module_name(code_file: &str) -> String
{
    let basename = file_basename(code_file);
    match basename.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => basename.to_string(),
    }
}
