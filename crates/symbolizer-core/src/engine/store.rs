//! Locating symbol files for dump modules.

use std::path::{Path, PathBuf};

use super::dump::{file_basename, ModuleDescriptor};

/// A local symbol location: either a directory tree or a single file.
///
/// For a directory, candidates are tried in this order:
///
/// 1. `<root>/<debug file>/<debug id>/<debug file>` (symbol-server layout)
/// 2. `<root>/<code file>/<code id>/<code file>`
/// 3. `<root>/<debug file>`
/// 4. `<root>/<code file>`
/// 5. `<root>/<code file>.debug`
///
/// A single file only ever serves the module whose code or debug file has the
/// same basename.
#[derive(Debug, Clone)]
pub struct SymbolStore
{
    root: PathBuf,
}

impl SymbolStore
{
    pub fn new(root: impl Into<PathBuf>) -> Self
    {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path
    {
        &self.root
    }

    /// Candidate paths for `module`, most specific first. Nothing is checked
    /// against the filesystem here.
    pub fn candidates(&self, module: &ModuleDescriptor) -> Vec<PathBuf>
    {
        let code_file = file_basename(&module.code_file);
        let debug_file = module.debug_file.as_deref().map(file_basename);

        if self.root.is_file() {
            let Some(name) = self.root.file_name().and_then(|name| name.to_str()) else {
                return Vec::new();
            };
            let matches = name.eq_ignore_ascii_case(code_file)
                || debug_file.is_some_and(|debug_file| name.eq_ignore_ascii_case(debug_file));
            return if matches { vec![self.root.clone()] } else { Vec::new() };
        }

        let mut candidates = Vec::new();
        if let (Some(debug_file), Some(debug_id)) = (debug_file, module.debug_id.as_deref()) {
            candidates.push(self.root.join(debug_file).join(debug_id).join(debug_file));
        }
        if let Some(code_id) = module.code_id.as_deref() {
            candidates.push(self.root.join(code_file).join(code_id).join(code_file));
        }
        if let Some(debug_file) = debug_file {
            candidates.push(self.root.join(debug_file));
        }
        if !code_file.is_empty() {
            candidates.push(self.root.join(code_file));
            candidates.push(self.root.join(format!("{code_file}.debug")));
        }
        candidates
    }

    /// First candidate that exists as a regular file.
    pub fn locate(&self, module: &ModuleDescriptor) -> Option<PathBuf>
    {
        self.candidates(module).into_iter().find(|candidate| candidate.is_file())
    }
}
