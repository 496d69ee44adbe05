//! Minidump-backed resolution engine.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use once_cell::sync::OnceCell;
use tracing::{debug, info, trace, warn};

use super::config::EngineConfig;
use super::dump::{self, file_basename, ModuleDescriptor};
use super::store::SymbolStore;
use super::ResolutionEngine;
use crate::error::EngineError;
use crate::symbols::SymbolImage;
use crate::types::{Address, ModuleInfo, SourceLocation, TraceStyle};

/// A dump module plus its lazily loaded symbols.
struct LoadedModule
{
    info: ModuleInfo,
    descriptor: ModuleDescriptor,
    symbols: OnceCell<Option<SymbolImage>>,
}

/// Resolution engine over a minidump's module table.
///
/// `initialize` reads only the module list; symbol files are located and
/// parsed the first time a query needs them, at most once per module. A
/// module whose symbols cannot be found or parsed still answers `Modoff`
/// queries.
///
/// ## Output formats
///
/// - `Modoff`: `module+0x<offset from module base>`
/// - `FullSymbol`: `module!symbol+0x<displacement from symbol start>`
///
/// Rust symbols are printed demangled (without the hash) even when they were
/// resolved by their mangled name.
///
/// ## Example
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use symbolizer_core::engine::{DumpEngine, ResolutionEngine};
/// use symbolizer_core::types::{Address, TraceStyle};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut engine = DumpEngine::new();
/// engine.initialize(Path::new("crash.dmp"), Some(Path::new("symbols")))?;
/// if let Some(text) = engine.symbolize_address(Address::new(0x7ffc_1234_5678), TraceStyle::FullSymbol) {
///     println!("{text}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct DumpEngine
{
    config: EngineConfig,
    modules: Vec<LoadedModule>,
    store: Option<SymbolStore>,
    cache: RwLock<HashMap<(Address, TraceStyle), String>>,
}

impl Default for DumpEngine
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl DumpEngine
{
    /// Engine configured from the `SYMBOLIZER_*` environment variables.
    #[must_use]
    pub fn new() -> Self
    {
        Self::with_config(EngineConfig::from_env())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self
    {
        Self {
            config,
            modules: Vec::new(),
            store: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig
    {
        &self.config
    }

    /// Symbol location registered by `initialize`, if any.
    pub fn symbol_store(&self) -> Option<&SymbolStore>
    {
        self.store.as_ref()
    }

    /// Number of cached symbolization results.
    pub fn cached_entries(&self) -> usize
    {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn module_for_address(&self, address: Address) -> Option<&LoadedModule>
    {
        self.modules.iter().find(|module| module.info.contains(address))
    }

    fn module_by_name(&self, name: &str) -> Option<&LoadedModule>
    {
        self.modules.iter().find(|module| {
            module.info.name.eq_ignore_ascii_case(name)
                || file_basename(&module.info.code_file).eq_ignore_ascii_case(name)
        })
    }

    fn symbols_for<'a>(&self, module: &'a LoadedModule) -> Option<&'a SymbolImage>
    {
        module
            .symbols
            .get_or_init(|| {
                let Some(path) = self.locate_symbol_file(&module.descriptor) else {
                    debug!(module = %module.info.name, "No symbol file found");
                    return None;
                };
                match SymbolImage::load(&path) {
                    Ok(image) => {
                        debug!(
                            module = %module.info.name,
                            path = %path.display(),
                            symbols = image.symbols().len(),
                            "Loaded symbols"
                        );
                        Some(image)
                    }
                    Err(err) => {
                        warn!(module = %module.info.name, path = %path.display(), %err, "Failed to load symbols");
                        None
                    }
                }
            })
            .as_ref()
    }

    fn locate_symbol_file(&self, descriptor: &ModuleDescriptor) -> Option<PathBuf>
    {
        if let Some(found) = self.store.as_ref().and_then(|store| store.locate(descriptor)) {
            return Some(found);
        }

        if self.config.search_image_paths {
            let image = Path::new(&descriptor.code_file);
            if image.is_absolute() && image.is_file() {
                return Some(image.to_path_buf());
            }
        }

        None
    }

    fn render(&self, address: Address, style: TraceStyle) -> Option<String>
    {
        let module = self.module_for_address(address)?;
        let offset = address.offset_from(module.info.base)?;

        match style {
            TraceStyle::Modoff => Some(format!("{}+0x{offset:x}", module.info.name)),
            TraceStyle::FullSymbol => {
                let (symbol, displacement) = self.symbols_for(module)?.lookup(offset)?;
                Some(format!(
                    "{}!{}+0x{displacement:x}",
                    module.info.name,
                    symbol.name.display_name()
                ))
            }
        }
    }

    fn resolve_in(&self, module: &LoadedModule, name: &str) -> Option<Address>
    {
        let symbol = self.symbols_for(module)?.find(name)?;
        module.info.base.checked_add(symbol.rva)
    }
}

impl ResolutionEngine for DumpEngine
{
    fn initialize(&mut self, dump: &Path, symbols: Option<&Path>) -> Result<(), EngineError>
    {
        let descriptors = dump::read_modules(dump)?;

        let mut taken = HashSet::new();
        let mut modules = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            // A suffixed name can itself clash with a real module name.
            let mut name = dump::module_name(&descriptor.code_file);
            while !taken.insert(name.to_lowercase()) {
                name = format!("{name}_{:x}", descriptor.base);
            }

            trace!(module = %name, base = %descriptor.base, size = descriptor.size, "Registered module");
            modules.push(LoadedModule {
                info: ModuleInfo {
                    name,
                    code_file: descriptor.code_file.clone(),
                    debug_file: descriptor.debug_file.clone(),
                    base: descriptor.base,
                    size: descriptor.size,
                },
                descriptor,
                symbols: OnceCell::new(),
            });
        }

        info!(dump = %dump.display(), modules = modules.len(), "Opened dump");

        self.modules = modules;
        self.store = symbols.map(SymbolStore::new);
        self.cache.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }

    fn symbolize_address(&self, address: Address, style: TraceStyle) -> Option<String>
    {
        if self.config.cache {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.get(&(address, style)) {
                trace!(%address, %style, "Symbolization cache hit");
                return Some(hit.clone());
            }
        }

        let rendered = self.render(address, style)?;
        trace!(%address, %style, result = %rendered, "Symbolized address");

        if self.config.cache {
            self.cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert((address, style), rendered.clone());
        }
        Some(rendered)
    }

    fn resolve_symbol(&self, name: &str) -> Option<Address>
    {
        let resolved = match name.split_once('!') {
            Some((module, symbol)) => self
                .module_by_name(module)
                .and_then(|module| self.resolve_in(module, symbol)),
            None => self.modules.iter().find_map(|module| self.resolve_in(module, name)),
        };
        trace!(symbol = name, resolved = ?resolved, "Resolved symbol");
        resolved
    }

    fn source_location(&self, address: Address) -> Option<SourceLocation>
    {
        let module = self.module_for_address(address)?;
        let offset = address.offset_from(module.info.base)?;
        self.symbols_for(module)?.location(offset)
    }

    fn modules(&self) -> Vec<ModuleInfo>
    {
        self.modules.iter().map(|module| module.info.clone()).collect()
    }
}
