//! Symbol file parsing and DWARF section loading.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use addr2line::Context;
use gimli::{Dwarf, EndianArcSlice, RunTimeEndian, SectionId};
use object::{BinaryFormat, Object, ObjectSection, ObjectSegment, ObjectSymbol, SymbolKind};
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use super::demangle::{make_symbol_name, strip_macho_prefix};
use super::table::{SymbolEntry, SymbolTable};
use super::{pdb_symbols, OwnedReader};
use crate::error::EngineError;
use crate::types::SourceLocation;

const DWARF_SECTIONS: &[(&str, &[&str])] = &[
    (".debug_abbrev", &[".debug_abbrev", "__debug_abbrev"]),
    (".debug_addr", &[".debug_addr", "__debug_addr"]),
    (".debug_aranges", &[".debug_aranges", "__debug_aranges"]),
    (".debug_info", &[".debug_info", "__debug_info"]),
    (".debug_line", &[".debug_line", "__debug_line"]),
    (".debug_line_str", &[".debug_line_str", "__debug_line_str"]),
    (".debug_ranges", &[".debug_ranges", "__debug_ranges"]),
    (".debug_rnglists", &[".debug_rnglists", "__debug_rnglists"]),
    (".debug_str", &[".debug_str", "__debug_str"]),
    (".debug_str_offsets", &[".debug_str_offsets", "__debug_str_offsets"]),
];

fn load_section_bytes(file: &object::File<'_>, names: &[&str]) -> Result<Option<Arc<[u8]>>, EngineError>
{
    for name in names {
        if let Some(section) = file.section_by_name(name) {
            let data = section.uncompressed_data()?;
            return Ok(Some(match data {
                Cow::Borrowed(bytes) => Arc::<[u8]>::from(bytes),
                Cow::Owned(vec) => vec.into(),
            }));
        }
    }

    Ok(None)
}

/// A parsed symbol file: its symbol table plus the DWARF needed for line lookups.
///
/// Offsets handed to this type are RVAs, i.e. relative to the image base the
/// symbol file was linked at. The engine converts dump addresses to RVAs
/// using the module base recorded in the dump.
///
/// The image base is the preferred load address: `ImageBase` for PE, the
/// lowest `PT_LOAD` address for ELF (0 for PIE, 0x400000 for a classic
/// executable) and the `__TEXT` address for Mach-O.
pub struct SymbolImage
{
    path: PathBuf,
    table: SymbolTable,
    image_base: u64,
    endian: RunTimeEndian,
    debug_sections: HashMap<&'static str, Arc<[u8]>>,
    context_cache: OnceCell<Option<Context<OwnedReader>>>,
}

impl SymbolImage
{
    /// Read and parse the symbol file at `path`.
    ///
    /// PDB files are recognised by their signature; everything else goes
    /// through `object` (ELF, Mach-O, PE/COFF).
    pub fn load(path: &Path) -> Result<Self, EngineError>
    {
        let bytes = fs::read(path)?;
        if pdb_symbols::is_pdb(&bytes) {
            let entries = pdb_symbols::load_public_symbols(bytes)?;
            debug!(path = %path.display(), symbols = entries.len(), "Loaded PDB public symbols");
            return Ok(Self {
                path: path.to_path_buf(),
                table: SymbolTable::new(entries),
                image_base: 0,
                endian: RunTimeEndian::Little,
                debug_sections: HashMap::new(),
                context_cache: OnceCell::new(),
            });
        }

        let data = Arc::<[u8]>::from(bytes);
        let file = object::File::parse(&*data)?;

        let endian = if file.is_little_endian() {
            RunTimeEndian::Little
        } else {
            RunTimeEndian::Big
        };
        let image_base = preferred_image_base(&file);

        let mut debug_sections = HashMap::new();
        for (canonical, aliases) in DWARF_SECTIONS {
            if let Some(bytes) = load_section_bytes(&file, aliases)? {
                debug_sections.insert(*canonical, bytes);
            }
        }

        let entries = collect_object_symbols(&file, image_base);
        debug!(
            path = %path.display(),
            format = ?file.format(),
            image_base = format_args!("{image_base:#x}"),
            symbols = entries.len(),
            dwarf_sections = debug_sections.len(),
            "Loaded symbol file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            table: SymbolTable::new(entries),
            image_base,
            endian,
            debug_sections,
            context_cache: OnceCell::new(),
        })
    }

    /// Preferred load address the symbol addresses were linked against.
    pub fn image_base(&self) -> u64
    {
        self.image_base
    }

    pub fn symbols(&self) -> &SymbolTable
    {
        &self.table
    }

    /// Whether the file carries DWARF line information.
    pub fn has_debug_info(&self) -> bool
    {
        self.debug_sections.contains_key(".debug_info")
    }

    /// Nearest symbol at or below `rva`, with the displacement into it.
    pub fn lookup(&self, rva: u64) -> Option<(&SymbolEntry, u64)>
    {
        self.table.lookup(rva)
    }

    /// Symbol named `name`.
    pub fn find(&self, name: &str) -> Option<&SymbolEntry>
    {
        self.table.find(name)
    }

    /// Source location of the instruction at `rva`, from DWARF line tables.
    pub fn location(&self, rva: u64) -> Option<SourceLocation>
    {
        let ctx = self.symbol_context()?;
        let linked = rva.checked_add(self.image_base)?;
        match ctx.find_location(linked) {
            Ok(Some(location)) => location.file.map(|file| SourceLocation {
                file: file.to_string(),
                line: location.line,
                column: location.column,
            }),
            Ok(None) => None,
            Err(err) => {
                debug!(path = %self.path.display(), rva, %err, "Line lookup failed");
                None
            }
        }
    }

    fn section_reader(&self, id: SectionId) -> OwnedReader
    {
        let data = self
            .debug_sections
            .get(id.name())
            .cloned()
            .unwrap_or_else(|| Arc::<[u8]>::from(Vec::new()));
        EndianArcSlice::new(data, self.endian)
    }

    fn symbol_context(&self) -> Option<&Context<OwnedReader>>
    {
        self.context_cache
            .get_or_init(|| {
                if !self.has_debug_info() {
                    return None;
                }
                match self.build_context() {
                    Ok(ctx) => Some(ctx),
                    Err(err) => {
                        warn!(path = %self.path.display(), %err, "Ignoring unreadable DWARF");
                        None
                    }
                }
            })
            .as_ref()
    }

    fn build_context(&self) -> Result<Context<OwnedReader>, EngineError>
    {
        let dwarf = Dwarf::load(|section| Ok::<_, gimli::Error>(self.section_reader(section))).map_err(|source| {
            EngineError::Dwarf {
                context: "loading DWARF sections",
                source,
            }
        })?;
        Context::from_dwarf(dwarf).map_err(|source| EngineError::Dwarf {
            context: "building addr2line context",
            source,
        })
    }
}

/// Preferred load address of `file`, the base its symbol addresses are relative to.
///
/// `relative_address_base` is only meaningful for PE; for ELF and Mach-O it is
/// always 0, which would leave non-PIE executables and Mach-O images (linked
/// at 0x100000000) with absolute addresses.
fn preferred_image_base(file: &object::File<'_>) -> u64
{
    match file.format() {
        // __PAGEZERO starts at 0 and maps nothing; the image begins at __TEXT.
        BinaryFormat::MachO => file
            .segments()
            .find(|segment| matches!(segment.name(), Ok(Some("__TEXT"))))
            .map_or(0, |segment| segment.address()),
        // Mappings start on a page boundary even when p_vaddr does not.
        BinaryFormat::Elf => file
            .segments()
            .map(|segment| segment.address())
            .min()
            .map_or(0, |lowest| lowest & !(ELF_PAGE_SIZE - 1)),
        _ => file.relative_address_base(),
    }
}

const ELF_PAGE_SIZE: u64 = 0x1000;

fn collect_object_symbols(file: &object::File<'_>, image_base: u64) -> Vec<SymbolEntry>
{
    let format = file.format();
    let mut entries = Vec::new();
    let mut push = |raw: &str, address: u64, size: u64| {
        let raw = if format == BinaryFormat::MachO {
            strip_macho_prefix(raw)
        } else {
            raw
        };
        if raw.is_empty() {
            return;
        }
        let Some(rva) = address.checked_sub(image_base) else {
            return;
        };
        entries.push(SymbolEntry {
            rva,
            size,
            name: make_symbol_name(raw.to_string()),
        });
    };

    for symbol in file.symbols().chain(file.dynamic_symbols()) {
        if !symbol.is_definition() || !matches!(symbol.kind(), SymbolKind::Text | SymbolKind::Data) {
            continue;
        }
        if let Ok(name) = symbol.name() {
            push(name, symbol.address(), symbol.size());
        }
    }

    // PE images rarely carry a COFF symbol table; exports are what is left.
    if format == BinaryFormat::Pe {
        if let Ok(exports) = file.exports() {
            for export in exports {
                if let Ok(name) = std::str::from_utf8(export.name()) {
                    push(name, export.address(), 0);
                }
            }
        }
    }

    entries
}
