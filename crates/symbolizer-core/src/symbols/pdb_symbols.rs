//! PDB symbol files.

use std::io::Cursor;

use pdb::FallibleIterator;

use super::demangle::make_symbol_name;
use super::table::SymbolEntry;
use crate::error::EngineError;

/// Every PDB 7.0 file starts with this MSF superblock signature.
pub(crate) const PDB_MAGIC: &[u8] = b"Microsoft C/C++ MSF 7.00\r\n\x1aDS";

pub(crate) fn is_pdb(data: &[u8]) -> bool
{
    data.starts_with(PDB_MAGIC)
}

/// Collect the public symbols of a PDB, translated to image RVAs.
///
/// Public symbols carry no size; address lookups fall back to the nearest
/// preceding public, which is what the debugger engines do as well.
pub(crate) fn load_public_symbols(data: Vec<u8>) -> Result<Vec<SymbolEntry>, EngineError>
{
    let mut pdb = pdb::PDB::open(Cursor::new(data))?;
    let symbol_table = pdb.global_symbols()?;
    let address_map = pdb.address_map()?;

    let mut entries = Vec::new();
    let mut symbols = symbol_table.iter();
    while let Some(symbol) = symbols.next()? {
        let Ok(pdb::SymbolData::Public(public)) = symbol.parse() else {
            continue;
        };
        let Some(rva) = public.offset.to_rva(&address_map) else {
            continue;
        };
        entries.push(SymbolEntry {
            rva: u64::from(rva.0),
            size: 0,
            name: make_symbol_name(public.name.to_string().into_owned()),
        });
    }

    Ok(entries)
}
