//! # Symbols
//!
//! Loading symbol files and answering address/name queries against them.
//!
//! - [`image`]: parses one symbol file (ELF, Mach-O, PE, or PDB) into a
//!   [`SymbolImage`]
//! - [`table`]: the address-sorted [`SymbolTable`] every image carries
//! - `demangle`: raw names to [`SymbolName`](crate::types::SymbolName)s
//!
//! All offsets at this layer are image-relative (RVAs). Turning a dump
//! address into an RVA is the engine's job, since only the dump knows where
//! each module was loaded.

pub(crate) mod demangle;
pub mod image;
mod pdb_symbols;
pub mod table;

use gimli::{EndianArcSlice, RunTimeEndian};

pub use image::SymbolImage;
pub use table::{SymbolEntry, SymbolTable};

pub(crate) type OwnedReader = EndianArcSlice<RunTimeEndian>;
