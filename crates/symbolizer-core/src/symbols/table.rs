//! Sorted symbol tables for one image.

use std::collections::HashMap;

use crate::types::SymbolName;

/// A symbol located relative to its image base.
#[derive(Debug, Clone)]
pub struct SymbolEntry
{
    /// Offset of the symbol start from the image base.
    pub rva: u64,
    /// Size in bytes, `0` when the symbol file does not record it.
    pub size: u64,
    pub name: SymbolName,
}

/// Address-ordered symbol table with a name index.
///
/// Lookups by address return the nearest symbol starting at or below the
/// queried offset, along with the displacement into it.
#[derive(Debug, Default)]
pub struct SymbolTable
{
    entries: Vec<SymbolEntry>,
    by_name: HashMap<String, usize>,
}

impl SymbolTable
{
    pub fn new(mut entries: Vec<SymbolEntry>) -> Self
    {
        // Sized symbols sort ahead of unsized aliases at the same offset so
        // that address lookups prefer the real function over a label.
        entries.sort_by(|a, b| {
            a.rva
                .cmp(&b.rva)
                .then_with(|| (b.size > 0).cmp(&(a.size > 0)))
                .then_with(|| a.name.raw().cmp(b.name.raw()))
        });
        entries.dedup_by(|a, b| a.rva == b.rva && a.name.raw() == b.name.raw());

        let mut by_name = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            by_name.entry(entry.name.raw().to_string()).or_insert(index);
            if let Some(demangled) = entry.name.demangled() {
                by_name.entry(demangled.to_string()).or_insert(index);
            }
        }

        Self { entries, by_name }
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }

    /// Nearest symbol at or below `rva`, with the displacement from its start.
    pub fn lookup(&self, rva: u64) -> Option<(&SymbolEntry, u64)>
    {
        let upper = self.entries.partition_point(|entry| entry.rva <= rva);
        let first_at_offset = {
            let candidate = self.entries.get(upper.checked_sub(1)?)?;
            self.entries.partition_point(|entry| entry.rva < candidate.rva)
        };
        let entry = &self.entries[first_at_offset];
        Some((entry, rva - entry.rva))
    }

    /// Symbol named `name`, by raw or demangled form.
    pub fn find(&self, name: &str) -> Option<&SymbolEntry>
    {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry>
    {
        self.entries.iter()
    }
}
