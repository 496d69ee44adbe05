//! Helpers shared by the integration tests.
//!
//! [`DumpBuilder`] writes a minimal minidump: a header, a stream directory,
//! and a module list stream. That is everything `DumpEngine` reads.

#![allow(dead_code)]

pub mod images;

use std::fs;
use std::path::{Path, PathBuf};

const MINIDUMP_SIGNATURE: u32 = 0x504d_444d; // "MDMP"
const MINIDUMP_VERSION: u32 = 0xa793;
const MODULE_LIST_STREAM: u32 = 4;

const HEADER_SIZE: usize = 32;
const DIRECTORY_ENTRY_SIZE: usize = 12;
const MODULE_ENTRY_SIZE: usize = 108;

/// A module entry of the synthetic dump.
#[derive(Debug, Clone)]
pub struct DumpModule
{
    pub code_file: String,
    pub base: u64,
    pub size: u32,
}

#[derive(Debug, Default)]
pub struct DumpBuilder
{
    modules: Vec<DumpModule>,
}

impl DumpBuilder
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn module(mut self, code_file: impl Into<String>, base: u64, size: u32) -> Self
    {
        self.modules.push(DumpModule {
            code_file: code_file.into(),
            base,
            size,
        });
        self
    }

    /// Serialize the dump.
    ///
    /// Layout: header, one directory entry, module list, then the module
    /// name strings.
    pub fn build(&self) -> Vec<u8>
    {
        let directory_rva = HEADER_SIZE;
        let list_rva = directory_rva + DIRECTORY_ENTRY_SIZE;
        let list_size = 4 + self.modules.len() * MODULE_ENTRY_SIZE;
        let mut names_rva = list_rva + list_size;

        let mut out = Vec::new();

        // MINIDUMP_HEADER
        put_u32(&mut out, MINIDUMP_SIGNATURE);
        put_u32(&mut out, MINIDUMP_VERSION);
        put_u32(&mut out, 1); // stream count
        put_u32(&mut out, to_u32(directory_rva));
        put_u32(&mut out, 0); // checksum
        put_u32(&mut out, 0); // time date stamp
        put_u64(&mut out, 0); // flags

        // MINIDUMP_DIRECTORY
        put_u32(&mut out, MODULE_LIST_STREAM);
        put_u32(&mut out, to_u32(list_size));
        put_u32(&mut out, to_u32(list_rva));

        // MINIDUMP_MODULE_LIST
        let names: Vec<Vec<u8>> = self.modules.iter().map(|module| encode_string(&module.code_file)).collect();
        put_u32(&mut out, to_u32(self.modules.len()));
        for (module, name) in self.modules.iter().zip(&names) {
            put_u64(&mut out, module.base);
            put_u32(&mut out, module.size);
            put_u32(&mut out, 0); // checksum
            put_u32(&mut out, 0); // time date stamp
            put_u32(&mut out, to_u32(names_rva));
            out.extend_from_slice(&[0u8; 52]); // VS_FIXEDFILEINFO
            out.extend_from_slice(&[0u8; 8]); // cv_record
            out.extend_from_slice(&[0u8; 8]); // misc_record
            put_u64(&mut out, 0);
            put_u64(&mut out, 0);
            names_rva += name.len();
        }

        for name in names {
            out.extend_from_slice(&name);
        }
        out
    }

    /// Write the dump to `dir/name` and return its path.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf
    {
        let path = dir.join(name);
        fs::write(&path, self.build()).unwrap();
        path
    }
}

/// MINIDUMP_STRING: byte length, UTF-16LE text, NUL terminator.
fn encode_string(value: &str) -> Vec<u8>
{
    let units: Vec<u16> = value.encode_utf16().collect();
    let mut out = Vec::with_capacity(4 + units.len() * 2 + 2);
    put_u32(&mut out, to_u32(units.len() * 2));
    for unit in units {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out.extend_from_slice(&[0, 0]);
    out
}

pub(crate) fn put_u16(out: &mut Vec<u8>, value: u16)
{
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_u32(out: &mut Vec<u8>, value: u32)
{
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_u64(out: &mut Vec<u8>, value: u64)
{
    out.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn to_u32(value: usize) -> u32
{
    u32::try_from(value).unwrap()
}
