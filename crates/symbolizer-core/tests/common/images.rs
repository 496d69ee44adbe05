//! Minimal symbol files written byte by byte.
//!
//! - [`ElfExecutable`]: a non-PIE x86-64 executable with one `PT_LOAD`
//!   segment, a `.text` section and a `.symtab`
//! - [`PeDll`]: a PE32+ DLL with one section holding an export table

use super::{put_u16, put_u32, put_u64, to_u32};

const ELF_HEADER_SIZE: usize = 64;
const ELF_PROGRAM_HEADER_SIZE: usize = 56;
const ELF_SECTION_HEADER_SIZE: usize = 64;
const ELF_SYMBOL_SIZE: usize = 24;

/// A classic (non-PIE) executable: symbol values are absolute addresses
/// starting at `load_address`.
#[derive(Debug, Clone)]
pub struct ElfExecutable
{
    load_address: u64,
    text_address: u64,
    text_size: u64,
    symbols: Vec<(String, u64, u64)>,
}

impl ElfExecutable
{
    /// `.text` at `text_address`, which must lie at most a few pages above
    /// the page-aligned `load_address`.
    pub fn new(load_address: u64, text_address: u64, text_size: u64) -> Self
    {
        Self {
            load_address,
            text_address,
            text_size,
            symbols: Vec::new(),
        }
    }

    /// Global function symbol in `.text`.
    pub fn function(mut self, name: &str, address: u64, size: u64) -> Self
    {
        self.symbols.push((name.to_string(), address, size));
        self
    }

    pub fn build(&self) -> Vec<u8>
    {
        let text_offset = usize::try_from(self.text_address - self.load_address).unwrap();
        let text_size = usize::try_from(self.text_size).unwrap();
        let loaded_size = (text_offset + text_size) as u64;

        // .strtab and .shstrtab
        let mut strtab = vec![0u8];
        let mut name_offsets = Vec::new();
        for (name, _, _) in &self.symbols {
            name_offsets.push(to_u32(strtab.len()));
            strtab.extend_from_slice(name.as_bytes());
            strtab.push(0);
        }
        let shstrtab = b"\0.text\0.symtab\0.strtab\0.shstrtab\0";
        let (text_name, symtab_name, strtab_name, shstrtab_name) = (1u32, 7u32, 15u32, 23u32);

        let symtab_offset = align8(text_offset + text_size);
        let symtab_size = (self.symbols.len() + 1) * ELF_SYMBOL_SIZE;
        let strtab_offset = symtab_offset + symtab_size;
        let shstrtab_offset = strtab_offset + strtab.len();
        let section_headers_offset = align8(shstrtab_offset + shstrtab.len());

        let mut out = Vec::new();

        // Elf64_Ehdr
        out.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
        out.extend_from_slice(&[0u8; 8]);
        put_u16(&mut out, 2); // ET_EXEC
        put_u16(&mut out, 62); // EM_X86_64
        put_u32(&mut out, 1);
        put_u64(&mut out, self.text_address); // e_entry
        put_u64(&mut out, ELF_HEADER_SIZE as u64); // e_phoff
        put_u64(&mut out, section_headers_offset as u64); // e_shoff
        put_u32(&mut out, 0); // e_flags
        put_u16(&mut out, ELF_HEADER_SIZE as u16);
        put_u16(&mut out, ELF_PROGRAM_HEADER_SIZE as u16);
        put_u16(&mut out, 1); // e_phnum
        put_u16(&mut out, ELF_SECTION_HEADER_SIZE as u16);
        put_u16(&mut out, 5); // e_shnum
        put_u16(&mut out, 4); // e_shstrndx

        // Elf64_Phdr: PT_LOAD R+X covering headers and .text
        put_u32(&mut out, 1);
        put_u32(&mut out, 5);
        put_u64(&mut out, 0); // p_offset
        put_u64(&mut out, self.load_address); // p_vaddr
        put_u64(&mut out, self.load_address); // p_paddr
        put_u64(&mut out, loaded_size); // p_filesz
        put_u64(&mut out, loaded_size); // p_memsz
        put_u64(&mut out, 0x1000); // p_align

        out.resize(text_offset, 0);
        out.resize(text_offset + text_size, 0xcc); // int3 filler
        out.resize(symtab_offset, 0);

        // .symtab: null symbol, then STB_GLOBAL|STT_FUNC entries in section 1
        out.extend_from_slice(&[0u8; ELF_SYMBOL_SIZE]);
        for ((_, address, size), name_offset) in self.symbols.iter().zip(&name_offsets) {
            put_u32(&mut out, *name_offset);
            out.push(0x12); // st_info
            out.push(0); // st_other
            put_u16(&mut out, 1); // st_shndx
            put_u64(&mut out, *address);
            put_u64(&mut out, *size);
        }

        out.extend_from_slice(&strtab);
        out.extend_from_slice(shstrtab);
        out.resize(section_headers_offset, 0);

        // Section headers: null, .text, .symtab, .strtab, .shstrtab
        out.extend_from_slice(&[0u8; ELF_SECTION_HEADER_SIZE]);
        section_header(&mut out, text_name, 1, 0x6, self.text_address, text_offset, text_size, 0, 0, 16, 0);
        section_header(
            &mut out,
            symtab_name,
            2,
            0,
            0,
            symtab_offset,
            symtab_size,
            3,
            1,
            8,
            ELF_SYMBOL_SIZE as u64,
        );
        section_header(&mut out, strtab_name, 3, 0, 0, strtab_offset, strtab.len(), 0, 0, 1, 0);
        section_header(&mut out, shstrtab_name, 3, 0, 0, shstrtab_offset, shstrtab.len(), 0, 0, 1, 0);

        out
    }
}

#[allow(clippy::too_many_arguments)]
fn section_header(
    out: &mut Vec<u8>,
    name: u32,
    kind: u32,
    flags: u64,
    address: u64,
    offset: usize,
    size: usize,
    link: u32,
    info: u32,
    align: u64,
    entry_size: u64,
)
{
    put_u32(out, name);
    put_u32(out, kind);
    put_u64(out, flags);
    put_u64(out, address);
    put_u64(out, offset as u64);
    put_u64(out, size as u64);
    put_u32(out, link);
    put_u32(out, info);
    put_u64(out, align);
    put_u64(out, entry_size);
}

fn align8(value: usize) -> usize
{
    (value + 7) & !7
}

const PE_HEADERS_SIZE: u32 = 0x200;
const PE_SECTION_RVA: u32 = 0x1000;
const PE_SECTION_SIZE: u32 = 0x400;
const PE_EXPORTS_RVA: u32 = 0x1200;
const PE_OPTIONAL_HEADER_SIZE: u16 = 240;

/// A DLL whose only symbols are its exports, like most system DLLs without
/// their PDBs.
#[derive(Debug, Clone)]
pub struct PeDll
{
    name: String,
    image_base: u64,
    exports: Vec<(String, u32)>,
}

impl PeDll
{
    pub fn new(name: &str, image_base: u64) -> Self
    {
        Self {
            name: name.to_string(),
            image_base,
            exports: Vec::new(),
        }
    }

    /// Named export at `rva`, which must lie in `0x1000..0x1200`.
    pub fn export(mut self, name: &str, rva: u32) -> Self
    {
        self.exports.push((name.to_string(), rva));
        self
    }

    pub fn build(&self) -> Vec<u8>
    {
        let exports = self.export_directory();

        let mut out = Vec::new();

        // IMAGE_DOS_HEADER, only e_magic and e_lfanew matter
        out.extend_from_slice(b"MZ");
        out.resize(0x3c, 0);
        put_u32(&mut out, 0x40);

        out.extend_from_slice(b"PE\0\0");

        // IMAGE_FILE_HEADER
        put_u16(&mut out, 0x8664); // AMD64
        put_u16(&mut out, 1); // sections
        put_u32(&mut out, 0); // time date stamp
        put_u32(&mut out, 0); // symbol table
        put_u32(&mut out, 0); // symbol count
        put_u16(&mut out, PE_OPTIONAL_HEADER_SIZE);
        put_u16(&mut out, 0x2022); // EXECUTABLE_IMAGE | LARGE_ADDRESS_AWARE | DLL

        // IMAGE_OPTIONAL_HEADER64
        put_u16(&mut out, 0x20b);
        out.extend_from_slice(&[14, 0]); // linker version
        put_u32(&mut out, PE_SECTION_SIZE); // size of code
        put_u32(&mut out, 0);
        put_u32(&mut out, 0);
        put_u32(&mut out, 0); // entry point
        put_u32(&mut out, PE_SECTION_RVA); // base of code
        put_u64(&mut out, self.image_base);
        put_u32(&mut out, 0x1000); // section alignment
        put_u32(&mut out, 0x200); // file alignment
        for version in [6u16, 0, 0, 0, 6, 0] {
            put_u16(&mut out, version);
        }
        put_u32(&mut out, 0); // win32 version
        put_u32(&mut out, PE_SECTION_RVA + 0x1000); // size of image
        put_u32(&mut out, PE_HEADERS_SIZE);
        put_u32(&mut out, 0); // checksum
        put_u16(&mut out, 3); // console subsystem
        put_u16(&mut out, 0x0160); // dll characteristics
        for reserve in [0x10_0000u64, 0x1000, 0x10_0000, 0x1000] {
            put_u64(&mut out, reserve);
        }
        put_u32(&mut out, 0); // loader flags
        put_u32(&mut out, 16); // data directories
        put_u32(&mut out, PE_EXPORTS_RVA);
        put_u32(&mut out, to_u32(exports.len()));
        out.resize(out.len() + 15 * 8, 0);

        // IMAGE_SECTION_HEADER
        out.extend_from_slice(b".text\0\0\0");
        put_u32(&mut out, PE_SECTION_SIZE); // virtual size
        put_u32(&mut out, PE_SECTION_RVA);
        put_u32(&mut out, PE_SECTION_SIZE); // raw size
        put_u32(&mut out, PE_HEADERS_SIZE); // raw pointer
        put_u32(&mut out, 0);
        put_u32(&mut out, 0);
        put_u16(&mut out, 0);
        put_u16(&mut out, 0);
        put_u32(&mut out, 0x6000_0020); // CODE | EXECUTE | READ

        out.resize(PE_HEADERS_SIZE as usize, 0);
        out.resize((PE_HEADERS_SIZE + PE_EXPORTS_RVA - PE_SECTION_RVA) as usize, 0xcc);
        out.extend_from_slice(&exports);
        out.resize((PE_HEADERS_SIZE + PE_SECTION_SIZE) as usize, 0);
        out
    }

    /// IMAGE_EXPORT_DIRECTORY followed by its tables and strings, all inside
    /// the export data directory.
    fn export_directory(&self) -> Vec<u8>
    {
        let mut exports = self.exports.clone();
        exports.sort();
        let count = exports.len();

        let functions_rva = PE_EXPORTS_RVA + 40;
        let names_rva = functions_rva + to_u32(count * 4);
        let ordinals_rva = names_rva + to_u32(count * 4);
        let dll_name_rva = ordinals_rva + to_u32(count * 2);

        let mut strings = Vec::new();
        strings.extend_from_slice(self.name.as_bytes());
        strings.push(0);
        let mut name_rvas = Vec::new();
        for (name, _) in &exports {
            name_rvas.push(dll_name_rva + to_u32(strings.len()));
            strings.extend_from_slice(name.as_bytes());
            strings.push(0);
        }

        let mut out = Vec::new();
        put_u32(&mut out, 0); // characteristics
        put_u32(&mut out, 0); // time date stamp
        put_u16(&mut out, 0);
        put_u16(&mut out, 0);
        put_u32(&mut out, dll_name_rva);
        put_u32(&mut out, 1); // ordinal base
        put_u32(&mut out, to_u32(count));
        put_u32(&mut out, to_u32(count));
        put_u32(&mut out, functions_rva);
        put_u32(&mut out, names_rva);
        put_u32(&mut out, ordinals_rva);
        for (_, rva) in &exports {
            put_u32(&mut out, *rva);
        }
        for rva in name_rvas {
            put_u32(&mut out, rva);
        }
        for ordinal in 0..count {
            put_u16(&mut out, u16::try_from(ordinal).unwrap());
        }
        out.extend_from_slice(&strings);
        out
    }
}
