//! [`ElfImage`]: the decoded view of a whole ELF file.

use alloc::string::String;
use alloc::vec::Vec;

use crate::bytes::{hex_be, window};
use crate::class::ElfClass;
use crate::error::ElfError;
use crate::header::FileHeader;
use crate::section::{SectionFlags, SectionHeader, SectionHeaderTable, SectionType};
use crate::segment::{ProgramHeader, ProgramHeaderTable};

/// A fully decoded ELF file.
///
/// Owns the raw file bytes together with the decoded file header, program
/// header table, and section header table (with resolved names). Construction
/// either succeeds completely or returns an error; there is no partially
/// decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElfImage {
    data: Vec<u8>,
    header: FileHeader,
    segments: ProgramHeaderTable,
    sections: SectionHeaderTable,
}

impl ElfImage {
    /// Decodes an ELF file from its raw bytes.
    ///
    /// Steps run in a fixed order: magic and file header, program header
    /// table, section header table, then section names.
    ///
    /// # Errors
    ///
    /// Returns the first [`ElfError`] hit by any step.
    pub fn parse(data: impl Into<Vec<u8>>) -> Result<Self, ElfError> {
        let data = data.into();
        let header = FileHeader::parse(&data)?;
        let segments = ProgramHeaderTable::parse(&data, &header)?;
        let mut sections = SectionHeaderTable::parse(&data, &header)?;
        sections.resolve_names(&data, header.e_shstrndx)?;
        Ok(Self {
            data,
            header,
            segments,
            sections,
        })
    }

    /// Returns the raw file bytes.
    #[must_use]
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the decoded file header.
    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Returns the file class.
    #[must_use]
    pub fn class(&self) -> ElfClass {
        self.header.class
    }

    /// Returns the virtual address of the entry point.
    #[must_use]
    pub fn entry_point(&self) -> u64 {
        self.header.e_entry
    }

    /// Returns the program header table.
    #[must_use]
    pub fn program_headers(&self) -> &ProgramHeaderTable {
        &self.segments
    }

    /// Returns the section header table.
    #[must_use]
    pub fn section_headers(&self) -> &SectionHeaderTable {
        &self.sections
    }

    /// Returns the section at table index `index`.
    ///
    /// A miss is a normal outcome, not an error.
    #[must_use]
    pub fn section(&self, index: usize) -> Option<&SectionHeader> {
        self.sections.get(index)
    }

    /// Finds a section by its resolved name.
    #[must_use]
    pub fn section_by_name(&self, name: &str) -> Option<&SectionHeader> {
        self.sections.by_name(name)
    }

    /// Returns the sections whose flags contain all of `flags`.
    pub fn sections_with_flags(&self, flags: SectionFlags) -> impl Iterator<Item = &SectionHeader> {
        self.sections.with_flags(flags)
    }

    /// Returns the sections holding executable instructions.
    pub fn executable_sections(&self) -> impl Iterator<Item = &SectionHeader> {
        self.sections_with_flags(SectionFlags::EXECINSTR)
    }

    /// Returns the `PT_LOAD` segments in table order.
    pub fn load_segments(&self) -> impl Iterator<Item = &ProgramHeader> {
        self.segments.iter().filter(|ph| ph.is_load())
    }

    /// Returns the file contents of `section`.
    ///
    /// `SHT_NOBITS` sections occupy no file space and yield an empty slice.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OutOfBounds`] if the section extends past the file.
    pub fn section_data(&self, section: &SectionHeader) -> Result<&[u8], ElfError> {
        if section.sh_type == SectionType::Nobits {
            return Ok(&[]);
        }
        window(&self.data, section.sh_offset, section.sh_size)
    }

    /// Picks the section used to translate `vaddr`: the lowest-indexed
    /// section with file contents whose loaded range contains it.
    #[must_use]
    pub fn reference_section(&self, vaddr: u64) -> Option<&SectionHeader> {
        self.sections
            .iter()
            .filter(|s| s.sh_type != SectionType::Nobits)
            .find(|s| s.contains_address(vaddr))
    }

    /// Translates a virtual address to a file offset.
    ///
    /// This applies the fixed delta between the reference section's address
    /// and file offset. It is a best-effort heuristic, not a general
    /// virtual-to-file mapper.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::AddressNotMapped`] if no section covers `vaddr`.
    pub fn virtual_to_file_offset(&self, vaddr: u64) -> Result<u64, ElfError> {
        let section = self
            .reference_section(vaddr)
            .ok_or(ElfError::AddressNotMapped(vaddr))?;
        // `contains_address` guarantees vaddr >= sh_addr.
        section
            .sh_offset
            .checked_add(vaddr - section.sh_addr)
            .ok_or(ElfError::AddressNotMapped(vaddr))
    }

    /// Reads `count` raw bytes starting at virtual address `vaddr`.
    ///
    /// # Errors
    ///
    /// - [`ElfError::AddressNotMapped`] if `vaddr` cannot be translated.
    /// - [`ElfError::OutOfBounds`] if the range runs past the end of the file.
    pub fn read_at_address(&self, vaddr: u64, count: u64) -> Result<&[u8], ElfError> {
        let offset = self.virtual_to_file_offset(vaddr)?;
        window(&self.data, offset, count)
    }

    /// Reads `count` bytes at `vaddr` as two-digit hex opcode strings, in
    /// file order.
    ///
    /// # Errors
    ///
    /// Same as [`read_at_address`](Self::read_at_address).
    pub fn read_opcodes(&self, vaddr: u64, count: u64) -> Result<Vec<String>, ElfError> {
        let bytes = self.read_at_address(vaddr, count)?;
        Ok(bytes.chunks(1).map(hex_be).collect())
    }
}
