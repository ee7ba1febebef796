//! Section header table decoding and section name resolution.
//!
//! Decoding is two-phase. [`SectionHeaderTable::parse`] decodes every entry
//! with its name left unresolved, then [`SectionHeaderTable::resolve_names`]
//! looks up each name in the string-table section, which is itself one of the
//! decoded entries.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::bytes::scan_until_zero;
use crate::class::{ElfClass, Field};
use crate::codes::code_enum;
use crate::error::ElfError;
use crate::header::FileHeader;
use crate::segment::entry_slices;

code_enum! {
    /// Section type (`sh_type`).
    pub enum SectionType: u32 {
        /// `SHT_NULL`: inactive entry.
        Null = 0 => "NULL",
        /// `SHT_PROGBITS`: program-defined contents.
        Progbits = 1 => "PROGBITS",
        /// `SHT_SYMTAB`: symbol table.
        Symtab = 2 => "SYMTAB",
        /// `SHT_STRTAB`: string table.
        Strtab = 3 => "STRTAB",
        /// `SHT_RELA`: relocations with addends.
        Rela = 4 => "RELA",
        /// `SHT_HASH`: symbol hash table.
        Hash = 5 => "HASH",
        /// `SHT_DYNAMIC`: dynamic linking information.
        Dynamic = 6 => "DYNAMIC",
        /// `SHT_NOTE`: notes.
        Note = 7 => "NOTE",
        /// `SHT_NOBITS`: occupies no file space (`.bss`).
        Nobits = 8 => "NOBITS",
        /// `SHT_REL`: relocations without addends.
        Rel = 9 => "REL",
        /// `SHT_SHLIB`: reserved.
        Shlib = 10 => "SHLIB",
        /// `SHT_DYNSYM`: dynamic symbol table.
        Dynsym = 11 => "DYNSYM",
        /// `SHT_INIT_ARRAY`: constructor pointers.
        InitArray = 14 => "INIT_ARRAY",
        /// `SHT_FINI_ARRAY`: destructor pointers.
        FiniArray = 15 => "FINI_ARRAY",
        /// `SHT_PREINIT_ARRAY`: pre-constructor pointers.
        PreinitArray = 16 => "PREINIT_ARRAY",
        /// `SHT_GROUP`: section group.
        Group = 17 => "GROUP",
        /// `SHT_SYMTAB_SHNDX`: extended section indices.
        SymtabShndx = 18 => "SYMTAB_SHNDX",
        /// `SHT_NUM`: number of defined types.
        Num = 19 => "NUM",
        /// `SHT_GNU_HASH`: GNU-style hash table.
        GnuHash = 0x6fff_fff6 => "GNU_HASH",
        /// `SHT_GNU_verneed`: version needs.
        GnuVerneed = 0x6fff_fffe => "VERNEED",
        /// `SHT_GNU_versym`: version symbol table.
        GnuVersym = 0x6fff_ffff => "VERSYM",
    }
    ranges {
        /// `SHT_LOOS..=SHT_HIOS`.
        OsSpecific = 0x6000_0000..=0x6fff_ffff => "LOOS"..="HIOS",
        /// `SHT_LOPROC..=SHT_HIPROC`.
        ProcessorSpecific = 0x7000_0000..=0x7fff_ffff => "LOPROC"..="HIPROC",
        /// `SHT_LOUSER..=SHT_HIUSER`.
        User = 0x8000_0000..=0xffff_ffff => "LOUSER"..="HIUSER",
    }
}

bitflags::bitflags! {
    /// Section attribute flags (`sh_flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SectionFlags: u64 {
        /// `SHF_WRITE`.
        const WRITE = 0x1;
        /// `SHF_ALLOC`.
        const ALLOC = 0x2;
        /// `SHF_EXECINSTR`.
        const EXECINSTR = 0x4;
        /// `SHF_MERGE`.
        const MERGE = 0x10;
        /// `SHF_STRINGS`.
        const STRINGS = 0x20;
        /// `SHF_INFO_LINK`.
        const INFO_LINK = 0x40;
        /// `SHF_LINK_ORDER`.
        const LINK_ORDER = 0x80;
        /// `SHF_OS_NONCONFORMING`.
        const OS_NONCONFORMING = 0x100;
        /// `SHF_GROUP`.
        const GROUP = 0x200;
        /// `SHF_TLS`.
        const TLS = 0x400;
    }
}

impl SectionFlags {
    /// Flag letters in display order.
    pub const LETTERS: [(Self, char); 10] = [
        (Self::WRITE, 'W'),
        (Self::ALLOC, 'A'),
        (Self::EXECINSTR, 'X'),
        (Self::MERGE, 'M'),
        (Self::STRINGS, 'S'),
        (Self::INFO_LINK, 'I'),
        (Self::LINK_ORDER, 'O'),
        (Self::OS_NONCONFORMING, 'N'),
        (Self::GROUP, 'G'),
        (Self::TLS, 'T'),
    ];

    /// Renders the set flags as letters (`WAXMSIONGT` order). Unknown bits
    /// are not shown.
    #[must_use]
    pub fn letters(self) -> String {
        Self::LETTERS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|&(_, c)| c)
            .collect()
    }
}

impl fmt::Display for SectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

/// Per-class field layout of a section header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeaderLayout {
    /// `sh_name`.
    pub sh_name: Field,
    /// `sh_type`.
    pub sh_type: Field,
    /// `sh_flags`.
    pub sh_flags: Field,
    /// `sh_addr`.
    pub sh_addr: Field,
    /// `sh_offset`.
    pub sh_offset: Field,
    /// `sh_size`.
    pub sh_size: Field,
    /// `sh_link`.
    pub sh_link: Field,
    /// `sh_info`.
    pub sh_info: Field,
    /// `sh_addralign`.
    pub sh_addralign: Field,
    /// `sh_entsize`.
    pub sh_entsize: Field,
}

impl SectionHeaderLayout {
    /// `Elf32_Shdr`.
    pub const ELF32: Self = Self {
        sh_name: Field::new(0, 4),
        sh_type: Field::new(4, 4),
        sh_flags: Field::new(8, 4),
        sh_addr: Field::new(12, 4),
        sh_offset: Field::new(16, 4),
        sh_size: Field::new(20, 4),
        sh_link: Field::new(24, 4),
        sh_info: Field::new(28, 4),
        sh_addralign: Field::new(32, 4),
        sh_entsize: Field::new(36, 4),
    };

    /// `Elf64_Shdr`.
    pub const ELF64: Self = Self {
        sh_name: Field::new(0, 4),
        sh_type: Field::new(4, 4),
        sh_flags: Field::new(8, 8),
        sh_addr: Field::new(16, 8),
        sh_offset: Field::new(24, 8),
        sh_size: Field::new(32, 8),
        sh_link: Field::new(40, 4),
        sh_info: Field::new(44, 4),
        sh_addralign: Field::new(48, 8),
        sh_entsize: Field::new(56, 8),
    };

    /// Selects the layout for `class`.
    #[must_use]
    pub const fn for_class(class: ElfClass) -> &'static Self {
        match class {
            ElfClass::ThirtyTwo => &Self::ELF32,
            ElfClass::SixtyFour => &Self::ELF64,
        }
    }
}

/// Decoded section header entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// Position in the section header table.
    pub index: usize,
    /// Offset of this section's name in the section-name string table.
    pub sh_name: u32,
    name: Option<String>,
    /// Section type.
    pub sh_type: SectionType,
    /// Attribute flags. Unknown bits are retained.
    pub sh_flags: SectionFlags,
    /// Virtual address when loaded, or 0.
    pub sh_addr: u64,
    /// File offset of the section contents.
    pub sh_offset: u64,
    /// Size of the section in bytes.
    pub sh_size: u64,
    /// Index of an associated section.
    pub sh_link: u32,
    /// Type-dependent extra information.
    pub sh_info: u32,
    /// Required alignment.
    pub sh_addralign: u64,
    /// Size of each record, for sections holding fixed-size records.
    pub sh_entsize: u64,
}

impl SectionHeader {
    /// Decodes one entry from `entry`, the entry's own bytes. The name is left
    /// unresolved.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OutOfBounds`] (relative to the entry) if `entry` is
    /// shorter than the class layout requires.
    pub fn parse(entry: &[u8], index: usize, class: ElfClass) -> Result<Self, ElfError> {
        let layout = SectionHeaderLayout::for_class(class);
        Ok(Self {
            index,
            sh_name: layout.sh_name.read_u32(entry)?,
            name: None,
            sh_type: SectionType::from_raw(layout.sh_type.read_u32(entry)?),
            sh_flags: SectionFlags::from_bits_retain(layout.sh_flags.read(entry)?),
            sh_addr: layout.sh_addr.read(entry)?,
            sh_offset: layout.sh_offset.read(entry)?,
            sh_size: layout.sh_size.read(entry)?,
            sh_link: layout.sh_link.read_u32(entry)?,
            sh_info: layout.sh_info.read_u32(entry)?,
            sh_addralign: layout.sh_addralign.read(entry)?,
            sh_entsize: layout.sh_entsize.read(entry)?,
        })
    }

    /// Resolved section name, or `""` before name resolution.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Returns `true` once the name has been resolved.
    #[must_use]
    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    /// Returns `true` if every flag in `flags` is set.
    #[must_use]
    pub fn has_flags(&self, flags: SectionFlags) -> bool {
        self.sh_flags.contains(flags)
    }

    /// Returns `true` if `addr` lies inside this section's loaded range.
    #[must_use]
    pub fn contains_address(&self, addr: u64) -> bool {
        self.sh_addr != 0
            && addr >= self.sh_addr
            && addr - self.sh_addr < self.sh_size
    }
}

/// The section header table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionHeaderTable {
    entries: Vec<SectionHeader>,
}

impl SectionHeaderTable {
    /// Decodes `e_shnum` entries of `e_shentsize` bytes starting at `e_shoff`.
    ///
    /// Names are not resolved; call [`resolve_names`](Self::resolve_names)
    /// once the table is complete.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OutOfBounds`] if any entry lies outside `data`.
    pub fn parse(data: &[u8], header: &FileHeader) -> Result<Self, ElfError> {
        let entries = entry_slices(data, header.e_shoff, header.e_shentsize, header.e_shnum)
            .map(|slice| {
                let (index, entry) = slice?;
                SectionHeader::parse(entry, index, header.class)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Resolves every section's name through the string table at
    /// `string_table_index`.
    ///
    /// Names are decoded as UTF-8 with invalid sequences replaced.
    ///
    /// # Errors
    ///
    /// - [`ElfError::InvalidStringTableIndex`] if the index does not name a
    ///   decoded section. An empty table has no valid index.
    /// - [`ElfError::OutOfBounds`] if a name starts past the end of `data`.
    pub fn resolve_names(&mut self, data: &[u8], string_table_index: u64) -> Result<(), ElfError> {
        let invalid = ElfError::InvalidStringTableIndex {
            index: string_table_index,
            count: self.entries.len(),
        };
        let strtab_offset = usize::try_from(string_table_index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .ok_or(invalid)?
            .sh_offset;

        let mut names = Vec::with_capacity(self.entries.len());
        for section in &self.entries {
            let start = strtab_offset
                .checked_add(u64::from(section.sh_name))
                .ok_or(ElfError::OutOfBounds {
                    start: strtab_offset,
                    len: u64::from(section.sh_name),
                    available: data.len(),
                })?;
            let bytes = scan_until_zero(data, start)?;
            names.push(String::from_utf8_lossy(bytes).into_owned());
        }

        for (section, name) in self.entries.iter_mut().zip(names) {
            section.name = Some(name);
        }
        Ok(())
    }

    /// Returns the section at `index`, or `None` if there is none.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SectionHeader> {
        self.entries.get(index)
    }

    /// Returns the first section named `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&SectionHeader> {
        self.entries.iter().find(|s| s.name() == name)
    }

    /// Returns the sections whose flags contain all of `flags`, in table order.
    pub fn with_flags(&self, flags: SectionFlags) -> impl Iterator<Item = &SectionHeader> {
        self.entries.iter().filter(move |s| s.has_flags(flags))
    }

    /// Returns all entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[SectionHeader] {
        &self.entries
    }

    /// Returns an iterator over all entries.
    pub fn iter(&self) -> core::slice::Iter<'_, SectionHeader> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a SectionHeaderTable {
    type Item = &'a SectionHeader;
    type IntoIter = core::slice::Iter<'a, SectionHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
