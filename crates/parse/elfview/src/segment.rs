//! Program header (segment) table decoding.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::bytes::window;
use crate::class::{ElfClass, Field};
use crate::codes::code_enum;
use crate::error::ElfError;
use crate::header::FileHeader;

code_enum! {
    /// Segment type (`p_type`).
    pub enum SegmentType: u32 {
        /// `PT_NULL`: unused entry.
        Null = 0 => "NULL",
        /// `PT_LOAD`: loadable segment.
        Load = 1 => "LOAD",
        /// `PT_DYNAMIC`: dynamic linking information.
        Dynamic = 2 => "DYNAMIC",
        /// `PT_INTERP`: path of the program interpreter.
        Interp = 3 => "INTERP",
        /// `PT_NOTE`: auxiliary information.
        Note = 4 => "NOTE",
        /// `PT_SHLIB`: reserved.
        Shlib = 5 => "SHLIB",
        /// `PT_PHDR`: the program header table itself.
        Phdr = 6 => "PHDR",
        /// `PT_TLS`: thread-local storage template.
        Tls = 7 => "TLS",
        /// `PT_GNU_EH_FRAME`: exception-handling frame table.
        GnuEhFrame = 0x6474_e550 => "GNU_EH_FRAME",
        /// `PT_GNU_STACK`: stack executability.
        GnuStack = 0x6474_e551 => "GNU_STACK",
        /// `PT_GNU_RELRO`: read-only after relocation.
        GnuRelro = 0x6474_e552 => "GNU_RELRO",
        /// `PT_GNU_PROPERTY`: `.note.gnu.property` location.
        GnuProperty = 0x6474_e553 => "GNU_PROPERTY",
    }
    ranges {
        /// `PT_LOOS..=PT_HIOS`.
        OsSpecific = 0x6000_0000..=0x6fff_ffff => "LOOS"..="HIOS",
        /// `PT_LOPROC..=PT_HIPROC`.
        ProcessorSpecific = 0x7000_0000..=0x7fff_ffff => "LOPROC"..="HIPROC",
    }
}

bitflags::bitflags! {
    /// Segment permission flags (`p_flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SegmentFlags: u32 {
        /// `PF_X`.
        const EXECUTE = 1;
        /// `PF_W`.
        const WRITE = 2;
        /// `PF_R`.
        const READ = 4;
    }
}

impl SegmentFlags {
    /// Renders the permission bits as `RWE`, with `-` for each absent bit.
    #[must_use]
    pub fn to_rwe(self) -> String {
        [
            (Self::READ, 'R'),
            (Self::WRITE, 'W'),
            (Self::EXECUTE, 'E'),
        ]
        .iter()
        .map(|&(flag, c)| if self.contains(flag) { c } else { '-' })
        .collect()
    }
}

impl fmt::Display for SegmentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rwe())
    }
}

/// Per-class field layout of a program header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHeaderLayout {
    /// `p_type`.
    pub p_type: Field,
    /// `p_flags`.
    pub p_flags: Field,
    /// `p_offset`.
    pub p_offset: Field,
    /// `p_vaddr`.
    pub p_vaddr: Field,
    /// `p_paddr`.
    pub p_paddr: Field,
    /// `p_filesz`.
    pub p_filesz: Field,
    /// `p_memsz`.
    pub p_memsz: Field,
    /// `p_align`.
    pub p_align: Field,
}

impl ProgramHeaderLayout {
    /// `Elf32_Phdr`: flags come after the size fields.
    pub const ELF32: Self = Self {
        p_type: Field::new(0, 4),
        p_offset: Field::new(4, 4),
        p_vaddr: Field::new(8, 4),
        p_paddr: Field::new(12, 4),
        p_filesz: Field::new(16, 4),
        p_memsz: Field::new(20, 4),
        p_flags: Field::new(24, 4),
        p_align: Field::new(28, 4),
    };

    /// `Elf64_Phdr`: flags directly follow the type.
    pub const ELF64: Self = Self {
        p_type: Field::new(0, 4),
        p_flags: Field::new(4, 4),
        p_offset: Field::new(8, 8),
        p_vaddr: Field::new(16, 8),
        p_paddr: Field::new(24, 8),
        p_filesz: Field::new(32, 8),
        p_memsz: Field::new(40, 8),
        p_align: Field::new(48, 8),
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

/// Decoded program header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHeader {
    /// Position in the program header table.
    pub index: usize,
    /// Segment type.
    pub p_type: SegmentType,
    /// Permission flags. Unknown bits are retained.
    pub p_flags: SegmentFlags,
    /// File offset of the segment contents.
    pub p_offset: u64,
    /// Virtual address of the segment.
    pub p_vaddr: u64,
    /// Physical address of the segment.
    pub p_paddr: u64,
    /// Size of the segment in the file.
    pub p_filesz: u64,
    /// Size of the segment in memory.
    pub p_memsz: u64,
    /// Required alignment.
    pub p_align: u64,
}

impl ProgramHeader {
    /// Decodes one entry from `entry`, the entry's own bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OutOfBounds`] (relative to the entry) if `entry` is
    /// shorter than the class layout requires.
    pub fn parse(entry: &[u8], index: usize, class: ElfClass) -> Result<Self, ElfError> {
        let layout = ProgramHeaderLayout::for_class(class);
        Ok(Self {
            index,
            p_type: SegmentType::from_raw(layout.p_type.read_u32(entry)?),
            p_flags: SegmentFlags::from_bits_retain(layout.p_flags.read_u32(entry)?),
            p_offset: layout.p_offset.read(entry)?,
            p_vaddr: layout.p_vaddr.read(entry)?,
            p_paddr: layout.p_paddr.read(entry)?,
            p_filesz: layout.p_filesz.read(entry)?,
            p_memsz: layout.p_memsz.read(entry)?,
            p_align: layout.p_align.read(entry)?,
        })
    }

    /// Returns `true` for a `PT_LOAD` segment.
    #[must_use]
    pub fn is_load(&self) -> bool {
        self.p_type == SegmentType::Load
    }
}

/// The program header table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramHeaderTable {
    entries: Vec<ProgramHeader>,
}

impl ProgramHeaderTable {
    /// Decodes `e_phnum` entries of `e_phentsize` bytes starting at `e_phoff`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OutOfBounds`] if any entry lies outside `data`.
    pub fn parse(data: &[u8], header: &FileHeader) -> Result<Self, ElfError> {
        let entries = entry_slices(data, header.e_phoff, header.e_phentsize, header.e_phnum)
            .map(|slice| {
                let (index, entry) = slice?;
                ProgramHeader::parse(entry, index, header.class)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ProgramHeader> {
        self.entries.get(index)
    }

    /// Returns all entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ProgramHeader] {
        &self.entries
    }

    /// Returns an iterator over all entries.
    pub fn iter(&self) -> core::slice::Iter<'_, ProgramHeader> {
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

impl<'a> IntoIterator for &'a ProgramHeaderTable {
    type Item = &'a ProgramHeader;
    type IntoIter = core::slice::Iter<'a, ProgramHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Yields `(index, bytes)` for each fixed-size entry of a header table.
///
/// Shared by the program and section header tables. Offset arithmetic that
/// overflows is reported as out of bounds.
pub(crate) fn entry_slices(
    data: &[u8],
    table_offset: u64,
    entry_size: u64,
    count: u64,
) -> impl Iterator<Item = Result<(usize, &[u8]), ElfError>> {
    (0..count).zip(0usize..).map(move |(i, index)| {
        let start = i
            .checked_mul(entry_size)
            .and_then(|rel| rel.checked_add(table_offset))
            .ok_or(ElfError::OutOfBounds {
                start: table_offset,
                len: entry_size,
                available: data.len(),
            })?;
        window(data, start, entry_size).map(|entry| (index, entry))
    })
}
