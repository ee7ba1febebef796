//! ELF file header decoding.
//!
//! The first 24 bytes are laid out identically in both classes. From offset
//! 24 on, offsets and widths come from [`FileHeaderLayout`].

use crate::bytes::{read_uint, window};
use crate::class::{DataEncoding, ElfClass, Field};
use crate::codes::{Machine, ObjectType, OsAbi};
use crate::error::ElfError;

/// ELF magic bytes: `\x7fELF`.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

const EI_CLASS: u64 = 4;
const EI_DATA: u64 = 5;
const EI_VERSION: u64 = 6;
const EI_OSABI: u64 = 7;
const EI_PAD: Field = Field::new(8, 8);
const E_TYPE: Field = Field::new(16, 2);
const E_MACHINE: Field = Field::new(18, 2);
const E_VERSION: Field = Field::new(20, 4);

/// Class-dependent part of the file header layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeaderLayout {
    /// `e_entry`.
    pub entry: Field,
    /// `e_phoff`.
    pub phoff: Field,
    /// `e_shoff`.
    pub shoff: Field,
    /// `e_flags`.
    pub flags: Field,
    /// `e_ehsize`.
    pub ehsize: Field,
    /// `e_phentsize`.
    pub phentsize: Field,
    /// `e_phnum`.
    pub phnum: Field,
    /// `e_shentsize`.
    pub shentsize: Field,
    /// `e_shnum`.
    pub shnum: Field,
    /// `e_shstrndx`.
    pub shstrndx: Field,
}

impl FileHeaderLayout {
    /// `Elf32_Ehdr` (52 bytes).
    pub const ELF32: Self = Self {
        entry: Field::new(24, 4),
        phoff: Field::new(28, 4),
        shoff: Field::new(32, 4),
        flags: Field::new(36, 4),
        ehsize: Field::new(40, 2),
        phentsize: Field::new(42, 2),
        phnum: Field::new(44, 2),
        shentsize: Field::new(46, 2),
        shnum: Field::new(48, 2),
        shstrndx: Field::new(50, 2),
    };

    /// `Elf64_Ehdr` (64 bytes).
    pub const ELF64: Self = Self {
        entry: Field::new(24, 8),
        phoff: Field::new(32, 8),
        shoff: Field::new(40, 8),
        flags: Field::new(48, 4),
        ehsize: Field::new(52, 2),
        phentsize: Field::new(54, 2),
        phnum: Field::new(56, 2),
        shentsize: Field::new(58, 2),
        shnum: Field::new(60, 2),
        shstrndx: Field::new(62, 2),
    };

    /// Selects the layout for `class`.
    #[must_use]
    pub const fn for_class(class: ElfClass) -> &'static Self {
        match class {
            ElfClass::ThirtyTwo => &Self::ELF32,
            ElfClass::SixtyFour => &Self::ELF64,
        }
    }

    /// Size of the header described by this layout.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.shstrndx.end()
    }
}

/// Decoded ELF file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Magic bytes; always [`ELF_MAGIC`] once decoded.
    pub magic: [u8; 4],
    /// File class.
    pub class: ElfClass,
    /// Declared data encoding (not acted upon).
    pub data: DataEncoding,
    /// `e_ident[EI_VERSION]`.
    pub ident_version: u8,
    /// `e_ident[EI_OSABI]`.
    pub os_abi: OsAbi,
    /// `e_ident[8..16]`: ABI version followed by padding.
    pub padding: [u8; 8],
    /// Object file type.
    pub e_type: ObjectType,
    /// Target instruction set.
    pub e_machine: Machine,
    /// Object file version.
    pub e_version: u64,
    /// Virtual address of the entry point.
    pub e_entry: u64,
    /// File offset of the program header table.
    pub e_phoff: u64,
    /// File offset of the section header table.
    pub e_shoff: u64,
    /// Processor-specific flags.
    pub e_flags: u64,
    /// Size of this header.
    pub e_ehsize: u64,
    /// Size of one program header entry.
    pub e_phentsize: u64,
    /// Number of program header entries.
    pub e_phnum: u64,
    /// Size of one section header entry.
    pub e_shentsize: u64,
    /// Number of section header entries.
    pub e_shnum: u64,
    /// Index of the section holding section names.
    pub e_shstrndx: u64,
}

impl FileHeader {
    /// Decodes the file header from the start of `data`.
    ///
    /// The magic is checked before anything else, then the class byte, which
    /// selects the layout for every remaining field.
    ///
    /// # Errors
    ///
    /// - [`ElfError::NotAnElfFile`] if the magic does not match.
    /// - [`ElfError::UnrecognizedClass`] for an unknown class byte.
    /// - [`ElfError::OutOfBounds`] if `data` is shorter than the header.
    pub fn parse(data: &[u8]) -> Result<Self, ElfError> {
        if data.get(..4) != Some(&ELF_MAGIC[..]) {
            return Err(ElfError::NotAnElfFile);
        }

        let class = ElfClass::from_raw(read_u8(data, EI_CLASS)?)?;
        let layout = FileHeaderLayout::for_class(class);

        let mut padding = [0u8; 8];
        padding.copy_from_slice(EI_PAD.bytes(data)?);

        Ok(Self {
            magic: ELF_MAGIC,
            class,
            data: DataEncoding::from_raw(read_u8(data, EI_DATA)?),
            ident_version: read_u8(data, EI_VERSION)?,
            os_abi: OsAbi::from_raw(read_u8(data, EI_OSABI)?),
            padding,
            e_type: ObjectType::from_raw(read_u16(data, E_TYPE)?),
            e_machine: Machine::from_raw(read_u16(data, E_MACHINE)?),
            e_version: E_VERSION.read(data)?,
            e_entry: layout.entry.read(data)?,
            e_phoff: layout.phoff.read(data)?,
            e_shoff: layout.shoff.read(data)?,
            e_flags: layout.flags.read(data)?,
            e_ehsize: layout.ehsize.read(data)?,
            e_phentsize: layout.phentsize.read(data)?,
            e_phnum: layout.phnum.read(data)?,
            e_shentsize: layout.shentsize.read(data)?,
            e_shnum: layout.shnum.read(data)?,
            e_shstrndx: layout.shstrndx.read(data)?,
        })
    }

    /// Returns the class-selected layout this header was decoded with.
    #[must_use]
    pub fn layout(&self) -> &'static FileHeaderLayout {
        FileHeaderLayout::for_class(self.class)
    }
}

fn read_u8(data: &[u8], offset: u64) -> Result<u8, ElfError> {
    window(data, offset, 1).map(|b| b[0])
}

#[expect(clippy::cast_possible_truncation, reason = "reads exactly two bytes")]
fn read_u16(data: &[u8], field: Field) -> Result<u16, ElfError> {
    read_uint(data, field.offset, 2).map(|v| v as u16)
}
