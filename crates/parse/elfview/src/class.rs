//! ELF class, data encoding, and class-selected field layouts.
//!
//! Offsets of almost every header field depend on the file's class. Rather
//! than two decode paths, each structure has one decoder driven by a
//! [`Field`] table chosen by [`ElfClass`].

use alloc::{format, string::String};
use core::fmt;

use crate::bytes::{read_uint, window};
use crate::error::ElfError;

/// `e_ident[EI_CLASS]` value for 32-bit objects.
pub const ELFCLASS32: u8 = 1;

/// `e_ident[EI_CLASS]` value for 64-bit objects.
pub const ELFCLASS64: u8 = 2;

/// `e_ident[EI_DATA]` value for little-endian objects.
pub const ELFDATA2LSB: u8 = 1;

/// `e_ident[EI_DATA]` value for big-endian objects.
pub const ELFDATA2MSB: u8 = 2;

/// Address width category of an ELF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElfClass {
    /// `ELFCLASS32`.
    ThirtyTwo,
    /// `ELFCLASS64`.
    SixtyFour,
}

impl ElfClass {
    /// Decodes the class byte.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::UnrecognizedClass`] for anything other than
    /// [`ELFCLASS32`] or [`ELFCLASS64`].
    pub const fn from_raw(raw: u8) -> Result<Self, ElfError> {
        match raw {
            ELFCLASS32 => Ok(Self::ThirtyTwo),
            ELFCLASS64 => Ok(Self::SixtyFour),
            other => Err(ElfError::UnrecognizedClass(other)),
        }
    }

    /// Returns the raw class byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::ThirtyTwo => ELFCLASS32,
            Self::SixtyFour => ELFCLASS64,
        }
    }

    /// Width in bytes of an address or file offset in this class.
    #[must_use]
    pub const fn address_width(self) -> u64 {
        match self {
            Self::ThirtyTwo => 4,
            Self::SixtyFour => 8,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ThirtyTwo => "32-bit",
            Self::SixtyFour => "64-bit",
        }
    }
}

impl fmt::Display for ElfClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared byte order of the file.
///
/// Recorded for display only: all fields are decoded little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataEncoding {
    /// `ELFDATA2LSB`.
    Little,
    /// `ELFDATA2MSB`.
    Big,
    /// Any other value, preserved.
    Unknown(u8),
}

impl DataEncoding {
    /// Decodes the data-encoding byte. Never fails.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            ELFDATA2LSB => Self::Little,
            ELFDATA2MSB => Self::Big,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw data-encoding byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Little => ELFDATA2LSB,
            Self::Big => ELFDATA2MSB,
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for DataEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => f.write_str("little endian"),
            Self::Big => f.write_str("big endian"),
            Self::Unknown(raw) => write!(f, "invalid data encoding ({raw:#04x})"),
        }
    }
}

/// Position and width of one field inside a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Byte offset from the start of the structure.
    pub offset: u64,
    /// Width in bytes (at most 8).
    pub width: u64,
}

impl Field {
    /// Creates a field descriptor.
    #[must_use]
    pub const fn new(offset: u64, width: u64) -> Self {
        Self { offset, width }
    }

    /// Reads this field from `data` as a little-endian integer.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OutOfBounds`] if the field runs past `data`.
    pub fn read(self, data: &[u8]) -> Result<u64, ElfError> {
        read_uint(data, self.offset, self.width)
    }

    /// Reads a field that is at most 4 bytes wide.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "only used for fields whose layout width is 4 bytes or less"
    )]
    pub(crate) fn read_u32(self, data: &[u8]) -> Result<u32, ElfError> {
        debug_assert!(self.width <= 4);
        self.read(data).map(|v| v as u32)
    }

    /// Copies the raw bytes of this field out of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::OutOfBounds`] if the field runs past `data`.
    pub fn bytes(self, data: &[u8]) -> Result<&[u8], ElfError> {
        window(data, self.offset, self.width)
    }

    /// Formats `value` as fixed-width hex for this field, most significant
    /// byte first (two digits per byte of width).
    #[must_use]
    pub fn hex(self, value: u64) -> String {
        #[expect(clippy::cast_possible_truncation, reason = "field widths are at most 8 bytes")]
        let digits = (self.width * 2) as usize;
        format!("{value:0digits$x}")
    }

    /// Offset of the first byte past this field.
    #[must_use]
    pub const fn end(self) -> u64 {
        self.offset + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_from_raw() {
        assert_eq!(ElfClass::from_raw(1), Ok(ElfClass::ThirtyTwo));
        assert_eq!(ElfClass::from_raw(2), Ok(ElfClass::SixtyFour));
        assert_eq!(ElfClass::from_raw(0), Err(ElfError::UnrecognizedClass(0)));
        assert_eq!(ElfClass::from_raw(3), Err(ElfError::UnrecognizedClass(3)));
    }

    #[test]
    fn class_round_trips_raw() {
        for class in [ElfClass::ThirtyTwo, ElfClass::SixtyFour] {
            assert_eq!(ElfClass::from_raw(class.raw()), Ok(class));
        }
    }

    #[test]
    fn address_width_follows_class() {
        assert_eq!(ElfClass::ThirtyTwo.address_width(), 4);
        assert_eq!(ElfClass::SixtyFour.address_width(), 8);
    }

    #[test]
    fn data_encoding_is_total() {
        assert_eq!(DataEncoding::from_raw(1), DataEncoding::Little);
        assert_eq!(DataEncoding::from_raw(2), DataEncoding::Big);
        assert_eq!(DataEncoding::from_raw(9), DataEncoding::Unknown(9));
        assert_eq!(DataEncoding::Unknown(9).raw(), 9);
    }

    #[test]
    fn field_reads_relative_to_slice() {
        let data = [0u8, 0, 0x34, 0x12, 0xff];
        let field = Field::new(2, 2);
        assert_eq!(field.read(&data), Ok(0x1234));
        assert_eq!(field.bytes(&data), Ok(&[0x34, 0x12][..]));
        assert_eq!(field.end(), 4);
        assert!(Field::new(4, 2).read(&data).is_err());
    }

    #[test]
    fn field_hex_is_fixed_width() {
        assert_eq!(Field::new(0, 4).hex(0x1f), "0000001f");
        assert_eq!(Field::new(0, 8).hex(0x40_1000), "0000000000401000");
        assert_eq!(Field::new(0, 1).hex(0xab), "ab");
    }
}
