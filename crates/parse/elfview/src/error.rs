//! Decoding errors.

use core::fmt;

/// Errors that can occur when decoding an ELF image.
///
/// Every variant is fatal for the structure being decoded: an
/// [`ElfImage`](crate::ElfImage) is either fully decoded or not constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfError {
    /// The buffer does not start with the ELF magic bytes.
    NotAnElfFile,
    /// The class byte (`e_ident[EI_CLASS]`) is neither 32-bit nor 64-bit.
    UnrecognizedClass(u8),
    /// A field or name read extends past the end of the buffer.
    OutOfBounds {
        /// First byte of the attempted read.
        start: u64,
        /// Number of bytes requested.
        len: u64,
        /// Number of bytes actually available.
        available: usize,
    },
    /// The section-header string-table index does not name a decoded section.
    InvalidStringTableIndex {
        /// Index taken from the file header.
        index: u64,
        /// Number of decoded section headers.
        count: usize,
    },
    /// No section covers the requested virtual address.
    AddressNotMapped(u64),
}

impl fmt::Display for ElfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnElfFile => write!(f, "not an ELF file (bad magic bytes)"),
            Self::UnrecognizedClass(class) => {
                write!(f, "unrecognized ELF class {class:#04x}")
            }
            Self::OutOfBounds {
                start,
                len,
                available,
            } => write!(
                f,
                "read of {len} bytes at offset {start:#x} exceeds buffer of {available} bytes"
            ),
            Self::InvalidStringTableIndex { index, count } => write!(
                f,
                "string table index {index} out of range ({count} sections)"
            ),
            Self::AddressNotMapped(addr) => {
                write!(f, "virtual address {addr:#x} is not covered by any section")
            }
        }
    }
}

impl core::error::Error for ElfError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn display_errors() {
        let errors = [
            ElfError::NotAnElfFile,
            ElfError::UnrecognizedClass(7),
            ElfError::OutOfBounds {
                start: 0x40,
                len: 8,
                available: 12,
            },
            ElfError::InvalidStringTableIndex { index: 9, count: 3 },
            ElfError::AddressNotMapped(0x1000),
        ];
        for err in &errors {
            let msg = format!("{err}");
            assert!(!msg.is_empty());
        }
    }

    #[test]
    fn class_byte_is_reported() {
        let msg = format!("{}", ElfError::UnrecognizedClass(3));
        assert!(msg.contains("0x03"), "{msg}");
    }
}
