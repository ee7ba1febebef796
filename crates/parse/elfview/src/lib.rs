//! ELF header decoder.
//!
//! Decodes the file header, program header table, and section header table
//! of 32-bit and 64-bit ELF files from a raw byte buffer, and resolves section
//! names through the section-name string table. Every read is bounds-checked;
//! malformed input produces an [`ElfError`], never a panic.
//!
//! # Usage
//!
//! ```no_run
//! use elfview::{ElfImage, SectionFlags};
//!
//! fn inspect(bytes: Vec<u8>) -> Result<(), elfview::ElfError> {
//!     let image = ElfImage::parse(bytes)?;
//!     println!("{} {}", image.class(), image.header().e_machine);
//!     for section in image.sections_with_flags(SectionFlags::EXECINSTR) {
//!         println!("{} at {:#x}", section.name(), section.sh_addr);
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod bytes;
pub mod class;
pub mod codes;
pub mod error;
pub mod header;
pub mod image;
pub mod section;
pub mod segment;

pub use class::{DataEncoding, ElfClass, Field};
pub use codes::{Machine, ObjectType, OsAbi};
pub use error::ElfError;
pub use header::{ELF_MAGIC, FileHeader, FileHeaderLayout};
pub use image::ElfImage;
pub use section::{
    SectionFlags, SectionHeader, SectionHeaderLayout, SectionHeaderTable, SectionType,
};
pub use segment::{
    ProgramHeader, ProgramHeaderLayout, ProgramHeaderTable, SegmentFlags, SegmentType,
};
