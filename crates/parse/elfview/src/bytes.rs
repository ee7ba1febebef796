//! Bounds-checked little-endian field extraction.
//!
//! Every read of the raw file buffer goes through this module. Offsets are
//! taken as `u64` because they come straight out of header fields; a range
//! that overflows or runs past the end of the buffer yields
//! [`ElfError::OutOfBounds`] instead of a panic.

use alloc::string::String;
use core::fmt::Write;

use crate::error::ElfError;

/// Returns `buffer[start..start + len]`, or [`ElfError::OutOfBounds`].
///
/// # Errors
///
/// Fails if the range overflows `u64`/`usize` or ends past `buffer.len()`.
pub fn window(buffer: &[u8], start: u64, len: u64) -> Result<&[u8], ElfError> {
    let oob = ElfError::OutOfBounds {
        start,
        len,
        available: buffer.len(),
    };
    let end = start.checked_add(len).ok_or(oob)?;
    let start = usize::try_from(start).map_err(|_| oob)?;
    let end = usize::try_from(end).map_err(|_| oob)?;
    buffer.get(start..end).ok_or(oob)
}

/// Reads `len` bytes at `start` as a little-endian unsigned integer.
///
/// Widths above 8 bytes keep only the low 8 bytes of the value.
///
/// # Errors
///
/// Returns [`ElfError::OutOfBounds`] if `start + len` exceeds the buffer.
pub fn read_uint(buffer: &[u8], start: u64, len: u64) -> Result<u64, ElfError> {
    let bytes = window(buffer, start, len)?;
    Ok(bytes
        .iter()
        .take(8)
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

/// Reads `len` bytes at `start` and renders them as fixed-width lowercase hex,
/// most significant byte first.
///
/// # Errors
///
/// Same bounds rule as [`read_uint`].
pub fn read_hex(buffer: &[u8], start: u64, len: u64) -> Result<String, ElfError> {
    window(buffer, start, len).map(hex_be)
}

/// Renders little-endian `bytes` as hex with the most significant byte first.
#[must_use]
pub fn hex_be(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes.iter().rev() {
        // Writing to a String cannot fail.
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Returns the bytes from `start` up to (excluding) the first NUL byte.
///
/// Reaching the end of the buffer without a terminator is not an error: the
/// remainder of the buffer is returned.
///
/// # Errors
///
/// Returns [`ElfError::OutOfBounds`] if `start` is past the end of the buffer.
pub fn scan_until_zero(buffer: &[u8], start: u64) -> Result<&[u8], ElfError> {
    let rest = usize::try_from(start)
        .ok()
        .and_then(|s| buffer.get(s..))
        .ok_or(ElfError::OutOfBounds {
            start,
            len: 0,
            available: buffer.len(),
        })?;
    let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    Ok(&rest[..end])
}
