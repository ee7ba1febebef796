//! Text rendering of decoded headers.
//!
//! Each function returns the finished block as a `String`; `main` decides
//! where it goes. The layout is for people, not for scripts.

use std::fmt::Write;

use elfview::{
    ElfError, ElfImage, Field, ProgramHeaderLayout, SectionHeaderLayout, SectionHeader,
};

use crate::config::ViewConfig;

const SEGMENT_LEGEND: &str = "Key to Flags: R (read), W (write), E (execute)";

const SECTION_LEGEND: &str = "Key to Flags: W (write), A (alloc), X (execute), M (merge), \
S (strings), I (info), O (link order), N (OS nonconforming), G (group), T (TLS)";

/// Bytes per line of a hex dump.
const DUMP_WIDTH: usize = 16;

/// Formats `value` as `0x`-prefixed hex sized to `field`.
fn hex(field: Field, value: u64, config: &ViewConfig) -> String {
    let digits = field.hex(value);
    if !config.strip_leading_zeros {
        return format!("0x{digits}");
    }
    match digits.trim_start_matches('0') {
        "" => "0x0".to_owned(),
        trimmed => format!("0x{trimmed}"),
    }
}

fn byte_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the file header as a key/value list.
pub fn file_header(image: &ElfImage, config: &ViewConfig) -> String {
    let header = image.header();
    let layout = header.layout();
    let mut out = String::from("ELF Header:\n");

    let mut row = |key: &str, value: String| {
        let _ = writeln!(out, "  {:<36}{value}", format!("{key}:"));
    };

    row("Magic", byte_list(&header.magic));
    row("Class", header.class.to_string());
    row("Data", header.data.to_string());
    row("Header Version", header.ident_version.to_string());
    row("OS/ABI", header.os_abi.to_string());
    row("Padding", byte_list(&header.padding));
    row("Type", header.e_type.to_string());
    row("Machine", header.e_machine.to_string());
    row("Version", format!("{:#x}", header.e_version));
    row("Entry Point", hex(layout.entry, header.e_entry, config));
    row(
        "Start of Program Headers",
        format!("{} (bytes into file)", hex(layout.phoff, header.e_phoff, config)),
    );
    row(
        "Start of Section Headers",
        format!("{} (bytes into file)", hex(layout.shoff, header.e_shoff, config)),
    );
    row("Flags", hex(layout.flags, header.e_flags, config));
    row(
        "Header Size",
        format!("{} (bytes)", hex(layout.ehsize, header.e_ehsize, config)),
    );
    row(
        "Program Header Entry Size",
        format!("{} (bytes)", hex(layout.phentsize, header.e_phentsize, config)),
    );
    row("Program Header Entries", hex(layout.phnum, header.e_phnum, config));
    row(
        "Section Header Entry Size",
        format!("{} (bytes)", hex(layout.shentsize, header.e_shentsize, config)),
    );
    row("Section Header Entries", hex(layout.shnum, header.e_shnum, config));
    row(
        "Section Header String Table Index",
        hex(layout.shstrndx, header.e_shstrndx, config),
    );
    out
}

/// Renders the program header table.
pub fn program_headers(image: &ElfImage, config: &ViewConfig) -> String {
    let layout = ProgramHeaderLayout::for_class(image.class());
    let segments = image.program_headers();
    let mut out = String::new();

    if segments.is_empty() {
        out.push_str("There are no program headers in this file.\n");
        return out;
    }

    let _ = writeln!(out, "Program Headers:");
    let _ = writeln!(
        out,
        "  {:<16}{:<20}{:<20}{:<20}{:<20}{:<20}{:<6}Align",
        "Type", "VirtAddr", "PhysAddr", "Offset", "FileSiz", "MemSiz", "Flags",
    );
    for ph in segments {
        let _ = writeln!(
            out,
            "  {:<16}{:<20}{:<20}{:<20}{:<20}{:<20}{:<6}{}",
            ph.p_type.to_string(),
            hex(layout.p_vaddr, ph.p_vaddr, config),
            hex(layout.p_paddr, ph.p_paddr, config),
            hex(layout.p_offset, ph.p_offset, config),
            hex(layout.p_filesz, ph.p_filesz, config),
            hex(layout.p_memsz, ph.p_memsz, config),
            ph.p_flags.to_rwe(),
            hex(layout.p_align, ph.p_align, config),
        );
    }

    if config.show_legend {
        let _ = writeln!(out, "{SEGMENT_LEGEND}");
    }
    out
}

/// Renders the section header table.
///
/// With `exec_only`, only sections holding executable instructions are
/// listed.
pub fn section_headers(image: &ElfImage, config: &ViewConfig, exec_only: bool) -> String {
    let layout = SectionHeaderLayout::for_class(image.class());
    let mut out = String::new();
    let sections: Vec<&SectionHeader> = if exec_only {
        image.executable_sections().collect()
    } else {
        image.section_headers().iter().collect()
    };

    let _ = writeln!(out, "Section Headers:");
    let _ = writeln!(
        out,
        "  {:<6}{:<20}{:<16}{:<20}{:<12}{:<12}{:<8}{:<8}{:<8}{:<8}EntSize",
        "[Nr]", "Name", "Type", "Address", "Offset", "Size", "Flags", "Info", "Link", "Align",
    );
    for sh in sections {
        let _ = writeln!(
            out,
            "  {:<6}{:<20}{:<16}{:<20}{:<12}{:<12}{:<8}{:<8}{:<8}{:<8}{}",
            format!("[{}]", sh.index),
            sh.name(),
            sh.sh_type.to_string(),
            hex(layout.sh_addr, sh.sh_addr, config),
            hex(layout.sh_offset, sh.sh_offset, config),
            hex(layout.sh_size, sh.sh_size, config),
            sh.sh_flags.letters(),
            sh.sh_info,
            sh.sh_link,
            hex(layout.sh_addralign, sh.sh_addralign, config),
            hex(layout.sh_entsize, sh.sh_entsize, config),
        );
    }

    if config.show_legend {
        let _ = writeln!(out, "{SECTION_LEGEND}");
    }
    out
}

/// Renders `count` bytes starting at virtual address `vaddr`, sixteen per line.
///
/// Addresses are padded to the file's address width.
///
/// # Errors
///
/// Fails if the address cannot be translated or the range runs past the end
/// of the file.
pub fn hex_dump(image: &ElfImage, vaddr: u64, count: u64) -> Result<String, ElfError> {
    let opcodes = image.read_opcodes(vaddr, count)?;
    #[expect(clippy::cast_possible_truncation, reason = "address widths are 4 or 8 bytes")]
    let digits = (image.class().address_width() * 2) as usize;
    let mut out = String::new();
    let mut addr = vaddr;
    for line in opcodes.chunks(DUMP_WIDTH) {
        let _ = writeln!(out, "  0x{addr:0digits$x}  {}", line.join(" "));
        addr = addr.wrapping_add(DUMP_WIDTH as u64);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: [u8; 8] = [0x55, 0x48, 0x89, 0xe5, 0x90, 0x5d, 0xc3, 0xcc];
    const STRTAB: &[u8] = b"\0.text\0.shstrtab\0";

    fn put(buf: &mut [u8], offset: usize, width: usize, value: u64) {
        buf[offset..offset + width].copy_from_slice(&value.to_le_bytes()[..width]);
    }

    /// A 64-bit executable with one `PT_LOAD` segment and a `.text` section
    /// holding [`CODE`] at `0x401000`.
    fn sample_elf() -> Vec<u8> {
        let mut buf = vec![0u8; 0x100];
        buf[..4].copy_from_slice(b"\x7fELF");
        buf[4] = 2;
        buf[5] = 1;
        buf[6] = 1;
        put(&mut buf, 16, 2, 2);
        put(&mut buf, 18, 2, 0x3e);
        put(&mut buf, 20, 4, 1);
        put(&mut buf, 24, 8, 0x0040_1000);
        put(&mut buf, 32, 8, 64);
        put(&mut buf, 52, 2, 64);
        put(&mut buf, 54, 2, 56);
        put(&mut buf, 56, 2, 1);
        put(&mut buf, 58, 2, 64);
        put(&mut buf, 60, 2, 3);
        put(&mut buf, 62, 2, 2);

        // PT_LOAD, R+E
        put(&mut buf, 64, 4, 1);
        put(&mut buf, 68, 4, 5);
        put(&mut buf, 72, 8, 0x100);
        put(&mut buf, 80, 8, 0x0040_1000);
        put(&mut buf, 88, 8, 0x0040_1000);
        put(&mut buf, 96, 8, CODE.len() as u64);
        put(&mut buf, 104, 8, CODE.len() as u64);
        put(&mut buf, 112, 8, 0x1000);

        buf.extend_from_slice(&CODE);
        let strtab_offset = buf.len();
        buf.extend_from_slice(STRTAB);
        buf.resize(buf.len().next_multiple_of(8), 0);
        let shoff = buf.len();
        put(&mut buf, 40, 8, shoff as u64);

        buf.resize(shoff + 3 * 64, 0);
        let text = shoff + 64;
        put(&mut buf, text, 4, 1);
        put(&mut buf, text + 4, 4, 1);
        put(&mut buf, text + 8, 8, 0x6);
        put(&mut buf, text + 16, 8, 0x0040_1000);
        put(&mut buf, text + 24, 8, 0x100);
        put(&mut buf, text + 32, 8, CODE.len() as u64);
        put(&mut buf, text + 48, 8, 16);
        let strtab = shoff + 128;
        put(&mut buf, strtab, 4, 7);
        put(&mut buf, strtab + 4, 4, 3);
        put(&mut buf, strtab + 24, 8, strtab_offset as u64);
        put(&mut buf, strtab + 32, 8, STRTAB.len() as u64);
        put(&mut buf, strtab + 48, 8, 1);
        buf
    }

    fn image() -> ElfImage {
        ElfImage::parse(sample_elf()).unwrap()
    }

    #[test]
    fn hex_strips_leading_zeros() {
        let config = ViewConfig::default();
        assert_eq!(hex(Field::new(0, 8), 0x0040_1000, &config), "0x401000");
        assert_eq!(hex(Field::new(0, 4), 0, &config), "0x0");
    }

    #[test]
    fn hex_keeps_leading_zeros_when_configured() {
        let config = ViewConfig {
            strip_leading_zeros: false,
            ..ViewConfig::default()
        };
        assert_eq!(hex(Field::new(0, 8), 0x0040_1000, &config), "0x0000000000401000");
        assert_eq!(hex(Field::new(0, 2), 0, &config), "0x0000");
    }

    #[test]
    fn file_header_lists_decoded_fields() {
        let text = file_header(&image(), &ViewConfig::default());
        assert!(text.starts_with("ELF Header:\n"));
        assert!(text.contains("7f 45 4c 46"));
        assert!(text.contains("64-bit"));
        assert!(text.contains("little endian"));
        assert!(text.contains("UNIX - System V"));
        assert!(text.contains("EXEC (executable)"));
        assert!(text.contains("x86-64"));
        assert!(text.contains("0x401000"));
        assert!(text.contains("0x40 (bytes into file)"));
    }

    #[test]
    fn program_headers_show_rwe_flags() {
        let text = program_headers(&image(), &ViewConfig::default());
        let row = text.lines().find(|l| l.trim_start().starts_with("LOAD")).unwrap();
        assert!(row.contains("R-E"));
        assert!(row.contains("0x401000"));
        assert!(row.ends_with("0x1000"));
        assert!(text.contains(SEGMENT_LEGEND));
    }

    #[test]
    fn legend_can_be_hidden() {
        let config = ViewConfig {
            show_legend: false,
            ..ViewConfig::default()
        };
        assert!(!program_headers(&image(), &config).contains("Key to Flags"));
        assert!(!section_headers(&image(), &config, false).contains("Key to Flags"));
    }

    #[test]
    fn section_headers_list_names_and_flags() {
        let text = section_headers(&image(), &ViewConfig::default(), false);
        let text_row = text.lines().find(|l| l.contains(".text")).unwrap();
        assert!(text_row.contains("[1]"));
        assert!(text_row.contains("PROGBITS"));
        assert!(text_row.contains("AX"));
        assert!(text.contains(".shstrtab"));
        assert!(text.contains("STRTAB"));
        assert!(text.contains(SECTION_LEGEND));
    }

    #[test]
    fn exec_only_filters_sections() {
        let text = section_headers(&image(), &ViewConfig::default(), true);
        assert!(text.contains(".text"));
        assert!(!text.contains(".shstrtab"));
    }

    #[test]
    fn hex_dump_reads_mapped_bytes() {
        let text = hex_dump(&image(), 0x0040_1000, 4).unwrap();
        assert_eq!(text, "  0x0000000000401000  55 48 89 e5\n");
    }

    #[test]
    fn hex_dump_wraps_lines() {
        let text = hex_dump(&image(), 0x0040_1002, 20).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  0x0000000000401002  89 e5 90 5d c3 cc 00"));
        assert!(lines[1].starts_with("  0x0000000000401012  "));
    }

    #[test]
    fn hex_dump_unmapped_address() {
        assert_eq!(
            hex_dump(&image(), 0x10, 4),
            Err(ElfError::AddressNotMapped(0x10))
        );
    }
}
