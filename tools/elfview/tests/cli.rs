//! Integration tests for the elfview binary.
//!
//! Each test writes a synthetic ELF file into a temporary directory and runs
//! the built binary against it as a subprocess.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const CODE: [u8; 8] = [0x55, 0x48, 0x89, 0xe5, 0x90, 0x5d, 0xc3, 0xcc];
const STRTAB: &[u8] = b"\0.text\0.data\0.shstrtab\0";

fn put(buf: &mut [u8], offset: usize, width: usize, value: u64) {
    buf[offset..offset + width].copy_from_slice(&value.to_le_bytes()[..width]);
}

/// A 32-bit executable: one `PT_LOAD` segment, `.text` at `0x8049000`
/// holding [`CODE`], and a writable `.data`.
fn sample_elf32() -> Vec<u8> {
    let mut buf = vec![0u8; 0x80];
    buf[..4].copy_from_slice(b"\x7fELF");
    buf[4] = 1;
    buf[5] = 1;
    buf[6] = 1;
    put(&mut buf, 16, 2, 2);
    put(&mut buf, 18, 2, 3);
    put(&mut buf, 20, 4, 1);
    put(&mut buf, 24, 4, 0x0804_9000);
    put(&mut buf, 28, 4, 52);
    put(&mut buf, 40, 2, 52);
    put(&mut buf, 42, 2, 32);
    put(&mut buf, 44, 2, 1);
    put(&mut buf, 46, 2, 40);
    put(&mut buf, 48, 2, 4);
    put(&mut buf, 50, 2, 3);

    // PT_LOAD, R+E
    put(&mut buf, 52, 4, 1);
    put(&mut buf, 56, 4, 0x80);
    put(&mut buf, 60, 4, 0x0804_9000);
    put(&mut buf, 64, 4, 0x0804_9000);
    put(&mut buf, 68, 4, CODE.len() as u64);
    put(&mut buf, 72, 4, CODE.len() as u64);
    put(&mut buf, 76, 4, 5);
    put(&mut buf, 80, 4, 0x1000);

    buf.extend_from_slice(&CODE);
    let data_offset = buf.len();
    buf.extend_from_slice(&[0xaa; 4]);
    let strtab_offset = buf.len();
    buf.extend_from_slice(STRTAB);
    buf.resize(buf.len().next_multiple_of(4), 0);
    let shoff = buf.len();
    put(&mut buf, 32, 4, shoff as u64);

    buf.resize(shoff + 4 * 40, 0);
    let sections: [(u64, u64, u64, u64, usize, usize, u64); 3] = [
        // name, type, flags, addr, offset, size, align
        (1, 1, 0x6, 0x0804_9000, 0x80, CODE.len(), 16),
        (7, 1, 0x3, 0x0804_a000, data_offset, 4, 4),
        (13, 3, 0, 0, strtab_offset, STRTAB.len(), 1),
    ];
    for (i, (name, ty, flags, addr, offset, size, align)) in sections.into_iter().enumerate() {
        let entry = shoff + (i + 1) * 40;
        put(&mut buf, entry, 4, name);
        put(&mut buf, entry + 4, 4, ty);
        put(&mut buf, entry + 8, 4, flags);
        put(&mut buf, entry + 12, 4, addr);
        put(&mut buf, entry + 16, 4, offset as u64);
        put(&mut buf, entry + 20, 4, size as u64);
        put(&mut buf, entry + 32, 4, align);
    }
    buf
}

struct Fixture {
    dir: TempDir,
    elf: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let elf = dir.path().join("sample.elf");
        std::fs::write(&elf, sample_elf32()).expect("failed to write sample");
        Self { dir, elf }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run elfview from inside the fixture directory.
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_elfview"))
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("failed to execute elfview")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            output.status.success(),
            "elfview {args:?} failed (exit={:?}):\nstdout:\n{stdout}\nstderr:\n{stderr}",
            output.status.code(),
        );
        stdout
    }

    fn elf(&self) -> &str {
        self.elf.to_str().expect("temp path is UTF-8")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn prints_file_header() {
    let fixture = Fixture::new();
    let stdout = fixture.run_ok(&["-f", fixture.elf(), "-e"]);
    assert!(stdout.contains("ELF Header:"));
    assert!(stdout.contains("32-bit"));
    assert!(stdout.contains("x86"));
    assert!(stdout.contains("0x8049000"));
    assert!(!stdout.contains("Section Headers:"));
}

#[test]
fn prints_section_names() {
    let fixture = Fixture::new();
    let stdout = fixture.run_ok(&["--file", fixture.elf(), "--section"]);
    assert!(stdout.contains("Section Headers:"));
    for name in [".text", ".data", ".shstrtab"] {
        assert!(stdout.contains(name), "missing {name} in:\n{stdout}");
    }
    let data = stdout.lines().find(|l| l.contains(".data")).unwrap();
    assert!(data.contains("WA"));
}

#[test]
fn exec_lists_only_executable_sections() {
    let fixture = Fixture::new();
    let stdout = fixture.run_ok(&["-f", fixture.elf(), "--exec"]);
    assert!(stdout.contains(".text"));
    assert!(!stdout.contains(".data"));
}

#[test]
fn defaults_print_everything() {
    let fixture = Fixture::new();
    let stdout = fixture.run_ok(&["-f", fixture.elf()]);
    assert!(stdout.contains("ELF Header:"));
    assert!(stdout.contains("Program Headers:"));
    assert!(stdout.contains("Section Headers:"));
}

#[test]
fn config_file_in_working_directory() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.path().join("elfview.toml"),
        "default_views = [\"program\"]\nshow_legend = false\n",
    )
    .unwrap();
    let stdout = fixture.run_ok(&["-f", fixture.elf()]);
    assert!(stdout.contains("Program Headers:"));
    assert!(!stdout.contains("ELF Header:"));
    assert!(!stdout.contains("Key to Flags"));
}

#[test]
fn invalid_config_fails() {
    let fixture = Fixture::new();
    let config = fixture.path().join("bad.toml");
    std::fs::write(&config, "no_such_key = 1\n").unwrap();
    let output = fixture.run(&["-f", fixture.elf(), "-c", config.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn hex_dump_at_entry_point() {
    let fixture = Fixture::new();
    let stdout = fixture.run_ok(&["-f", fixture.elf(), "-x", "0x8049000", "-n", "8"]);
    assert!(stdout.contains("  0x08049000  55 48 89 e5 90 5d c3 cc"), "stdout:\n{stdout}");
    assert!(!stdout.contains("ELF Header:"));
}

#[test]
fn hex_dump_of_unmapped_address_fails() {
    let fixture = Fixture::new();
    let output = fixture.run(&["-f", fixture.elf(), "-x", "0x10"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not covered by any section"), "stderr:\n{stderr}");
}

#[test]
fn missing_file_argument_is_usage_error() {
    let fixture = Fixture::new();
    let output = fixture.run(&["-e"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn non_elf_input_fails() {
    let fixture = Fixture::new();
    let text = fixture.path().join("notes.txt");
    std::fs::write(&text, "just some text, not an object file\n").unwrap();
    let output = fixture.run(&["-f", text.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not an ELF file"), "stderr:\n{stderr}");
}

#[test]
fn missing_input_file_fails() {
    let fixture = Fixture::new();
    let output = fixture.run(&["-f", "does-not-exist.elf"]);
    assert!(!output.status.success());
}
