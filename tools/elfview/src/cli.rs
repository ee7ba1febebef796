//! Command-line interface definitions for elfview.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{View, ViewConfig};

/// Print the file header, program headers, and section headers of an ELF file.
#[derive(Parser)]
#[command(name = "elfview", version, about)]
pub struct Cli {
    /// Path to the ELF file.
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// Print the ELF file header.
    #[arg(long, short = 'e')]
    pub elf: bool,

    /// Print the program header table.
    #[arg(long, short = 'p')]
    pub program: bool,

    /// Print the section header table.
    #[arg(long, short = 's')]
    pub section: bool,

    /// Print all headers.
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Only list sections holding executable instructions.
    #[arg(long)]
    pub exec: bool,

    /// Dump raw bytes at a virtual address (hex with `0x` prefix, or decimal).
    #[arg(long, short = 'x', value_name = "ADDR", value_parser = parse_address)]
    pub hex_dump: Option<u64>,

    /// Number of bytes for `--hex-dump`.
    #[arg(long, short = 'n', default_value_t = 16)]
    pub count: u64,

    /// Configuration file (defaults to ./elfview.toml if present).
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Suppress warnings.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print decode diagnostics and timing to stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Resolve which views to print.
    ///
    /// `--all` selects everything. Otherwise the individual flags are used;
    /// with none of them given, the configured defaults apply unless a hex
    /// dump was requested.
    pub fn views(&self, config: &ViewConfig) -> Vec<View> {
        if self.all {
            return vec![View::Header, View::Program, View::Section];
        }

        let selected: Vec<View> = [
            (self.elf, View::Header),
            (self.program, View::Program),
            (self.section || self.exec, View::Section),
        ]
        .into_iter()
        .filter_map(|(on, view)| on.then_some(view))
        .collect();

        if selected.is_empty() && self.hex_dump.is_none() {
            config.default_views.clone()
        } else {
            selected
        }
    }
}

/// Parse a `0x`-prefixed hexadecimal or plain decimal address.
fn parse_address(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address `{s}`: {e}"))
}
