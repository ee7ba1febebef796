//! ELF header viewer.
//!
//! Reads an ELF file, decodes its file header, program header table, and
//! section header table, and prints the requested views.

mod cli;
mod config;
mod render;
mod verbose;

use anyhow::{Context, Result};
use clap::Parser;
use elfview::{DataEncoding, ElfImage};

use config::View;
use verbose::{Timer, dprintln, vprintln};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(verbose::Verbosity::from_flags(cli.quiet, cli.verbose));

    let config = config::load(cli.config.as_deref())?;
    let image = load_image(&cli)?;

    let mut blocks = Vec::new();
    for view in cli.views(&config) {
        blocks.push(match view {
            View::Header => render::file_header(&image, &config),
            View::Program => render::program_headers(&image, &config),
            View::Section => render::section_headers(&image, &config, cli.exec),
        });
    }

    if let Some(vaddr) = cli.hex_dump {
        let dump = render::hex_dump(&image, vaddr, cli.count)
            .with_context(|| format!("cannot dump {} bytes at {vaddr:#x}", cli.count))?;
        blocks.push(format!("Hex dump of {vaddr:#x}:\n{dump}"));
    }

    println!("{}", blocks.join("\n"));
    Ok(())
}

/// Read and decode the file named on the command line.
fn load_image(cli: &cli::Cli) -> Result<ElfImage> {
    let path = &cli.file;
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    vprintln!("read {} bytes from {}", data.len(), path.display());

    let image = {
        let _t = Timer::start("decode");
        ElfImage::parse(data).with_context(|| format!("failed to decode {}", path.display()))?
    };

    let header = image.header();
    vprintln!(
        "{} {} {}, {} program headers, {} sections",
        header.class,
        header.e_machine,
        header.e_type,
        image.program_headers().len(),
        image.section_headers().len(),
    );
    if header.data != DataEncoding::Little {
        dprintln!(
            "warning: {} declares {}; fields are decoded little-endian",
            path.display(),
            header.data,
        );
    }
    Ok(image)
}
