//! tategaki CLI - vertical-writing PDF text extraction tool

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

#[derive(Parser)]
#[command(name = "tategaki")]
#[command(version)]
#[command(about = "Extract the text of Japanese vertical-writing PDFs", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output text file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = cmd_extract(&cli.input, &cli.output) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("Extracting {} -> {}", input.display(), output.display());

    let stats = tategaki::extract_file(input, output)?;

    println!("{} {}", "Saved to".green(), output.display());
    println!("  {} {}", "└─".dimmed(), stats);

    Ok(())
}
