//! AutoTag CLI - Enrich Markdown notes with model-generated metadata.

use autotag_cli::Cli;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = autotag_cli::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
