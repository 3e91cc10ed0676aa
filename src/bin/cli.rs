// src/bin/cli.rs
use lender_cache::cli;

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("Error: {e}");
    }
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
