// src/bin/custom-shell.rs

use anyhow::Result;
use colored::*;
use custom_shell::{cli::repl, t};

/// Entry point: no arguments are parsed, running the binary starts the interactive loop.
fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("\n{}: {}", t!("shell.error.label").red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    log::debug!("Starting custom-shell {}", env!("CARGO_PKG_VERSION"));
    repl::run_interactive()?;
    Ok(())
}
