// src/cli/handlers/help.rs

use crate::cli::dispatcher::{Flow, Shell};

/// Hands `help [topic]` to the host interpreter's own help facility.
pub fn handle(args: &str, shell: &mut Shell) -> Flow {
    let command = if args.is_empty() {
        "help".to_string()
    } else {
        format!("help {}", args)
    };
    shell.delegate(&command);
    Flow::Continue
}
