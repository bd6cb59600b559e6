// src/cli/handlers/exit.rs

use crate::cli::dispatcher::{Flow, Shell};

/// Ends the command loop. Any argument text is ignored.
pub fn handle(args: &str, _shell: &mut Shell) -> Flow {
    if !args.is_empty() {
        log::debug!("Ignoring exit arguments: {:?}", args);
    }
    Flow::Stop
}
