// src/cli/handlers/config_file.rs

use crate::cli::dispatcher::{Flow, Shell};
use crate::models::Outcome;

/// Prints the path of the configuration file.
pub fn handle(_args: &str, shell: &mut Shell) -> Flow {
    let path = shell.state().config_path().display().to_string();
    shell.println(&path);
    shell.state().set_outcome(Outcome::Succeeded);
    Flow::Continue
}
