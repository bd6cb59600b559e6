// src/cli/handlers/cd.rs

use crate::cli::dispatcher::{Flow, Shell};
use crate::core::paths;
use crate::models::Outcome;
use colored::*;
use std::env;
use std::io::ErrorKind;

/// Changes the working directory of the shell process.
///
/// A target that does not exist is handed to the host interpreter as `cd <args>`, so
/// interpreter-specific forms (drive letters, `cd -`) still get their say, but the
/// outcome is recorded as a failure either way.
pub fn handle(args: &str, shell: &mut Shell) -> Flow {
    let target = if args.is_empty() {
        match dirs::home_dir() {
            Some(home) => home,
            None => {
                let message = format!(
                    t!("shell.error.cd_failed"),
                    path = "~",
                    reason = paths::PathError::HomeDirNotFound
                );
                shell.println(&message.red().to_string());
                shell.state().set_outcome(Outcome::Failed);
                return Flow::Continue;
            }
        }
    } else {
        paths::expand_user_path(args)
    };

    log::debug!("Changing directory to {}", target.display());
    match env::set_current_dir(&target) {
        Ok(()) => {
            let outcome = match shell.state_mut().sync_cwd() {
                Ok(()) => Outcome::Succeeded,
                Err(e) => {
                    log::error!("{}", e);
                    Outcome::Failed
                }
            };
            shell.state().set_outcome(outcome);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("{} not found, delegating to the host interpreter.", target.display());
            shell.delegate(&format!("cd {}", args));
            shell.state().set_outcome(Outcome::Failed);
        }
        Err(e) => {
            let message = format!(t!("shell.error.cd_failed"), path = args, reason = e);
            shell.println(&message.red().to_string());
            shell.state().set_outcome(Outcome::Failed);
        }
    }
    Flow::Continue
}
