// src/system/workdir.rs

//! Recovery from a working directory that vanished underneath the shell.

use crate::constants::MAX_RECOVERY_ATTEMPTS;
use std::env;
use std::io;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkdirError {
    #[error("No usable working directory found after {attempts} attempts, starting from '{start}'.")]
    Exhausted { start: PathBuf, attempts: u32 },
}

/// Moves the process into the nearest existing ancestor of `last_known`, falling back
/// to the filesystem root. Returns the directory that was entered.
pub fn recover_working_directory(last_known: &Path) -> Result<PathBuf, WorkdirError> {
    recover_with(last_known, MAX_RECOVERY_ATTEMPTS, |dir| env::set_current_dir(dir))
}

/// Tries each candidate with `chdir`, making at most `max_attempts` attempts.
///
/// The root is always the last attempt, however deep `last_known` is.
pub fn recover_with(
    last_known: &Path,
    max_attempts: u32,
    mut chdir: impl FnMut(&Path) -> io::Result<()>,
) -> Result<PathBuf, WorkdirError> {
    let max_attempts = max_attempts as usize;
    let root = Path::new(MAIN_SEPARATOR_STR);
    let candidates = last_known
        .ancestors()
        .filter(|dir| !dir.as_os_str().is_empty() && *dir != root)
        .take(max_attempts.saturating_sub(1))
        .chain(std::iter::once(root))
        .take(max_attempts);

    let mut attempts = 0;
    for candidate in candidates {
        attempts += 1;
        match chdir(candidate) {
            Ok(()) => {
                log::warn!("Working directory recovered to {}", candidate.display());
                return Ok(candidate.to_path_buf());
            }
            Err(e) => log::debug!("Cannot enter {}: {}", candidate.display(), e),
        }
    }

    log::error!(
        "Working directory recovery gave up after {} attempts.",
        attempts
    );
    Err(WorkdirError::Exhausted {
        start: last_known.to_path_buf(),
        attempts,
    })
}
