// src/core/paths.rs

use crate::constants::CONFIG_FILENAME;
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref CONFIG_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find the user's home directory.")]
    HomeDirNotFound,
}

/// Returns the path of the configuration file (`~/Shell.ini`).
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value.
pub fn get_config_path() -> Result<PathBuf, PathError> {
    // A poisoned lock still holds a valid cached path.
    let mut cached_path_guard = CONFIG_PATH
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::home_dir()
        .ok_or(PathError::HomeDirNotFound)?
        .join(CONFIG_FILENAME);
    log::debug!("Configuration path resolved to {}", config_path.display());

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a user-typed path.
///
/// An undefined variable is not an error here: the path is then only tilde-expanded and
/// left for `chdir` to reject.
pub fn expand_user_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(e) => {
            log::debug!("Could not expand variables in '{}': {}", raw, e);
            PathBuf::from(shellexpand::tilde(raw).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_in_home_and_memoized() {
        let first = get_config_path().unwrap();
        let second = get_config_path().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.file_name().unwrap(), CONFIG_FILENAME);
        assert_eq!(first.parent(), dirs::home_dir().as_deref());
    }

    #[test]
    fn test_expand_user_path_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_user_path("~"), home);
        assert_eq!(expand_user_path("~/projects"), home.join("projects"));
    }

    #[test]
    fn test_expand_user_path_keeps_plain_paths() {
        assert_eq!(expand_user_path("/tmp/x"), PathBuf::from("/tmp/x"));
        assert_eq!(expand_user_path("relative dir"), PathBuf::from("relative dir"));
    }

    #[test]
    fn test_expand_user_path_undefined_variable_is_left_alone() {
        let raw = "$CUSTOM_SHELL_SURELY_UNDEFINED_VAR/x";
        assert_eq!(expand_user_path(raw), PathBuf::from(raw));
    }
}
