// src/core/config_loader.rs

//! # Config Loader
//!
//! Reads `Shell.ini` (`[DISPLAY]` templates and `[ALIAS]` table). When the file does not
//! exist it is created once with the platform defaults and then read back like any other
//! file. An existing file is never rewritten, so keys a user left out stay absent on disk
//! and are only replaced by their default at the point of use.

use crate::{
    constants::{ALIAS_SECTION, DISPLAY_SECTION},
    core::{alias::AliasTable, paths},
    models::{ConfigFile, DisplaySection, TemplateKind, Templates},
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Path(#[from] paths::PathError),
    #[error("I/O error on configuration file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse configuration file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize the default configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The configuration as consumed by the shell session.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Where the configuration was read from.
    pub path: PathBuf,
    pub templates: Templates,
    pub aliases: AliasTable,
    /// `true` if the file did not exist and was just written with the defaults.
    pub created: bool,
}

// --- Defaults ---

const DEFAULT_PROMPT: &str = "{E} {color}{green}{U}{color}{reset}@{color}{green}{N}\
                              {color}{reset}:{color}{green}{P}{color}{reset}$ ";
const DEFAULT_HOOK: &str = "echo {a}";
const DEFAULT_INTRO: &str = concat!(
    "{S} \t{V} \t[{s}, {o}] {n}",
    "Runtime \t{v} \t[{e}]{n}",
    "custom-shell \t{c} \t\t[MIT]{n}",
    "{n}{color}{bgwhite}{color}{bold}{blue}",
    "*** {D} {T} - Welcome in custom-shell {U} ! ***",
    "{color}{reset}{n}",
);
const DEFAULT_QUIT: &str = concat!(
    "{n}{color}{bgwhite}{color}{underline}{red}",
    "*** {D} {T} - Bye {U} ! ***",
    "{color}{reset}{n}",
);

#[cfg(windows)]
const DEFAULT_ALIASES: &[(&str, &str)] = &[("pyc ", "python -c "), ("pym ", "python -m ")];
#[cfg(not(windows))]
const DEFAULT_ALIASES: &[(&str, &str)] = &[("pyc ", "python3 -c "), ("pym ", "python3 -m ")];

/// Returns the built-in default for one template.
pub fn default_template(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Prompt => DEFAULT_PROMPT,
        TemplateKind::StartIntro
        | TemplateKind::EndIntro
        | TemplateKind::StartQuit
        | TemplateKind::EndQuit => DEFAULT_HOOK,
        TemplateKind::Intro => DEFAULT_INTRO,
        TemplateKind::Quit => DEFAULT_QUIT,
    }
}

/// Returns the full default template set.
pub fn default_templates() -> Templates {
    Templates {
        prompt: default_template(TemplateKind::Prompt).to_string(),
        start_intro: default_template(TemplateKind::StartIntro).to_string(),
        intro: default_template(TemplateKind::Intro).to_string(),
        end_intro: default_template(TemplateKind::EndIntro).to_string(),
        start_quit: default_template(TemplateKind::StartQuit).to_string(),
        quit: default_template(TemplateKind::Quit).to_string(),
        end_quit: default_template(TemplateKind::EndQuit).to_string(),
    }
}

/// Returns the default alias table for this platform.
pub fn default_aliases() -> AliasTable {
    DEFAULT_ALIASES.iter().copied().collect()
}

/// Builds the configuration written on first run.
pub fn default_config() -> ConfigFile {
    let display = DisplaySection {
        prompt: Some(DEFAULT_PROMPT.to_string()),
        start_intro: Some(DEFAULT_HOOK.to_string()),
        end_intro: Some(DEFAULT_HOOK.to_string()),
        intro: Some(DEFAULT_INTRO.to_string()),
        start_quit: Some(DEFAULT_HOOK.to_string()),
        end_quit: Some(DEFAULT_HOOK.to_string()),
        quit: Some(DEFAULT_QUIT.to_string()),
    };
    let alias = DEFAULT_ALIASES
        .iter()
        .map(|(alias, command)| (alias.to_string(), toml::Value::String(command.to_string())))
        .collect();
    ConfigFile { display, alias }
}

/// The configuration used when the file at `path` cannot be loaded.
pub fn fallback_config(path: PathBuf) -> LoadedConfig {
    LoadedConfig {
        path,
        templates: default_templates(),
        aliases: default_aliases(),
        created: false,
    }
}

// --- Loading ---

/// Loads the configuration from `~/Shell.ini`, creating it first if needed.
pub fn load_user_config() -> Result<LoadedConfig, ConfigError> {
    let path = paths::get_config_path()?;
    load_from(&path)
}

/// Loads the configuration from `path`, creating it with the defaults if it is absent.
pub fn load_from(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let created = ensure_config_file(path)?;
    let config = read_config_file(path)?;
    Ok(LoadedConfig {
        path: path.to_path_buf(),
        templates: resolve_templates(&config.display),
        aliases: resolve_aliases(&config.alias),
        created,
    })
}

/// Writes the default configuration to `path` if no file exists there.
///
/// Returns `true` if the file was created.
pub fn ensure_config_file(path: &Path) -> Result<bool, ConfigError> {
    log::debug!("Get configuration...");
    if path.exists() {
        return Ok(false);
    }

    let toml_string = toml::to_string_pretty(&default_config())?;
    fs::write(path, toml_string).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Default configuration saved to {}", path.display());
    Ok(true)
}

/// Reads and parses the configuration file at `path`.
pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Resolves every template, falling back to the default for each missing key.
pub fn resolve_templates(display: &DisplaySection) -> Templates {
    let resolve = |kind: TemplateKind| -> String {
        match display.get(kind) {
            Some(value) => value.to_string(),
            None => {
                log::warn!(
                    "Configuration key [{}] {} is missing, using the default.",
                    DISPLAY_SECTION,
                    kind.key()
                );
                default_template(kind).to_string()
            }
        }
    };
    Templates {
        prompt: resolve(TemplateKind::Prompt),
        start_intro: resolve(TemplateKind::StartIntro),
        intro: resolve(TemplateKind::Intro),
        end_intro: resolve(TemplateKind::EndIntro),
        start_quit: resolve(TemplateKind::StartQuit),
        quit: resolve(TemplateKind::Quit),
        end_quit: resolve(TemplateKind::EndQuit),
    }
}

/// Builds the alias table from the `[ALIAS]` section, in file order.
pub fn resolve_aliases(section: &toml::Table) -> AliasTable {
    section
        .iter()
        .filter_map(|(alias, value)| match value.as_str() {
            Some(command) => Some((alias.clone(), command.to_string())),
            None => {
                log::warn!(
                    "Ignoring [{}] entry {:?}: its value is not a string.",
                    ALIAS_SECTION,
                    alias
                );
                None
            }
        })
        .collect()
}
