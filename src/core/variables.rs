// src/core/variables.rs

//! # Variable Registry
//!
//! Maps placeholder tokens (`{U}`, `{P}`, ...) to zero-argument producers. Producers are
//! invoked on every expansion, never cached, so values follow the live process state
//! (working directory, clock). The only session state a producer may observe is the
//! last-command outcome, handed in as an accessor closure by the dispatcher.

use crate::{
    constants::{RUNTIME_VERSION, SHELL_VERSION},
    core::color,
    models::Outcome,
};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A placeholder value producer.
pub type Producer = Box<dyn Fn() -> String>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VariableError {
    #[error("Placeholder token '{0}' must be letters enclosed in braces, like '{{U}}'.")]
    InvalidToken(String),
    #[error("Placeholder token '{0}' is reserved by the color table.")]
    ReservedToken(String),
}

/// Registry of placeholder tokens and their producers.
pub struct VariableRegistry {
    producers: HashMap<String, Producer>,
}

impl fmt::Debug for VariableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens: Vec<&String> = self.producers.keys().collect();
        tokens.sort();
        f.debug_struct("VariableRegistry")
            .field("tokens", &tokens)
            .finish()
    }
}

impl Default for VariableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            producers: HashMap::new(),
        }
    }

    /// Creates a registry holding the full placeholder catalog.
    ///
    /// `indicator` is the injected producer behind `{E}`; see [`status_indicator`].
    pub fn with_defaults(indicator: impl Fn() -> String + 'static) -> Self {
        let mut registry = Self::new();
        registry.insert("{U}", whoami::username);
        registry.insert("{N}", || whoami::fallible::hostname().unwrap_or_default());
        registry.insert("{P}", current_dir_display);
        registry.insert("{p}", parent_dir_display);
        registry.insert("{T}", || chrono::Local::now().format("%H:%M:%S").to_string());
        registry.insert("{D}", || chrono::Local::now().format("%y-%m-%d").to_string());
        registry.insert("{S}", || whoami::platform().to_string());
        registry.insert("{V}", whoami::distro);
        registry.insert("{o}", || env::consts::OS.to_string());
        registry.insert("{s}", || env::consts::FAMILY.to_string());
        registry.insert("{n}", || "\n".to_string());
        registry.insert("{a}", || "\x07".to_string());
        registry.insert("{e}", current_exe_display);
        registry.insert("{v}", || RUNTIME_VERSION.to_string());
        registry.insert("{c}", || SHELL_VERSION.to_string());
        registry.insert("{E}", indicator);
        registry
    }

    fn insert(&mut self, token: &str, producer: impl Fn() -> String + 'static) {
        self.producers.insert(token.to_string(), Box::new(producer));
    }

    /// Registers (or replaces) the producer of `token`.
    ///
    /// # Errors
    /// Returns an error if the token is not of the form `{Letters}` or if it
    /// would shadow a color token.
    pub fn register(
        &mut self,
        token: impl Into<String>,
        producer: impl Fn() -> String + 'static,
    ) -> Result<(), VariableError> {
        let token = token.into();
        if !is_well_formed_token(&token) {
            return Err(VariableError::InvalidToken(token));
        }
        if color::is_color_token(&token) {
            return Err(VariableError::ReservedToken(token));
        }
        log::debug!("Registering placeholder {}", token);
        self.producers.insert(token, Box::new(producer));
        Ok(())
    }

    /// Returns the producer of `token`, if registered.
    pub fn lookup(&self, token: &str) -> Option<&Producer> {
        self.producers.get(token)
    }

    /// Returns every registered token and its producer.
    pub fn lookup_all(&self) -> &HashMap<String, Producer> {
        &self.producers
    }

    /// Invokes the producer of `token` and returns its current value.
    pub fn produce(&self, token: &str) -> Option<String> {
        self.lookup(token).map(|producer| producer())
    }
}

fn is_well_formed_token(token: &str) -> bool {
    token
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .is_some_and(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()))
}

fn current_dir_display() -> String {
    env::current_dir()
        .map(|dir| dunce::simplified(&dir).display().to_string())
        .unwrap_or_default()
}

fn parent_dir_display() -> String {
    env::current_dir()
        .map(|dir| parent_display(&dir))
        .unwrap_or_default()
}

/// At the filesystem root the parent is the root itself.
fn parent_display(dir: &Path) -> String {
    let parent = dir.parent().unwrap_or(dir);
    dunce::simplified(parent).display().to_string()
}

fn current_exe_display() -> String {
    env::current_exe()
        .map(|exe| dunce::simplified(&exe).display().to_string())
        .unwrap_or_default()
}

// --- Last Command Indicator ---

const SUCCESS_UNICODE: &str = "\x1b[32m\u{2714}\x1b[0m";
const FAILURE_UNICODE: &str = "\x1b[31m\u{2718}\x1b[0m";
const SUCCESS_ASCII: &str = "\x1b[42m\x1b[30m[V]\x1b[0m";
const FAILURE_ASCII: &str = "\x1b[41m\x1b[30m[X]\x1b[0m";

/// Returns the indicator fragment for `outcome`.
pub fn indicator_fragment(outcome: Outcome, unicode: bool) -> &'static str {
    match (outcome.is_failure(), unicode) {
        (true, true) => FAILURE_UNICODE,
        (true, false) => FAILURE_ASCII,
        (false, true) => SUCCESS_UNICODE,
        (false, false) => SUCCESS_ASCII,
    }
}

/// Builds the `{E}` producer. `unicode` is decided once by the caller and never re-read.
pub fn status_indicator(
    outcome: impl Fn() -> Outcome + 'static,
    unicode: bool,
) -> impl Fn() -> String + 'static {
    move || indicator_fragment(outcome(), unicode).to_string()
}

/// Detects from the environment whether the terminal output can render `✔`/`✘`.
pub fn detect_unicode_support() -> bool {
    let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .find_map(|key| env::var(key).ok().filter(|value| !value.is_empty()));
    if locale_supports_unicode(locale.as_deref()) {
        return true;
    }
    cfg!(windows) && env::var_os("WT_SESSION").is_some()
}

/// Returns `true` if a locale string such as `en_US.UTF-8` names a UTF-8 encoding.
pub fn locale_supports_unicode(locale: Option<&str>) -> bool {
    locale.is_some_and(|value| {
        let value = value.to_ascii_lowercase();
        value.contains("utf-8") || value.contains("utf8")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[cfg(unix)]
    #[test]
    fn test_parent_of_root_is_root() {
        assert_eq!(parent_display(Path::new("/")), "/");
        assert_eq!(parent_display(Path::new("/usr/lib")), "/usr");
    }

    #[test]
    fn test_default_catalog_is_complete() {
        let registry = VariableRegistry::with_defaults(|| String::new());
        for token in [
            "{U}", "{N}", "{P}", "{p}", "{T}", "{D}", "{S}", "{o}", "{s}", "{n}", "{a}", "{e}",
            "{v}", "{V}", "{c}", "{E}",
        ] {
            assert!(registry.lookup(token).is_some(), "missing {}", token);
        }
        assert_eq!(registry.lookup_all().len(), 16);
    }

    #[test]
    fn test_literal_producers() {
        let registry = VariableRegistry::with_defaults(|| String::new());
        assert_eq!(registry.produce("{n}").as_deref(), Some("\n"));
        assert_eq!(registry.produce("{a}").as_deref(), Some("\x07"));
        assert_eq!(registry.produce("{c}").as_deref(), Some(SHELL_VERSION));
        assert_eq!(registry.produce("{o}").as_deref(), Some(env::consts::OS));
    }

    #[test]
    fn test_time_and_date_shapes() {
        let registry = VariableRegistry::with_defaults(|| String::new());
        let time = registry.produce("{T}").unwrap();
        let date = registry.produce("{D}").unwrap();
        assert_eq!(time.len(), 8);
        assert_eq!(time.matches(':').count(), 2);
        assert_eq!(date.len(), 8);
        assert_eq!(date.matches('-').count(), 2);
    }

    #[test]
    fn test_producers_are_invoked_on_every_lookup() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut registry = VariableRegistry::new();
        registry
            .register("{X}", move || {
                counter.set(counter.get() + 1);
                counter.get().to_string()
            })
            .unwrap();
        assert_eq!(registry.produce("{X}").as_deref(), Some("1"));
        assert_eq!(registry.produce("{X}").as_deref(), Some("2"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_register_rejects_malformed_and_color_tokens() {
        let mut registry = VariableRegistry::new();
        assert_eq!(
            registry.register("X", String::new),
            Err(VariableError::InvalidToken("X".to_string()))
        );
        assert_eq!(
            registry.register("{1}", String::new),
            Err(VariableError::InvalidToken("{1}".to_string()))
        );
        assert_eq!(
            registry.register("{red}", String::new),
            Err(VariableError::ReservedToken("{red}".to_string()))
        );
    }

    #[test]
    fn test_indicator_follows_injected_outcome() {
        let outcome = Rc::new(Cell::new(Outcome::NeverRun));
        let reader = Rc::clone(&outcome);
        let indicator = status_indicator(move || reader.get(), true);
        assert_eq!(indicator(), SUCCESS_UNICODE);
        outcome.set(Outcome::Failed);
        assert_eq!(indicator(), FAILURE_UNICODE);
        outcome.set(Outcome::Succeeded);
        assert_eq!(indicator(), SUCCESS_UNICODE);
    }

    #[test]
    fn test_ascii_fallback_indicator() {
        assert_eq!(indicator_fragment(Outcome::Failed, false), FAILURE_ASCII);
        assert_eq!(indicator_fragment(Outcome::NeverRun, false), SUCCESS_ASCII);
    }

    #[test]
    fn test_locale_detection() {
        assert!(locale_supports_unicode(Some("en_US.UTF-8")));
        assert!(locale_supports_unicode(Some("C.utf8")));
        assert!(!locale_supports_unicode(Some("C")));
        assert!(!locale_supports_unicode(None));
    }
}
