// src/state.rs

use crate::core::alias::AliasTable;
use crate::core::config_loader::LoadedConfig;
use crate::core::interpolator::Interpolator;
use crate::core::variables::{self, VariableRegistry};
use crate::models::{Outcome, TemplateKind, Templates};
use std::cell::Cell;
use std::env;
use std::io;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error(
        "The working directory '{}' is no longer reachable: {}",
        .cached.display(),
        .source
    )]
    WorkingDirectoryLost {
        cached: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The state of one interactive session.
///
/// Owned by the dispatcher. The placeholder registry only sees the last-command outcome,
/// through the read accessor installed as the `{E}` producer.
pub struct SessionState {
    outcome: Rc<Cell<Outcome>>,
    cwd: PathBuf,
    config_path: PathBuf,
    aliases: AliasTable,
    templates: Templates,
    registry: VariableRegistry,
    lines_processed: u64,
}

impl SessionState {
    /// Builds the session from a loaded configuration.
    ///
    /// `unicode` selects the `{E}` indicator style for the whole session.
    pub fn new(config: LoadedConfig, unicode: bool) -> Self {
        let outcome = Rc::new(Cell::new(Outcome::NeverRun));
        let reader = Rc::clone(&outcome);
        let registry =
            VariableRegistry::with_defaults(variables::status_indicator(move || reader.get(), unicode));
        Self {
            outcome,
            cwd: initial_working_directory(),
            config_path: config.path,
            aliases: config.aliases,
            templates: config.templates,
            registry,
            lines_processed: 0,
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome.get()
    }

    pub fn set_outcome(&self, outcome: Outcome) {
        log::debug!("Last command outcome: {:?}", outcome);
        self.outcome.set(outcome);
    }

    /// The last working directory known to exist.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Re-reads the process working directory into the cached copy.
    pub fn sync_cwd(&mut self) -> Result<(), StateError> {
        let current = env::current_dir()
            .and_then(|dir| {
                // A deleted directory can still be reported by `getcwd` on some systems.
                if dir.is_dir() {
                    Ok(dir)
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        "working directory was removed",
                    ))
                }
            })
            .map_err(|e| StateError::WorkingDirectoryLost {
                cached: self.cwd.clone(),
                source: e,
            })?;
        if current != self.cwd {
            log::debug!("Working directory is now {}", current.display());
            self.cwd = current;
        }
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Expands `template` against the live placeholder values.
    pub fn format(&self, template: &str) -> String {
        Interpolator::new(&self.registry).format(template)
    }

    /// Expands the template of `kind`.
    pub fn render(&self, kind: TemplateKind) -> String {
        self.format(self.templates.get(kind))
    }

    /// Expands the prompt template.
    pub fn render_prompt(&self) -> String {
        self.render(TemplateKind::Prompt)
    }

    /// Number of input lines processed since the session started.
    pub fn lines_processed(&self) -> u64 {
        self.lines_processed
    }

    pub fn mark_line_processed(&mut self) {
        self.lines_processed += 1;
    }
}

/// The process working directory, or the best guess at where it used to be.
fn initial_working_directory() -> PathBuf {
    env::current_dir()
        .ok()
        .or_else(|| env::var_os("PWD").map(PathBuf::from))
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from(MAIN_SEPARATOR_STR))
}
