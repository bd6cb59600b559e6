// src/cli/dispatcher.rs

use crate::{
    cli::handlers,
    models::{Outcome, TemplateKind},
    state::SessionState,
    system::executor::{CommandRunner, ExecutionError},
};
use colored::*;
use std::fmt;
use std::io::Write;

/// What the loop does after a line was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

// --- Command Definition and Registry ---

/// A built-in command: its keyword, synonyms, and handler.
///
/// Handlers receive the argument text (everything after the keyword, trimmed).
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(&str, &mut Shell) -> Flow,
}

/// Every built-in. Anything else is delegated to the host interpreter.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "cd",
        aliases: &[],
        handler: handlers::cd::handle,
    },
    CommandDefinition {
        name: "GetConfigFile",
        aliases: &["configfile"],
        handler: handlers::config_file::handle,
    },
    CommandDefinition {
        name: "help",
        aliases: &[],
        handler: handlers::help::handle,
    },
    CommandDefinition {
        name: "exit",
        aliases: &["quit"],
        handler: handlers::exit::handle,
    },
];

/// Finds a built-in by its keyword or one of its synonyms. Matching is case-sensitive.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Splits a line into its leading keyword and the trimmed remainder.
fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, args)) => (keyword, args.trim()),
        None => (line, ""),
    }
}

/// The command dispatcher: owns the session state, the delegation backend and the
/// transcript output.
pub struct Shell {
    state: SessionState,
    runner: Box<dyn CommandRunner>,
    out: Box<dyn Write>,
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("cwd", &self.state.cwd())
            .field("outcome", &self.state.outcome())
            .finish_non_exhaustive()
    }
}

impl Shell {
    pub fn new(state: SessionState, runner: Box<dyn CommandRunner>, out: Box<dyn Write>) -> Self {
        Self { state, runner, out }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Handles one line typed by the user: alias resolution, then dispatch.
    ///
    /// Aliases only match at the very start of the raw line. An empty line runs nothing
    /// and leaves the last outcome untouched.
    pub fn process_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        let resolved = self.state.aliases().resolve(line);
        self.dispatch(resolved.trim())
    }

    /// Routes a line to its built-in handler, or delegates it verbatim.
    pub fn dispatch(&mut self, line: &str) -> Flow {
        let (keyword, args) = split_keyword(line);
        match find_command(keyword) {
            Some(command) => {
                log::debug!("Dispatching built-in '{}' with {:?}", command.name, args);
                (command.handler)(args, self)
            }
            None => {
                self.delegate(line);
                Flow::Continue
            }
        }
    }

    /// Runs `line` through the host interpreter and records its outcome.
    ///
    /// Never fails: spawn errors and interrupts become a short message and a failure.
    pub fn delegate(&mut self, line: &str) -> Outcome {
        let outcome = match self.runner.run(line) {
            Ok(outcome) => outcome,
            Err(ExecutionError::Interrupted(_)) => {
                self.println(t!("shell.hint.use_exit"));
                Outcome::Failed
            }
            Err(e) => {
                log::error!("{}", e);
                let reason = match &e {
                    ExecutionError::CommandFailed(_, source) => source.to_string(),
                    other => other.to_string(),
                };
                let message = format!(t!("shell.error.command_failed"), command = line, reason = reason);
                self.println(&message.red().to_string());
                Outcome::Failed
            }
        };
        self.state.set_outcome(outcome);
        outcome
    }

    /// Formats a lifecycle hook command and dispatches it without alias resolution.
    ///
    /// Empty hooks are skipped, and an `exit` inside a hook does not stop the shell.
    pub fn run_hook(&mut self, kind: TemplateKind) {
        let command = self.state.render(kind);
        let command = command.trim();
        if command.is_empty() {
            log::debug!("Hook {} is empty, skipping.", kind.key());
            return;
        }
        log::debug!("Running hook {}: {:?}", kind.key(), command);
        if self.dispatch(command) == Flow::Stop {
            log::debug!("Ignoring exit requested by hook {}.", kind.key());
        }
    }

    /// Prints the expanded banner of `kind`.
    pub fn print_banner(&mut self, kind: TemplateKind) {
        let banner = self.state.render(kind);
        self.println(&banner);
    }

    /// Writes a line to the transcript. Output errors are logged, never fatal.
    pub fn println(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            log::warn!("Could not write to the terminal: {}", e);
        }
    }
}
