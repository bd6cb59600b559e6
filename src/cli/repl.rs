// src/cli/repl.rs

//! # Interactive Loop
//!
//! Drives a [`Shell`] from a line source: startup hooks and banner, one prompt per
//! command, shutdown hooks and banner. Failures escaping the command loop are reported,
//! the working directory is recovered, and the loop restarts, up to a fixed number of
//! consecutive restarts.

use crate::{
    CancellationToken,
    cli::dispatcher::{Flow, Shell},
    constants::{CONFIG_FILENAME, MAX_LOOP_RESTARTS, SHELL_VERSION},
    core::{
        completion::ShellHelper,
        config_loader::{self, LoadedConfig},
        paths, variables,
    },
    models::{Outcome, TemplateKind},
    state::{SessionState, StateError},
    system::{
        executor::{self, ExecutionError, SystemRunner},
        workdir::{self, WorkdirError},
    },
};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Line editor failure: {0}")]
    Editor(#[from] ReadlineError),
    #[error(transparent)]
    WorkingDirectoryLost(#[from] StateError),
    #[error(transparent)]
    Recovery(#[from] WorkdirError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error("The command loop failed {0} times in a row.")]
    RestartsExhausted(u32),
}

/// What the user did at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// `Ctrl+C` at the prompt.
    Interrupted,
    /// `Ctrl+D`, or the end of piped input.
    Eof,
}

/// A source of input lines.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError>;
}

/// `rustyline` editor with path completion and in-memory history.
#[derive(Debug)]
pub struct EditorSource {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl EditorSource {
    pub fn new() -> Result<Self, ShellError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(ShellHelper::new()));
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        log::warn!("Could not record history entry: {}", e);
                    }
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e.into()),
        }
    }
}

/// The read-eval-print loop around a [`Shell`].
#[derive(Debug)]
pub struct Repl<S: LineSource> {
    shell: Shell,
    source: S,
}

impl<S: LineSource> Repl<S> {
    pub fn new(shell: Shell, source: S) -> Self {
        Self { shell, source }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Runs the whole session. The shutdown hooks run even when the loop fails.
    pub fn run(&mut self) -> Result<(), ShellError> {
        self.startup();
        let result = self.run_with_recovery();
        self.shutdown();
        result
    }

    fn startup(&mut self) {
        log::debug!("Session startup.");
        self.shell.run_hook(TemplateKind::StartIntro);
        self.shell.print_banner(TemplateKind::Intro);
        self.shell.run_hook(TemplateKind::EndIntro);
    }

    fn shutdown(&mut self) {
        log::debug!("Session shutdown.");
        self.shell.run_hook(TemplateKind::StartQuit);
        self.shell.print_banner(TemplateKind::Quit);
        self.shell.run_hook(TemplateKind::EndQuit);
    }

    fn run_with_recovery(&mut self) -> Result<(), ShellError> {
        let mut restarts: u32 = 0;
        loop {
            let processed_before = self.shell.state().lines_processed();
            let error = match self.command_loop() {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };

            if self.shell.state().lines_processed() > processed_before {
                restarts = 0;
            }
            restarts += 1;
            log::warn!("Command loop failed ({} in a row): {}", restarts, error);
            let message = format!(t!("shell.error.unexpected"), error = error);
            self.shell.println(&message.red().to_string());

            if restarts > MAX_LOOP_RESTARTS {
                let message = format!(t!("shell.error.restarts_exhausted"), count = MAX_LOOP_RESTARTS);
                self.shell.println(&message.red().bold().to_string());
                return Err(ShellError::RestartsExhausted(MAX_LOOP_RESTARTS));
            }
            self.recover()?;
        }
    }

    /// Reads and dispatches lines until `exit`, end of input, or a failure.
    fn command_loop(&mut self) -> Result<(), ShellError> {
        self.shell.state_mut().sync_cwd()?;
        loop {
            let prompt = self.shell.state().render_prompt();
            match self.source.read_line(&prompt)? {
                Input::Line(line) => {
                    let flow = self.shell.process_line(&line);
                    self.shell.state_mut().mark_line_processed();
                    if flow == Flow::Stop {
                        return Ok(());
                    }
                    self.shell.state_mut().sync_cwd()?;
                }
                Input::Interrupted => self.shell.println(t!("shell.hint.use_exit")),
                Input::Eof => {
                    log::debug!("End of input.");
                    return Ok(());
                }
            }
        }
    }

    /// Moves back into a usable directory and marks the last command as failed.
    fn recover(&mut self) -> Result<(), ShellError> {
        let cached = self.shell.state().cwd().to_path_buf();
        let recovered = match workdir::recover_working_directory(&cached) {
            Ok(dir) => dir,
            Err(e) => {
                self.shell
                    .println(&t!("shell.error.recovery_exhausted").red().bold().to_string());
                return Err(e.into());
            }
        };
        if recovered != cached {
            let message = format!(t!("shell.info.recovered"), path = recovered.display());
            self.shell.println(&message.yellow().to_string());
        }
        self.shell.state_mut().sync_cwd()?;
        self.shell.state().set_outcome(Outcome::Failed);
        Ok(())
    }
}

/// Starts an interactive session on the terminal.
pub fn run_interactive() -> Result<(), ShellError> {
    let cancellation_token: CancellationToken = Arc::new(AtomicBool::new(false));
    executor::install_interrupt_handler(&cancellation_token)?;

    let config = load_config();
    let created = config.created;
    let state = SessionState::new(config, variables::detect_unicode_support());
    let mut shell = Shell::new(
        state,
        Box::new(SystemRunner::new(cancellation_token)),
        Box::new(io::stdout()),
    );
    print_preamble(&mut shell, created);
    let source = EditorSource::new()?;
    Repl::new(shell, source).run()
}

/// Prints the license notice, and where the configuration went if it was just created.
fn print_preamble(shell: &mut Shell, config_created: bool) {
    let notice = format!(
        t!("shell.info.notice"),
        name = env!("CARGO_PKG_NAME"),
        version = SHELL_VERSION,
        license = env!("CARGO_PKG_LICENSE")
    );
    shell.println(&notice);
    if config_created {
        log::info!("First run, configuration created.");
        let path = shell.state().config_path().display().to_string();
        let message = format!(t!("shell.info.config_created"), path = path);
        shell.println(&message.green().to_string());
    }
}

/// Loads `~/Shell.ini`, or falls back to the built-in defaults if that fails.
fn load_config() -> LoadedConfig {
    match config_loader::load_user_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            let message = format!(t!("shell.warn.config_fallback"), error = e);
            eprintln!("{}", message.yellow());
            let path = paths::get_config_path().unwrap_or_else(|_| PathBuf::from(CONFIG_FILENAME));
            config_loader::fallback_config(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::dispatcher::tests::{CWD_LOCK, MemWriter, RecordingRunner, test_shell};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Replays a script, then reports end of input.
    #[derive(Default)]
    struct ScriptedSource {
        script: VecDeque<Result<Input, ShellError>>,
        prompts: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedSource {
        fn lines(lines: &[&str]) -> Self {
            let mut source = Self::default();
            for line in lines {
                source.push_line(line);
            }
            source
        }

        fn push_line(&mut self, line: &str) {
            self.script.push_back(Ok(Input::Line(line.to_string())));
        }

        fn push_editor_errors(&mut self, count: u32) {
            for _ in 0..count {
                self.script.push_back(Err(ShellError::Editor(ReadlineError::Io(
                    io::Error::other("terminal went away"),
                ))));
            }
        }
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self, prompt: &str) -> Result<Input, ShellError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.script.pop_front().unwrap_or(Ok(Input::Eof))
        }
    }

    fn repl_with(
        source: ScriptedSource,
    ) -> (Repl<ScriptedSource>, RecordingRunner, MemWriter) {
        let (shell, runner, out) = test_shell(|config| {
            config.templates.start_intro = "echo start".to_string();
            config.templates.intro = "INTRO".to_string();
            config.templates.end_intro = "echo started".to_string();
            config.templates.start_quit = "echo stop".to_string();
            config.templates.quit = "QUIT".to_string();
            config.templates.end_quit = "echo stopped".to_string();
        });
        (Repl::new(shell, source), runner, out)
    }

    #[test]
    fn test_lifecycle_order() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (mut repl, runner, out) = repl_with(ScriptedSource::lines(&["ls", "exit"]));

        repl.run().unwrap();

        assert_eq!(
            *runner.calls.borrow(),
            vec!["echo start", "echo started", "ls", "echo stop", "echo stopped"]
        );
        let transcript = out.contents();
        let intro = transcript.find("INTRO").unwrap();
        let quit = transcript.find("QUIT").unwrap();
        assert!(intro < quit);
    }

    #[test]
    fn test_exit_stops_before_remaining_input() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let (mut repl, runner, _) = repl_with(ScriptedSource::lines(&["quit now", "ls"]));

        repl.run().unwrap();

        assert!(!runner.calls.borrow().iter().any(|call| call == "ls"));
    }

    #[test]
    fn test_prompt_is_rerendered_after_every_command() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let source = ScriptedSource::lines(&["false", "", "true"]);
        let prompts = Rc::clone(&source.prompts);
        let (mut repl, runner, _) = repl_with(source);
        runner.failing.borrow_mut().push("false".to_string());

        repl.run().unwrap();

        let success = format!("{}$ ", variables::indicator_fragment(Outcome::Succeeded, true));
        let failure = format!("{}$ ", variables::indicator_fragment(Outcome::Failed, true));
        // Before `false`, after `false`, after the empty line, after `true` (then EOF).
        assert_eq!(*prompts.borrow(), vec![success.clone(), failure.clone(), failure, success]);
    }

    #[test]
    fn test_interrupt_at_prompt_prints_hint_and_continues() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut source = ScriptedSource::default();
        source.script.push_back(Ok(Input::Interrupted));
        source.push_line("ls");
        let (mut repl, runner, out) = repl_with(source);

        repl.run().unwrap();

        assert!(out.contents().contains(t!("shell.hint.use_exit")));
        assert!(runner.calls.borrow().iter().any(|call| call == "ls"));
        assert_eq!(repl.shell().state().outcome(), Outcome::Succeeded);
    }

    #[test]
    fn test_loop_restarts_after_failure() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut source = ScriptedSource::default();
        source.push_editor_errors(2);
        source.push_line("ls");
        let (mut repl, runner, out) = repl_with(source);

        repl.run().unwrap();

        assert!(runner.calls.borrow().iter().any(|call| call == "ls"));
        assert_eq!(out.contents().matches("terminal went away").count(), 2);
    }

    #[test]
    fn test_consecutive_restarts_are_bounded() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut source = ScriptedSource::default();
        source.push_editor_errors(MAX_LOOP_RESTARTS + 1);
        source.push_line("never reached");
        let (mut repl, runner, _) = repl_with(source);

        let result = repl.run();

        assert!(matches!(result, Err(ShellError::RestartsExhausted(_))));
        let calls = runner.calls.borrow();
        assert!(!calls.iter().any(|call| call == "never reached"));
        // Shutdown hooks still ran.
        assert_eq!(calls.last().map(String::as_str), Some("echo stopped"));
    }

    #[test]
    fn test_processed_line_resets_restart_count() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut source = ScriptedSource::default();
        source.push_editor_errors(MAX_LOOP_RESTARTS);
        source.push_line("ls");
        source.push_editor_errors(MAX_LOOP_RESTARTS);
        let (mut repl, _, _) = repl_with(source);

        assert!(repl.run().is_ok());
    }

    #[test]
    fn test_recovery_marks_last_command_failed() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut source = ScriptedSource::default();
        source.push_line("true");
        source.push_editor_errors(1);
        let (mut repl, _, _) = repl_with(source);

        repl.run().unwrap();

        assert_eq!(repl.shell().state().outcome(), Outcome::Failed);
    }

    #[test]
    fn test_preamble_prints_license_notice() {
        let (mut shell, runner, out) = test_shell(|_| {});

        print_preamble(&mut shell, false);

        let transcript = out.contents();
        assert!(transcript.contains(env!("CARGO_PKG_NAME")));
        assert!(transcript.contains("MIT"));
        assert!(!transcript.contains("/home/user/Shell.ini"));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_preamble_reports_created_config() {
        let (mut shell, _, out) = test_shell(|_| {});

        print_preamble(&mut shell, true);

        assert!(out.contents().contains("/home/user/Shell.ini"));
    }

    #[cfg(unix)]
    #[test]
    fn test_removed_working_directory_is_recovered() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let base = tempfile::TempDir::new().unwrap();
        let base_path = base.path().canonicalize().unwrap();
        let original = std::env::current_dir().unwrap();
        let _restore = scopeguard::guard(original, |dir| {
            std::env::set_current_dir(dir).ok();
        });
        let nested = base_path.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::env::set_current_dir(&nested).unwrap();

        let (mut repl, runner, out) = repl_with(ScriptedSource::lines(&["ls"]));
        std::fs::remove_dir_all(base_path.join("a")).unwrap();

        repl.run().unwrap();

        assert_eq!(std::env::current_dir().unwrap(), base_path);
        assert_eq!(repl.shell().state().cwd(), base_path.as_path());
        let notice = format!(t!("shell.info.recovered"), path = base_path.display());
        assert!(out.contents().contains(&notice));
        assert!(runner.calls.borrow().iter().any(|call| call == "ls"));
        assert_eq!(repl.shell().state().outcome(), Outcome::Succeeded);
    }
}
