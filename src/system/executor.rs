// src/system/executor.rs

use crate::{CancellationToken, constants::CHILD_POLL_INTERVAL_MS, models::Outcome};
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::sync::atomic::Ordering;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{0}' was interrupted.")]
    Interrupted(String),
    #[error("Failed to install the interrupt handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),
}

/// Runs a command line through the host command interpreter.
///
/// The dispatcher only talks to this trait, so tests can substitute a recording runner.
pub trait CommandRunner {
    /// Runs `command_line` to completion and reports its outcome.
    fn run(&self, command_line: &str) -> Result<Outcome, ExecutionError>;
}

/// Delegates to `sh -c` (or `cmd /C` on Windows) with inherited stdio.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cancellation_token: CancellationToken,
}

impl SystemRunner {
    pub fn new(cancellation_token: CancellationToken) -> Self {
        Self { cancellation_token }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command_line: &str) -> Result<Outcome, ExecutionError> {
        execute_command(command_line, &self.cancellation_token)
    }
}

/// Installs a process-wide interrupt handler that raises `cancellation_token`.
///
/// Can only succeed once per process.
pub fn install_interrupt_handler(
    cancellation_token: &CancellationToken,
) -> Result<(), ExecutionError> {
    let token = cancellation_token.clone();
    ctrlc::set_handler(move || {
        token.store(true, Ordering::SeqCst);
    })?;
    log::debug!("Interrupt handler installed.");
    Ok(())
}

fn interpreter_command(command_line: &str) -> StdCommand {
    if cfg!(target_os = "windows") {
        let mut command = StdCommand::new("cmd");
        command.arg("/C").arg(command_line);
        command
    } else {
        let mut command = StdCommand::new("sh");
        command.arg("-c").arg(command_line);
        command
    }
}

/// Runs `command_line` through the host interpreter and blocks until it finishes.
///
/// The child is polled so that an interrupt raised on `cancellation_token` while it
/// runs kills it and is reported as [`ExecutionError::Interrupted`].
pub fn execute_command(
    command_line: &str,
    cancellation_token: &CancellationToken,
) -> Result<Outcome, ExecutionError> {
    log::debug!("Delegating to the host interpreter: {:?}", command_line);
    // A stale interrupt must not cancel the next command.
    cancellation_token.store(false, Ordering::SeqCst);

    let mut child = interpreter_command(command_line)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| ExecutionError::CommandFailed(command_line.to_string(), e))?;

    let status = wait_for_child(&mut child, command_line, cancellation_token)?;

    // The terminal sends the interrupt to the child too, which may exit on its own
    // before the next poll sees the flag.
    if cancellation_token.swap(false, Ordering::SeqCst) {
        log::warn!("Command {:?} was interrupted.", command_line);
        return Err(ExecutionError::Interrupted(command_line.to_string()));
    }

    let outcome = outcome_from_status(status);
    log::debug!("Command {:?} finished: {:?} ({})", command_line, outcome, status);
    Ok(outcome)
}

fn wait_for_child(
    child: &mut Child,
    command_line: &str,
    cancellation_token: &CancellationToken,
) -> Result<ExitStatus, ExecutionError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if cancellation_token.load(Ordering::SeqCst) {
                    log::debug!(
                        "Interrupt requested, killing child process (PID: {})...",
                        child.id()
                    );
                    if let Err(e) = child.kill() {
                        log::warn!("Failed to kill child process {}: {}", child.id(), e);
                    }
                    child.wait().ok();
                    cancellation_token.store(false, Ordering::SeqCst);
                    return Err(ExecutionError::Interrupted(command_line.to_string()));
                }
                std::thread::sleep(Duration::from_millis(CHILD_POLL_INTERVAL_MS));
            }
            Err(e) => {
                return Err(ExecutionError::CommandFailed(command_line.to_string(), e));
            }
        }
    }
}

/// Exit code 0 is a success. Any other code, or death by signal, is a failure.
fn outcome_from_status(status: ExitStatus) -> Outcome {
    match status.code() {
        Some(code) => Outcome::from_exit_code(code),
        None => Outcome::Failed,
    }
}
