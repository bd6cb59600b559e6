//! # custom-shell
//!
//! An interactive shell wrapper: every input line is rewritten by the alias table,
//! dispatched to a built-in command or delegated to the host command interpreter, and
//! followed by a freshly rendered, colorized prompt built from a template.
//!
//! - **`core`**: the pure engine (placeholder registry, color table, template formatter,
//!   alias resolver, configuration loading, filename completion).
//! - **`system`**: the boundary with the operating system (command delegation and
//!   working-directory recovery).
//! - **`cli`**: the command dispatcher, the built-in handlers and the interactive loop.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Flag raised by the interrupt handler while a delegated command is running.
pub type CancellationToken = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod state;
pub mod system;
