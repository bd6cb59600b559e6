//! # System Interaction Layer
//!
//! The boundary between the shell engine and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: delegates command lines to the host interpreter (`sh -c`, or `cmd /C`
//!   on Windows) and turns a `Ctrl+C` during a delegated command into an
//!   [`executor::ExecutionError::Interrupted`] instead of terminating the shell.
//! - **`workdir`**: finds a usable working directory again after the current one was
//!   deleted or became unreachable.

pub mod executor;
pub mod workdir;
