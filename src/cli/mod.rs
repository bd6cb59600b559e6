//! # Command Line Interface
//!
//! - **`dispatcher`**: the built-in command registry and the [`dispatcher::Shell`] that
//!   routes each line to a built-in or to the host interpreter.
//! - **`handlers`**: one module per built-in command.
//! - **`repl`**: the interactive loop, its lifecycle hooks and its failure recovery.

pub mod dispatcher;
pub mod handlers;
pub mod repl;
