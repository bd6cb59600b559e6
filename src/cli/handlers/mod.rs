// src/cli/handlers/mod.rs

// One module per built-in command.

pub mod cd;
pub mod config_file;
pub mod exit;
pub mod help;
