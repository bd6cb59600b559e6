// src/constants.rs

/// The name of the configuration file, stored in the user's home directory.
pub const CONFIG_FILENAME: &str = "Shell.ini";

/// Section holding the prompt and banner templates.
pub const DISPLAY_SECTION: &str = "DISPLAY";

/// Section holding the alias table.
pub const ALIAS_SECTION: &str = "ALIAS";

/// Upper bound on `chdir` attempts made while recovering from a vanished working directory.
pub const MAX_RECOVERY_ATTEMPTS: u32 = 32;

/// Upper bound on consecutive restarts of the command loop without a processed line.
pub const MAX_LOOP_RESTARTS: u32 = 32;

/// Interval between two polls of a running delegated command.
pub const CHILD_POLL_INTERVAL_MS: u64 = 50;

/// Version string reported by the `{c}` placeholder.
pub const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compiler version captured by `build.rs`, reported by the `{v}` placeholder.
pub const RUNTIME_VERSION: &str = env!("CUSTOM_SHELL_RUSTC_VERSION");
