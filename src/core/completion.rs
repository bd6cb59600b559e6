// src/core/completion.rs

//! # Completion Provider
//!
//! Filename completion for the token under the cursor. The token is split into the
//! directory part typed so far and a partial file name; entries of that directory whose
//! name starts with the partial name are offered, in directory-listing order.

use crate::core::paths;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::fs;
use std::path::{self, Path};

/// Built-ins that never get completions.
const NO_COMPLETION_COMMANDS: &[&str] = &["help"];

/// Line editor helper: path completion only, no hints, no highlighting.
#[derive(Debug, Default)]
pub struct ShellHelper;

impl ShellHelper {
    pub fn new() -> Self {
        Self
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(complete_path(line, pos))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Completes the token ending at `pos` against the current working directory.
///
/// Returns the byte offset where the token starts and the candidates. Never fails:
/// an unreadable or missing directory yields no candidates.
pub fn complete_path(line: &str, pos: usize) -> (usize, Vec<Pair>) {
    complete_path_in(Path::new("."), line, pos)
}

/// Same as [`complete_path`], resolving relative directories against `base`.
pub fn complete_path_in(base: &Path, line: &str, pos: usize) -> (usize, Vec<Pair>) {
    let head = line.get(..pos).unwrap_or(line);
    let start = token_start(head);

    let first_word = head.split_whitespace().next().unwrap_or_default();
    if NO_COMPLETION_COMMANDS.contains(&first_word) {
        return (start, Vec::new());
    }

    let token = head.get(start..).unwrap_or_default();
    let (dir_part, partial) = split_token(token);
    let directory = if dir_part.is_empty() {
        base.to_path_buf()
    } else {
        base.join(paths::expand_user_path(dir_part))
    };
    log::debug!(
        "Completing {:?} in {} (typed directory {:?})",
        partial,
        directory.display(),
        dir_part
    );

    let entries = match fs::read_dir(&directory) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("No completions, cannot list {}: {}", directory.display(), e);
            return (start, Vec::new());
        }
    };

    let candidates = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(partial))
        .map(|name| Pair {
            replacement: format!("{}{}", dir_part, name),
            display: name,
        })
        .collect();
    (start, candidates)
}

/// Byte offset just past the last whitespace character, or 0.
fn token_start(head: &str) -> usize {
    head.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

/// Splits `token` into its directory part (separator included) and the partial name.
fn split_token(token: &str) -> (&str, &str) {
    match token.rfind(path::is_separator) {
        Some(index) => token.split_at(index + 1),
        None => ("", token),
    }
}
