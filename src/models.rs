// src/models.rs

use serde::{Deserialize, Serialize};

// --- Session Outcome ---

/// Outcome of the last command executed by the shell.
///
/// The prompt's `{E}` indicator is driven by this value. `NeverRun` is the state
/// before any command has been dispatched and renders like a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    NeverRun,
    Succeeded,
    Failed,
}

impl Outcome {
    /// Maps a process exit code to an outcome. Only `0` is a success.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 { Self::Succeeded } else { Self::Failed }
    }

    /// Returns `true` only for an outcome that must be shown as a failure.
    pub fn is_failure(self) -> bool {
        self == Self::Failed
    }
}

// --- Templates ---

/// Identifies each template of the `[DISPLAY]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Prompt,
    StartIntro,
    Intro,
    EndIntro,
    StartQuit,
    Quit,
    EndQuit,
}

impl TemplateKind {
    /// Every template, in configuration file order.
    pub const ALL: [Self; 7] = [
        Self::Prompt,
        Self::StartIntro,
        Self::EndIntro,
        Self::Intro,
        Self::StartQuit,
        Self::EndQuit,
        Self::Quit,
    ];

    /// The key of this template inside the `[DISPLAY]` section.
    pub fn key(self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::StartIntro => "start_intro",
            Self::Intro => "intro",
            Self::EndIntro => "end_intro",
            Self::StartQuit => "start_quit",
            Self::Quit => "quit",
            Self::EndQuit => "end_quit",
        }
    }
}

/// The resolved, immutable template set of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub prompt: String,
    pub start_intro: String,
    pub intro: String,
    pub end_intro: String,
    pub start_quit: String,
    pub quit: String,
    pub end_quit: String,
}

impl Templates {
    /// Returns the template for `kind`.
    pub fn get(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::Prompt => &self.prompt,
            TemplateKind::StartIntro => &self.start_intro,
            TemplateKind::Intro => &self.intro,
            TemplateKind::EndIntro => &self.end_intro,
            TemplateKind::StartQuit => &self.start_quit,
            TemplateKind::Quit => &self.quit,
            TemplateKind::EndQuit => &self.end_quit,
        }
    }
}

/// A single component of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateComponent {
    /// Text copied verbatim, including unknown `{...}` tokens.
    Literal(String),
    /// A registered placeholder token such as `{U}`, expanded at render time.
    Placeholder(String),
    /// A color token, already resolved to its escape fragment.
    Color(&'static str),
}

// --- Configuration File Schema ---

/// On-disk layout of `Shell.ini`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(rename = "DISPLAY", default)]
    pub display: DisplaySection,
    /// Alias prefix -> replacement. Kept as a table so file order is preserved.
    #[serde(rename = "ALIAS", default)]
    pub alias: toml::Table,
}

/// The `[DISPLAY]` section. Every key is optional; absent keys fall back to defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_quit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_quit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quit: Option<String>,
}

impl DisplaySection {
    /// Returns the configured value for `kind`, if the key is present.
    pub fn get(&self, kind: TemplateKind) -> Option<&str> {
        let value = match kind {
            TemplateKind::Prompt => &self.prompt,
            TemplateKind::StartIntro => &self.start_intro,
            TemplateKind::Intro => &self.intro,
            TemplateKind::EndIntro => &self.end_intro,
            TemplateKind::StartQuit => &self.start_quit,
            TemplateKind::Quit => &self.quit,
            TemplateKind::EndQuit => &self.end_quit,
        };
        value.as_deref()
    }
}
