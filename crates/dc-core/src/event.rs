//! Events and step results handed to front ends
//!
//! Events carry narration and telemetry only. Front ends render them; the
//! engine never reports failures any other way during play.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::view::{MapView, StatusSummary};

/// Engine-wide mode
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Mode {
    #[default]
    Explore,
    Encounter,
    GameOver,
    Victory,
}

impl Mode {
    /// GameOver and Victory accept no further gameplay commands.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Mode::GameOver | Mode::Victory)
    }
}

/// One selectable entry of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOption {
    pub key: String,
    pub label: String,
    /// Shown but not currently selectable (e.g. unaffordable).
    pub disabled: bool,
}

impl PromptOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled_if(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Narration and telemetry produced by a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Event {
    Info(String),
    Error(String),
    Combat(String),
    Loot(String),
    Prompt {
        text: String,
        options: Vec<PromptOption>,
        has_cancel: bool,
    },
    Status(StatusSummary),
    Map(MapView),
    Debug(String),
}

impl Event {
    pub fn info(text: impl Into<String>) -> Self {
        Event::Info(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Event::Error(text.into())
    }

    pub fn combat(text: impl Into<String>) -> Self {
        Event::Combat(text.into())
    }

    pub fn loot(text: impl Into<String>) -> Self {
        Event::Loot(text.into())
    }

    pub fn prompt(text: impl Into<String>, options: Vec<PromptOption>, has_cancel: bool) -> Self {
        Event::Prompt {
            text: text.into(),
            options,
            has_cancel,
        }
    }

    /// Narration text, if this event carries plain text.
    pub fn text(&self) -> Option<&str> {
        match self {
            Event::Info(t)
            | Event::Error(t)
            | Event::Combat(t)
            | Event::Loot(t)
            | Event::Debug(t) => Some(t),
            Event::Prompt { text, .. } => Some(text),
            Event::Status(_) | Event::Map(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error(_))
    }
}

/// Result of a single `step` or `attempt_cancel` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub events: Vec<Event>,
    pub mode: Mode,
    /// A sub-session (encounter or vendor) is waiting on a menu answer.
    pub needs_input: bool,
}

impl StepResult {
    /// Events other than the trailing status summary.
    pub fn narration(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| !matches!(e, Event::Status(_)))
    }

    pub fn has_error(&self) -> bool {
        self.events.iter().any(Event::is_error)
    }
}
