use crate::events::ChangeKind;
use crate::index::DisplayMark;
use crate::marks::ExportEntry;
use crate::model::{GlobalSettings, Mark};
use crate::nav::NavTarget;

pub use crate::config::MarkScope;

pub mod add;
pub mod clear;
pub mod config;
pub mod export;
pub mod get;
pub mod helpers;
pub mod jump;
pub mod list;
pub mod offset;
pub mod place;
pub mod remove;
pub mod replace;
pub mod status;
pub mod toggle;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed_marks: Vec<DisplayMark>,
    pub mark: Option<Mark>,
    pub export: Vec<ExportEntry>,
    pub target: Option<NavTarget>,
    /// Set when the mark list was mutated; the API turns it into an event.
    pub change: Option<ChangeKind>,
    pub settings: Option<GlobalSettings>,
    pub projects: Vec<String>,
    pub status: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_marks(mut self, marks: Vec<DisplayMark>) -> Self {
        self.listed_marks = marks;
        self
    }

    pub fn with_mark(mut self, mark: Option<Mark>) -> Self {
        self.mark = mark;
        self
    }

    pub fn with_export(mut self, export: Vec<ExportEntry>) -> Self {
        self.export = export;
        self
    }

    pub fn with_target(mut self, target: Option<NavTarget>) -> Self {
        self.target = target;
        self
    }

    pub fn with_change(mut self, change: ChangeKind) -> Self {
        self.change = Some(change);
        self
    }
}
