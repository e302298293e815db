//! # List Editor Session
//!
//! The mark list can be edited as plain text: one filename per line, in dense
//! order. A [`MenuSession`] holds that text between opening and closing the
//! view. Nothing here touches the mark list; the API applies a session's
//! items when the user writes the buffer, or on close when `save_on_toggle`
//! is set.

use crate::marks::ProjectMarks;
use crate::model::GlobalSettings;

/// How a list-editor session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// The buffer was written.
    Write,
    /// The view was closed without writing.
    Close,
}

impl MenuAction {
    pub fn applies(self, settings: &GlobalSettings) -> bool {
        match self {
            MenuAction::Write => true,
            MenuAction::Close => settings.save_on_toggle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSession {
    project: String,
    original: Vec<String>,
    contents: String,
}

impl MenuSession {
    /// Renders the project's marks, holes skipped.
    pub fn open(project: impl Into<String>, marks: &ProjectMarks) -> Self {
        let original: Vec<String> = marks
            .to_ordered_export()
            .into_iter()
            .map(|entry| entry.filename)
            .collect();
        let contents = render_lines(&original);
        Self {
            project: project.into(),
            original,
            contents,
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn set_contents(&mut self, contents: impl Into<String>) {
        self.contents = contents.into();
    }

    /// The non-blank lines of the buffer, trimmed.
    pub fn items(&self) -> Vec<String> {
        self.contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_modified(&self) -> bool {
        self.items() != self.original
    }
}

fn render_lines(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MarkId;
    use crate::model::Cursor;

    fn marks() -> ProjectMarks {
        let mut marks = ProjectMarks::new();
        for name in ["a.rs", "b.rs", "c.rs"] {
            marks.add(name, Cursor::default()).unwrap();
        }
        marks.remove(&MarkId::Index(2), false).unwrap();
        marks
    }

    #[test]
    fn open_renders_dense_lines() {
        let session = MenuSession::open("/p", &marks());
        assert_eq!(session.contents(), "a.rs\nc.rs\n");
        assert_eq!(session.project(), "/p");
        assert!(!session.is_modified());
    }

    #[test]
    fn empty_list_renders_empty_buffer() {
        let session = MenuSession::open("/p", &ProjectMarks::new());
        assert_eq!(session.contents(), "");
        assert!(session.items().is_empty());
    }

    #[test]
    fn items_drop_blank_lines() {
        let mut session = MenuSession::open("/p", &marks());
        session.set_contents("  c.rs \n\n   \na.rs\nnew.rs");
        assert_eq!(session.items(), vec!["c.rs", "a.rs", "new.rs"]);
        assert!(session.is_modified());
    }

    #[test]
    fn trailing_whitespace_is_not_a_modification() {
        let mut session = MenuSession::open("/p", &marks());
        session.set_contents("a.rs  \n\nc.rs\n\n");
        assert!(!session.is_modified());
    }

    #[test]
    fn close_applies_only_with_save_on_toggle() {
        let mut settings = GlobalSettings::default();
        assert!(MenuAction::Write.applies(&settings));
        assert!(!MenuAction::Close.applies(&settings));
        settings.save_on_toggle = true;
        assert!(MenuAction::Close.applies(&settings));
    }
}
