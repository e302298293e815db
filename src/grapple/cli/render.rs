//! # Rendering
//!
//! Turns `CmdResult` data into terminal text. Every `render_*` function
//! returns a string so output can be tested without a terminal; `print_*`
//! wrappers write it to stdout.

use colored::Colorize;
use grapple::api::{CmdMessage, MessageLevel};
use grapple::index::DisplayMark;
use grapple::marks::ExportEntry;
use grapple::model::{GlobalSettings, Mark};
use grapple::nav::NavTarget;
use grapple::paths::ProjectContext;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const HOLE: &str = "(empty)";

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut output = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        output.push_str(&format!("{}\n", line));
    }
    output
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

/// One line per slot: index, then `file:row:col` or a hole marker.
/// Indexes are shown the way the user types them.
pub fn render_mark_list(marks: &[DisplayMark], zero_index: bool) -> String {
    if marks.iter().all(|dm| dm.slot.is_tombstone()) {
        return "No marks for this project.\n".to_string();
    }

    let shown = |index: usize| if zero_index { index - 1 } else { index };
    let index_width = marks
        .iter()
        .map(|dm| shown(dm.index).to_string().width())
        .max()
        .unwrap_or(1);

    let mut output = String::new();
    for dm in marks {
        let index = format!("{:>width$}. ", shown(dm.index), width = index_width);
        let available = LINE_WIDTH.saturating_sub(index.width());
        let line = match dm.slot.mark() {
            Some(mark) => format!(
                "{}{}",
                index.yellow(),
                truncate_to_width(&mark_location(mark), available)
            ),
            None => format!("{}{}", index.dimmed(), HOLE.dimmed()),
        };
        output.push_str(&line);
        output.push('\n');
    }
    output
}

pub fn render_export(entries: &[ExportEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}:{}:{}\n", entry.label, entry.row, entry.col))
        .collect()
}

/// Resolved path for editors and scripts: `path:row:col`.
pub fn render_target(target: &NavTarget, context: &ProjectContext) -> String {
    format!(
        "{}:{}:{}\n",
        context.resolve_path(&target.filename).display(),
        target.row,
        target.col
    )
}

pub fn render_mark(mark: &Mark) -> String {
    format!("{}\n", mark_location(mark))
}

pub fn render_settings(settings: &GlobalSettings, projects: &[String]) -> String {
    let excluded: Vec<&str> = settings
        .excluded_filetypes
        .iter()
        .map(String::as_str)
        .collect();

    let mut output = String::new();
    output.push_str(&format!("mark_branch = {}\n", settings.mark_branch));
    output.push_str(&format!("save_on_toggle = {}\n", settings.save_on_toggle));
    output.push_str(&format!("save_on_change = {}\n", settings.save_on_change));
    output.push_str(&format!("excluded_filetypes = [{}]\n", excluded.join(", ")));
    output.push_str(&format!("zero_index = {}\n", settings.zero_index));
    for (key, value) in &settings.extra {
        output.push_str(&format!("{} = {}\n", key, value));
    }

    output.push_str(&format!("\n{}\n", "Projects:".bold()));
    for project in projects {
        output.push_str(&format!("  {}\n", project));
    }
    output
}

fn mark_location(mark: &Mark) -> String {
    format!("{}:{}:{}", mark.filename, mark.row, mark.col)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    if s.width() <= max_width {
        return s.to_string();
    }

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapple::model::{Cursor, Slot};
    use std::path::PathBuf;

    fn no_color() {
        colored::control::set_override(false);
    }

    fn listed() -> Vec<DisplayMark> {
        vec![
            DisplayMark {
                index: 1,
                slot: Slot::Occupied(Mark::new("src/main.rs", Cursor::new(12, 4))),
            },
            DisplayMark {
                index: 2,
                slot: Slot::Tombstone,
            },
            DisplayMark {
                index: 3,
                slot: Slot::Occupied(Mark::new("README.md", Cursor::default())),
            },
        ]
    }

    #[test]
    fn mark_list_shows_holes() {
        no_color();
        let output = render_mark_list(&listed(), false);
        assert_eq!(output, "1. src/main.rs:12:4\n2. (empty)\n3. README.md:1:0\n");
    }

    #[test]
    fn mark_list_shifts_for_zero_index() {
        no_color();
        let output = render_mark_list(&listed(), true);
        assert!(output.starts_with("0. src/main.rs"));
        assert!(output.contains("2. README.md"));
    }

    #[test]
    fn empty_list_has_a_message() {
        assert_eq!(render_mark_list(&[], false), "No marks for this project.\n");
    }

    #[test]
    fn export_uses_dense_labels() {
        let entries = vec![ExportEntry {
            index: 1,
            label: "1: a.rs".into(),
            filename: "a.rs".into(),
            row: 3,
            col: 0,
        }];
        assert_eq!(render_export(&entries), "1: a.rs:3:0\n");
    }

    #[test]
    fn target_is_resolved_against_the_project() {
        let context = ProjectContext::new("/work/app").with_home(None);
        let target = NavTarget {
            index: 1,
            filename: "src/lib.rs".into(),
            row: 5,
            col: 2,
        };
        let expected = format!("{}:5:2\n", PathBuf::from("/work/app").join("src/lib.rs").display());
        assert_eq!(render_target(&target, &context), expected);
    }

    #[test]
    fn truncation_respects_wide_characters() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語ファイル", 7), "日本語…");
    }

    #[test]
    fn settings_include_unknown_keys() {
        no_color();
        let mut settings = GlobalSettings::default();
        settings
            .extra
            .insert("tabline".into(), serde_json::Value::Bool(true));
        let output = render_settings(&settings, &["/work/app".to_string()]);
        assert!(output.contains("save_on_change = true"));
        assert!(output.contains("excluded_filetypes = [grapple]"));
        assert!(output.contains("tabline = true"));
        assert!(output.contains("  /work/app"));
    }
}
