use crate::commands::{CmdMessage, CmdResult, MarkScope};
use crate::error::Result;
use crate::events::ChangeKind;
use crate::marks::ListEntry;
use crate::model::Cursor;

use super::helpers::{mark_count, normalized};

/// Rewrites the whole list from `entries`, in order. Empty entries become
/// holes; new files get `cursor`.
pub fn run<I: AsRef<str>>(scope: MarkScope<'_>, entries: &[I], cursor: Cursor) -> Result<CmdResult> {
    let entries: Vec<ListEntry> = entries
        .iter()
        .map(|entry| {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                ListEntry::Filename(String::new())
            } else {
                ListEntry::Filename(normalized(scope.context, entry))
            }
        })
        .collect();
    scope.marks.set_from_ordered_list(entries, cursor);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Mark list updated ({})",
        mark_count(scope.marks.marks().count())
    )));
    Ok(result.with_change(ChangeKind::Replaced))
}
