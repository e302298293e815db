use crate::commands::{CmdMessage, CmdResult, MarkScope};
use crate::error::Result;
use crate::events::ChangeKind;
use crate::index::MarkId;

use super::helpers::{display_index, normalized_id};

/// Leaves a hole where the mark was. Unknown ids are reported, not an error.
pub fn run(scope: MarkScope<'_>, id: &MarkId) -> Result<CmdResult> {
    let id = normalized_id(scope.context, id);
    let mut result = CmdResult::default();

    match scope.marks.remove(&id, scope.settings.zero_index)? {
        Some((index, mark)) => {
            result.add_message(CmdMessage::success(format!(
                "Removed mark {}: {}",
                display_index(scope.settings, index),
                mark.filename
            )));
            Ok(result.with_change(ChangeKind::Removed(index)))
        }
        None => {
            result.add_message(CmdMessage::warning(format!("No mark matches {}", id)));
            Ok(result)
        }
    }
}
