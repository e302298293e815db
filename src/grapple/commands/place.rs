use crate::commands::{CmdMessage, CmdResult, MarkScope};
use crate::error::{GrappleError, Result};
use crate::events::ChangeKind;
use crate::index::MarkId;
use crate::marks::validate_index;

use super::helpers::{check_markable, normalized, Focus};

/// Puts the focused file at `index` (as typed by the user), replacing whatever
/// is there and vacating the file's previous slot.
pub fn run(scope: MarkScope<'_>, index: usize, focus: &Focus) -> Result<CmdResult> {
    let stable = MarkId::Index(index)
        .stable_index(scope.settings.zero_index)
        .ok_or_else(|| GrappleError::InvalidInput(format!("{} is not a valid mark index", index)))?;
    validate_index(stable)?;
    check_markable(scope.settings, focus)?;

    let filename = normalized(scope.context, &focus.filename);
    scope.marks.set_current_at(stable, &filename, focus.cursor)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Marked {} as {}",
        filename, index
    )));
    Ok(result.with_change(ChangeKind::Placed(stable)))
}
