use crate::commands::{CmdResult, MarkScope};
use crate::error::Result;
use crate::events::ChangeKind;
use tracing::debug;

use super::helpers::{check_markable, normalized, Focus};

/// Records the cursor for the focused file when leaving it.
///
/// Never fails: unmarkable or unmarked buffers are logged and skipped. The
/// change is reported either way.
pub fn run(scope: MarkScope<'_>, focus: &Focus) -> Result<CmdResult> {
    let result = CmdResult::default().with_change(ChangeKind::CursorStored);

    if let Err(e) = check_markable(scope.settings, focus) {
        debug!(file = %focus.filename, error = %e, "cursor not stored");
        return Ok(result);
    }
    if focus.filename.trim().is_empty() {
        debug!("cursor not stored for unnamed buffer");
        return Ok(result);
    }

    let filename = normalized(scope.context, &focus.filename);
    match scope.marks.store_cursor(&filename, focus.cursor) {
        Some(index) => debug!(file = %filename, index, "cursor stored"),
        None => debug!(file = %filename, "file is not marked, cursor not stored"),
    }
    Ok(result)
}
