use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::MarkId;
use crate::marks::ProjectMarks;
use crate::paths::ProjectContext;

use super::helpers::normalized_id;

/// Looks a mark up. A hole comes back as a mark with an empty filename;
/// out-of-range ids come back as nothing.
pub fn run(
    marks: &ProjectMarks,
    context: &ProjectContext,
    zero_index: bool,
    id: &MarkId,
) -> Result<CmdResult> {
    let id = normalized_id(context, id);
    let mark = marks.get(&id, zero_index);

    let mut result = CmdResult::default();
    match &mark {
        None => result.add_message(CmdMessage::warning(format!("No mark matches {}", id))),
        Some(mark) if mark.filename.is_empty() => {
            result.add_message(CmdMessage::info(format!("Mark {} is empty", id)))
        }
        Some(_) => {}
    }
    Ok(result.with_mark(mark))
}
