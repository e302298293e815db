use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::MarkId;
use crate::marks::ProjectMarks;
use crate::nav::{nav_file, nav_next, nav_prev, NavTarget};
use crate::paths::ProjectContext;

use super::helpers::{normalized, normalized_id};

pub fn goto(
    marks: &ProjectMarks,
    context: &ProjectContext,
    zero_index: bool,
    id: &MarkId,
) -> Result<CmdResult> {
    let id = normalized_id(context, id);
    let target = nav_file(marks, &id, zero_index);
    let mut result = CmdResult::default();
    if target.is_none() {
        result.add_message(CmdMessage::warning(format!("No mark matches {}", id)));
    }
    Ok(result.with_target(target))
}

pub fn next(marks: &ProjectMarks, context: &ProjectContext, current: &str) -> Result<CmdResult> {
    cycle(marks, nav_next(marks, &normalized(context, current)))
}

pub fn prev(marks: &ProjectMarks, context: &ProjectContext, current: &str) -> Result<CmdResult> {
    cycle(marks, nav_prev(marks, &normalized(context, current)))
}

fn cycle(marks: &ProjectMarks, target: Option<NavTarget>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if target.is_none() && marks.marks().next().is_none() {
        result.add_message(CmdMessage::warning("No marks in this project"));
    }
    Ok(result.with_target(target))
}
