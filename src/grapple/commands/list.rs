use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::index_marks;
use crate::marks::ProjectMarks;

/// Every slot with its stable index, holes included.
pub fn run(marks: &ProjectMarks) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed_marks(index_marks(marks)))
}

/// Highest populated index; holes count.
pub fn length(marks: &ProjectMarks) -> usize {
    marks.len()
}
