use crate::commands::CmdResult;
use crate::error::Result;
use crate::marks::ProjectMarks;

/// Dense, hole-free listing for quickfix-style consumers.
pub fn run(marks: &ProjectMarks) -> Result<CmdResult> {
    Ok(CmdResult::default().with_export(marks.to_ordered_export()))
}
