//! # Navigation
//!
//! Resolves "go to mark N" and "go to the next/previous mark" into a file and
//! cursor position. Opening the file is the caller's business.
//!
//! Cycling steps over holes and wraps around both ends. When the current file
//! is not marked, `next` starts before the first mark and `prev` after the
//! last one.

use crate::index::MarkId;
use crate::marks::ProjectMarks;
use crate::model::Mark;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavTarget {
    /// Stable index of the mark.
    pub index: usize,
    pub filename: String,
    pub row: usize,
    pub col: usize,
}

impl NavTarget {
    fn new(index: usize, mark: &Mark) -> Self {
        Self {
            index,
            filename: mark.filename.clone(),
            row: mark.row,
            col: mark.col,
        }
    }
}

/// Resolves an index or filename. Holes and unknown ids resolve to nothing.
pub fn nav_file(marks: &ProjectMarks, id: &MarkId, zero_index: bool) -> Option<NavTarget> {
    let index = marks.resolve(id, zero_index)?;
    marks
        .slot(index)
        .and_then(|slot| slot.mark())
        .map(|mark| NavTarget::new(index, mark))
}

pub fn nav_next(marks: &ProjectMarks, current: &str) -> Option<NavTarget> {
    let from = marks.index_of(current).unwrap_or(0);
    marks
        .marks()
        .find(|(i, _)| *i > from)
        .or_else(|| marks.marks().next())
        .map(|(i, mark)| NavTarget::new(i, mark))
}

pub fn nav_prev(marks: &ProjectMarks, current: &str) -> Option<NavTarget> {
    let from = marks.index_of(current).unwrap_or(marks.len() + 1);
    marks
        .marks()
        .filter(|(i, _)| *i < from)
        .last()
        .or_else(|| marks.marks().last())
        .map(|(i, mark)| NavTarget::new(i, mark))
}
