//! # Mark Identities
//!
//! Users address marks either by their **stable index** (`3`) or by filename
//! (`src/main.rs`). Stable indexes are the slot positions in the project's mark
//! list: removing mark 1 leaves a hole, it does not renumber mark 3.
//!
//! Two numberings exist and must not be confused:
//!
//! - **Stable** (sparse): what `goto`, `rm` and `get` take, and what `list`
//!   prints. Holes keep their number.
//! - **Dense**: what the quickfix-style export and the list editor use. Holes
//!   are skipped and entries are numbered 1..n.

use crate::marks::ProjectMarks;
use crate::model::Slot;
use std::str::FromStr;

/// A user input selecting one mark.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkId {
    /// A stable index as typed by the user, before any zero-index shift.
    Index(usize),
    Filename(String),
}

impl MarkId {
    /// Converts a user-supplied index to a 1-based stable index.
    ///
    /// Returns `None` for ids that cannot address a slot (`0` in one-based mode).
    pub fn stable_index(&self, zero_index: bool) -> Option<usize> {
        match self {
            MarkId::Index(i) if zero_index => i.checked_add(1),
            MarkId::Index(0) => None,
            MarkId::Index(i) => Some(*i),
            MarkId::Filename(_) => None,
        }
    }
}

impl std::fmt::Display for MarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkId::Index(i) => write!(f, "{}", i),
            MarkId::Filename(name) => write!(f, "\"{}\"", name),
        }
    }
}

impl FromStr for MarkId {
    type Err = String;

    /// All-digit input is an index, anything else a filename.
    /// A file literally named `3` can be addressed as `./3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Mark id cannot be empty".to_string());
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse()
                .map(MarkId::Index)
                .map_err(|e| format!("Invalid index {}: {}", trimmed, e));
        }
        Ok(MarkId::Filename(trimmed.to_string()))
    }
}

impl From<usize> for MarkId {
    fn from(index: usize) -> Self {
        MarkId::Index(index)
    }
}

impl From<&str> for MarkId {
    fn from(filename: &str) -> Self {
        MarkId::Filename(filename.to_string())
    }
}

/// A slot of the mark list together with its stable index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMark {
    pub index: usize,
    pub slot: Slot,
}

/// Lists every slot, holes included, with its stable index.
pub fn index_marks(marks: &ProjectMarks) -> Vec<DisplayMark> {
    marks
        .iter()
        .map(|(index, slot)| DisplayMark {
            index,
            slot: slot.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cursor;

    #[test]
    fn parses_indexes_and_filenames() {
        assert_eq!(MarkId::from_str("3"), Ok(MarkId::Index(3)));
        assert_eq!(MarkId::from_str(" 12 "), Ok(MarkId::Index(12)));
        assert_eq!(
            MarkId::from_str("src/main.rs"),
            Ok(MarkId::Filename("src/main.rs".into()))
        );
        assert_eq!(MarkId::from_str("./3"), Ok(MarkId::Filename("./3".into())));
        assert_eq!(MarkId::from_str("-1"), Ok(MarkId::Filename("-1".into())));
        assert!(MarkId::from_str("").is_err());
        assert!(MarkId::from_str("   ").is_err());
    }

    #[test]
    fn stable_index_applies_zero_index_shift() {
        assert_eq!(MarkId::Index(1).stable_index(false), Some(1));
        assert_eq!(MarkId::Index(0).stable_index(false), None);
        assert_eq!(MarkId::Index(0).stable_index(true), Some(1));
        assert_eq!(MarkId::Index(2).stable_index(true), Some(3));
        assert_eq!(MarkId::Index(usize::MAX).stable_index(true), None);
        assert_eq!(MarkId::from("a.rs").stable_index(false), None);
    }

    #[test]
    fn index_marks_keeps_holes() {
        let mut marks = ProjectMarks::new();
        marks.add("a.rs", Cursor::default()).unwrap();
        marks.add("b.rs", Cursor::default()).unwrap();
        marks.remove(&MarkId::from("a.rs"), false).unwrap();

        let listed = index_marks(&marks);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].index, 1);
        assert!(listed[0].slot.is_tombstone());
        assert_eq!(listed[1].index, 2);
        assert_eq!(listed[1].slot.filename(), "b.rs");
    }
}
