use crate::marks::ProjectMarks;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Filetype reported by editor integrations for the mark list view itself.
pub const LIST_FILETYPE: &str = "grapple";

/// A cursor position: 1-based row, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self { row: 1, col: 0 }
    }
}

/// A bookmarked file plus the last known cursor position in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    pub filename: String,
    pub row: usize,
    pub col: usize,
}

impl Mark {
    pub fn new(filename: impl Into<String>, cursor: Cursor) -> Self {
        Self {
            filename: filename.into(),
            row: cursor.row,
            col: cursor.col,
        }
    }

    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.row, self.col)
    }
}

/// One position of a project's mark list.
///
/// A `Tombstone` is a removed mark whose slot is kept so that the indexes of
/// the marks after it do not shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Occupied(Mark),
    Tombstone,
}

impl Slot {
    pub fn mark(&self) -> Option<&Mark> {
        match self {
            Slot::Occupied(mark) => Some(mark),
            Slot::Tombstone => None,
        }
    }

    /// The slot's filename; tombstones read as the empty string.
    pub fn filename(&self) -> &str {
        match self {
            Slot::Occupied(mark) => &mark.filename,
            Slot::Tombstone => "",
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// The slot seen as a mark. Tombstones become a mark with an empty filename.
    pub fn to_mark(&self) -> Mark {
        match self {
            Slot::Occupied(mark) => mark.clone(),
            Slot::Tombstone => Mark::new("", Cursor::new(0, 0)),
        }
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mark = self.to_mark();
        let mut state = serializer.serialize_struct("Mark", 3)?;
        state.serialize_field("filename", &mark.filename)?;
        state.serialize_field("row", &mark.row)?;
        state.serialize_field("col", &mark.col)?;
        state.end()
    }
}

/// Settings shared by every project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Partition marks by VCS branch instead of by working directory.
    pub mark_branch: bool,
    /// Apply list-view edits when the view is closed without writing.
    pub save_on_toggle: bool,
    /// Persist the cache file after every change.
    pub save_on_change: bool,
    pub excluded_filetypes: BTreeSet<String>,
    /// Integer mark ids count from zero.
    #[serde(default)]
    pub zero_index: bool,
    /// Settings this crate does not interpret, kept so they survive a save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            mark_branch: false,
            save_on_toggle: false,
            save_on_change: true,
            excluded_filetypes: BTreeSet::from([LIST_FILETYPE.to_string()]),
            zero_index: false,
            extra: Map::new(),
        }
    }
}

impl GlobalSettings {
    pub fn is_excluded(&self, filetype: &str) -> bool {
        self.excluded_filetypes.contains(filetype)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkConfig {
    pub marks: ProjectMarks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Project {
    pub mark: MarkConfig,
    /// Per-project tables written by other tools (e.g. `term`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The resolved, in-memory configuration. Single source of truth for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    pub global_settings: GlobalSettings,
    pub projects: BTreeMap<String, Project>,
}
