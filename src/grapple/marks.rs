//! # Mark List Engine
//!
//! [`ProjectMarks`] is the ordered, index-addressed list of marks for one
//! project. It is a vector of [`Slot`]s where position `i - 1` holds stable
//! index `i`.
//!
//! ## Invariants
//!
//! - **No trailing tombstones.** Every mutation ends by compacting the tail, so
//!   [`ProjectMarks::len`] is always the highest occupied index (or 0).
//! - **Stable indexes.** Interior tombstones are kept until they are reused by
//!   [`ProjectMarks::add`] or the whole list is rewritten by
//!   [`ProjectMarks::set_from_ordered_list`].
//! - **Unique filenames.** No two occupied slots share a filename. Filenames are
//!   compared as given; callers normalize before calling in.
//!
//! Every operation validates its input before touching the list, so a failing
//! call never leaves a partial change behind.

use crate::error::{GrappleError, Result};
use crate::index::MarkId;
use crate::model::{Cursor, Mark, Slot};
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Highest stable index a mark can be placed at. Placing pads the gap with
/// holes, so the bound also caps how large a list can grow.
pub const MAX_INDEX: usize = 999;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMarks {
    slots: Vec<Slot>,
}

/// Outcome of [`ProjectMarks::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added(usize),
    Removed(usize),
}

/// An entry of a wholesale list replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// A bare filename; rehydrated from the existing mark when there is one.
    Filename(String),
    Mark(Mark),
}

impl From<&str> for ListEntry {
    fn from(filename: &str) -> Self {
        ListEntry::Filename(filename.to_string())
    }
}

impl From<String> for ListEntry {
    fn from(filename: String) -> Self {
        ListEntry::Filename(filename)
    }
}

impl From<Mark> for ListEntry {
    fn from(mark: Mark) -> Self {
        ListEntry::Mark(mark)
    }
}

/// One line of the quickfix-style export. `index` is dense, not stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub index: usize,
    pub label: String,
    pub filename: String,
    pub row: usize,
    pub col: usize,
}

impl ProjectMarks {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Builds a list from raw slots, dropping any trailing tombstones.
    pub fn from_slots(slots: Vec<Slot>) -> Self {
        let mut marks = Self { slots };
        marks.compact();
        marks
    }

    /// Highest populated index. Interior tombstones count.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterates `(stable index, slot)` pairs, holes included.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots.iter().enumerate().map(|(i, slot)| (i + 1, slot))
    }

    /// Occupied marks only, with their stable indexes.
    pub fn marks(&self) -> impl Iterator<Item = (usize, &Mark)> {
        self.iter()
            .filter_map(|(i, slot)| slot.mark().map(|mark| (i, mark)))
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        index.checked_sub(1).and_then(|i| self.slots.get(i))
    }

    /// True when `index` holds a mark (not a hole, not out of range).
    pub fn is_valid(&self, index: usize) -> bool {
        self.slot(index).is_some_and(|slot| !slot.is_tombstone())
    }

    pub fn index_of(&self, filename: &str) -> Option<usize> {
        if filename.is_empty() {
            return None;
        }
        self.marks()
            .find(|(_, mark)| mark.filename == filename)
            .map(|(i, _)| i)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.index_of(filename).is_some()
    }

    /// Resolves an id to a stable index within `1..=len`.
    ///
    /// The index may point at a hole. Out-of-range ids resolve to `None`.
    pub fn resolve(&self, id: &MarkId, zero_index: bool) -> Option<usize> {
        match id {
            MarkId::Filename(name) => self.index_of(name),
            MarkId::Index(_) => id
                .stable_index(zero_index)
                .filter(|i| (1..=self.len()).contains(i)),
        }
    }

    /// Looks up a mark by id. A hole yields a mark with an empty filename.
    pub fn get(&self, id: &MarkId, zero_index: bool) -> Option<Mark> {
        self.resolve(id, zero_index)
            .and_then(|i| self.slot(i))
            .map(Slot::to_mark)
    }

    /// Marks `filename`, reusing the lowest hole or appending.
    ///
    /// Returns the mark's index and whether it was newly added. Adding an
    /// already marked file changes nothing.
    pub fn add(&mut self, filename: &str, cursor: Cursor) -> Result<(usize, bool)> {
        validate_filename(filename)?;
        if let Some(existing) = self.index_of(filename) {
            return Ok((existing, false));
        }

        let index = self.first_empty_slot();
        let slot = Slot::Occupied(Mark::new(filename, cursor));
        if index > self.slots.len() {
            self.slots.push(slot);
        } else {
            self.slots[index - 1] = slot;
        }
        self.compact();
        Ok((index, true))
    }

    /// Replaces the mark at `id` with a hole. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &MarkId, zero_index: bool) -> Result<Option<(usize, Mark)>> {
        if let MarkId::Filename(name) = id {
            validate_filename(name)?;
        }
        let Some(index) = self.resolve(id, zero_index).filter(|i| self.is_valid(*i)) else {
            return Ok(None);
        };

        let removed = std::mem::replace(&mut self.slots[index - 1], Slot::Tombstone);
        self.compact();
        Ok(removed.mark().cloned().map(|mark| (index, mark)))
    }

    pub fn toggle(&mut self, filename: &str, cursor: Cursor) -> Result<Toggled> {
        validate_filename(filename)?;
        if let Some(index) = self.index_of(filename) {
            self.slots[index - 1] = Slot::Tombstone;
            self.compact();
            Ok(Toggled::Removed(index))
        } else {
            let (index, _) = self.add(filename, cursor)?;
            Ok(Toggled::Added(index))
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Replaces the whole list, in order.
    ///
    /// Bare filenames that are already marked keep their stored cursor; new
    /// ones get `cursor`. Empty filenames become holes. A filename repeated
    /// later in the list becomes a hole so that line positions are kept.
    pub fn set_from_ordered_list<I>(&mut self, entries: I, cursor: Cursor)
    where
        I: IntoIterator<Item = ListEntry>,
    {
        let mut seen = HashSet::new();
        let slots: Vec<Slot> = entries
            .into_iter()
            .map(|entry| {
                let mark = match entry {
                    ListEntry::Filename(name) if name.is_empty() => return Slot::Tombstone,
                    ListEntry::Filename(name) => self
                        .index_of(&name)
                        .and_then(|i| self.slot(i))
                        .and_then(Slot::mark)
                        .cloned()
                        .unwrap_or_else(|| Mark::new(name, cursor)),
                    ListEntry::Mark(mark) if mark.filename.is_empty() => return Slot::Tombstone,
                    ListEntry::Mark(mark) => mark,
                };
                if seen.insert(mark.filename.clone()) {
                    Slot::Occupied(mark)
                } else {
                    Slot::Tombstone
                }
            })
            .collect();

        self.slots = slots;
        self.compact();
    }

    /// Updates the cursor stored for `filename`. Returns the index touched.
    pub fn store_cursor(&mut self, filename: &str, cursor: Cursor) -> Option<usize> {
        let index = self.index_of(filename)?;
        if let Slot::Occupied(mark) = &mut self.slots[index - 1] {
            mark.row = cursor.row;
            mark.col = cursor.col;
        }
        Some(index)
    }

    /// Puts `filename` at stable `index`, vacating its previous slot and
    /// padding any gap with holes. Whatever occupied `index` is replaced.
    ///
    /// `index` must lie in `1..=MAX_INDEX`.
    pub fn set_current_at(&mut self, index: usize, filename: &str, cursor: Cursor) -> Result<()> {
        validate_filename(filename)?;
        validate_index(index)?;

        if let Some(previous) = self.index_of(filename) {
            self.slots[previous - 1] = Slot::Tombstone;
        }
        if self.slots.len() < index {
            self.slots.resize(index, Slot::Tombstone);
        }
        self.slots[index - 1] = Slot::Occupied(Mark::new(filename, cursor));
        self.compact();
        Ok(())
    }

    /// Statusline tag for `filename`: `M<index>`, or empty when unmarked.
    pub fn status(&self, filename: &str) -> String {
        self.index_of(filename)
            .map(|i| format!("M{}", i))
            .unwrap_or_default()
    }

    /// Dense, hole-free listing for quickfix-style consumers.
    pub fn to_ordered_export(&self) -> Vec<ExportEntry> {
        self.marks()
            .enumerate()
            .map(|(n, (_, mark))| ExportEntry {
                index: n + 1,
                label: format!("{}: {}", n + 1, mark.filename),
                filename: mark.filename.clone(),
                row: mark.row,
                col: mark.col,
            })
            .collect()
    }

    fn first_empty_slot(&self) -> usize {
        self.slots
            .iter()
            .position(Slot::is_tombstone)
            .map(|i| i + 1)
            .unwrap_or(self.slots.len() + 1)
    }

    /// Drops trailing holes. Returns whether anything was removed.
    fn compact(&mut self) -> bool {
        let before = self.slots.len();
        while self.slots.last().is_some_and(Slot::is_tombstone) {
            self.slots.pop();
        }
        self.slots.len() != before
    }
}

/// Checks a stable index for placement, before anything is allocated.
pub fn validate_index(index: usize) -> Result<()> {
    if index == 0 {
        return Err(GrappleError::InvalidInput(
            "Mark indexes start at 1".to_string(),
        ));
    }
    if index > MAX_INDEX {
        return Err(GrappleError::InvalidInput(format!(
            "Mark index {} is above the limit of {}",
            index, MAX_INDEX
        )));
    }
    Ok(())
}

fn validate_filename(filename: &str) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(GrappleError::InvalidInput(
            "Filename cannot be empty".to_string(),
        ));
    }
    Ok(())
}

impl Serialize for ProjectMarks {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.slots)
    }
}
