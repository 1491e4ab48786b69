//! Active list + recycle bin, versioned together
//!
//! Each collection has its own [`History`]. A single user action may commit
//! one or both of them, so `DualList` also keeps an action log recording which
//! collections each action committed. [`DualList::undo`] and
//! [`DualList::redo`] walk that log, keeping paired commits paired.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CollectionError;
use crate::history::History;
use crate::list::UniqueList;
use crate::source::Source;

/// Which of the two collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListKind {
    Active,
    Bin,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Active => write!(f, "active list"),
            ListKind::Bin => write!(f, "recycle bin"),
        }
    }
}

/// Result of deleting from the active list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Moved into the recycle bin
    MovedToBin,
    /// An identical source was already in the bin; removed from the active list only
    AlreadyInBin,
}

/// Result of restoring from the recycle bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Moved back into the active list
    Restored,
    /// The active list already holds this source; dropped from the bin only
    AlreadyActive,
}

/// Owns both collections and their paired undo log
#[derive(Debug)]
pub struct DualList {
    active: History<Source>,
    bin: History<Source>,
    actions: Vec<Vec<ListKind>>,
    applied: usize,
}

impl DualList {
    pub fn new(active: UniqueList<Source>, bin: UniqueList<Source>) -> Self {
        Self {
            active: History::new("active", active),
            bin: History::new("bin", bin),
            actions: Vec::new(),
            applied: 0,
        }
    }

    pub fn active(&self) -> &History<Source> {
        &self.active
    }

    pub fn bin(&self) -> &History<Source> {
        &self.bin
    }

    pub fn get(&self, kind: ListKind) -> &History<Source> {
        match kind {
            ListKind::Active => &self.active,
            ListKind::Bin => &self.bin,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: ListKind) -> &mut History<Source> {
        match kind {
            ListKind::Active => &mut self.active,
            ListKind::Bin => &mut self.bin,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.actions.len()
    }

    /// Commit the given collections as one user-level action.
    pub fn commit(&mut self, kinds: &[ListKind]) {
        if kinds.is_empty() {
            return;
        }
        self.actions.truncate(self.applied);
        for kind in kinds {
            self.get_mut(*kind).commit();
        }
        self.actions.push(kinds.to_vec());
        self.applied += 1;
    }

    /// Undo the most recent action on every collection it committed.
    pub fn undo(&mut self) -> Result<Vec<ListKind>, CollectionError> {
        if !self.can_undo() {
            return Err(CollectionError::NoUndoableState);
        }
        let kinds = self.actions[self.applied - 1].clone();
        for kind in kinds.iter().rev() {
            self.get_mut(*kind).undo()?;
        }
        self.applied -= 1;
        Ok(kinds)
    }

    /// Redo the next action on every collection it committed.
    pub fn redo(&mut self) -> Result<Vec<ListKind>, CollectionError> {
        if !self.can_redo() {
            return Err(CollectionError::NoRedoableState);
        }
        let kinds = self.actions[self.applied].clone();
        for kind in &kinds {
            self.get_mut(*kind).redo()?;
        }
        self.applied += 1;
        Ok(kinds)
    }

    /// Move `source` from the active list to the bin.
    ///
    /// When the bin already holds an identical source, the active copy is
    /// simply dropped. When the bin holds an older version (same identity,
    /// different content) it is replaced by the one being deleted.
    pub fn delete_active(&mut self, source: &Source) -> Result<DeleteOutcome, CollectionError> {
        if !self.active.live().contains_exact(source) {
            return Err(CollectionError::EntityNotFound);
        }

        if self.bin.live().contains_exact(source) {
            self.active.remove(source)?;
            self.commit(&[ListKind::Active]);
            return Ok(DeleteOutcome::AlreadyInBin);
        }

        let mut binned = source.clone();
        binned.pinned = false;
        match self.bin.live().position_by_identity(source) {
            Some(index) => {
                let stale = self.bin.live().as_slice()[index].clone();
                self.bin.replace(&stale, binned)?;
            }
            None => self.bin.add(binned)?,
        }
        self.active.remove(source)?;
        self.commit(&[ListKind::Bin, ListKind::Active]);
        Ok(DeleteOutcome::MovedToBin)
    }

    /// Permanently remove `source` from the bin.
    pub fn purge(&mut self, source: &Source) -> Result<(), CollectionError> {
        self.bin.remove(source)?;
        self.commit(&[ListKind::Bin]);
        Ok(())
    }

    /// Move `source` from the bin back to the end of the active list.
    pub fn restore(&mut self, source: &Source) -> Result<RestoreOutcome, CollectionError> {
        if !self.bin.live().contains_exact(source) {
            return Err(CollectionError::EntityNotFound);
        }

        if self.active.contains(source) {
            self.bin.remove(source)?;
            self.commit(&[ListKind::Bin]);
            return Ok(RestoreOutcome::AlreadyActive);
        }

        let mut restored = source.clone();
        restored.pinned = false;
        self.active.add(restored)?;
        self.bin.remove(source)?;
        self.commit(&[ListKind::Active, ListKind::Bin]);
        Ok(RestoreOutcome::Restored)
    }

    /// Remove everything from the bin, returning how many sources were dropped.
    pub fn empty_bin(&mut self) -> usize {
        let count = self.bin.len();
        if count > 0 {
            self.bin.clear();
            self.commit(&[ListKind::Bin]);
        }
        count
    }
}

impl Default for DualList {
    fn default() -> Self {
        Self::new(UniqueList::new(), UniqueList::new())
    }
}
