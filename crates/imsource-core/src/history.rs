//! Snapshot-based undo/redo over a [`UniqueList`]
//!
//! `History` wraps a plain list and keeps full copies of it. The list at
//! `snapshots[pointer]` always equals the live content once a mutation has
//! been committed (or amended), and `0 <= pointer < snapshots.len()` holds
//! at all times.
//!
//! Mutations only touch the live content. Callers decide when a change
//! becomes a history entry by calling [`History::commit`].

use std::fmt;

use crate::error::CollectionError;
use crate::list::{Entry, UniqueList};

/// What happened to a history, passed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    Committed,
    Undone,
    Redone,
    Amended,
}

/// Callback fired synchronously after a history changes.
///
/// Observers only see the content, so they cannot re-enter the history.
pub type Observer<T> = Box<dyn FnMut(HistoryEvent, &[T])>;

/// A versioned, duplicate-free collection
pub struct History<T> {
    name: &'static str,
    live: UniqueList<T>,
    snapshots: Vec<UniqueList<T>>,
    pointer: usize,
    observers: Vec<Observer<T>>,
}

impl<T: Entry> History<T> {
    /// Create a history whose only snapshot is `initial`.
    pub fn new(name: &'static str, initial: UniqueList<T>) -> Self {
        Self {
            name,
            snapshots: vec![initial.clone()],
            live: initial,
            pointer: 0,
            observers: Vec::new(),
        }
    }

    pub fn empty(name: &'static str) -> Self {
        Self::new(name, UniqueList::new())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The live content
    pub fn live(&self) -> &UniqueList<T> {
        &self.live
    }

    pub(crate) fn live_mut(&mut self) -> &mut UniqueList<T> {
        &mut self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.live.get(index)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.live.contains(item)
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn subscribe(&mut self, observer: Observer<T>) {
        self.observers.push(observer);
    }

    pub fn add(&mut self, item: T) -> Result<(), CollectionError> {
        self.live.add(item)
    }

    pub fn add_at(&mut self, item: T, index: usize) -> Result<(), CollectionError> {
        self.live.add_at(item, index)
    }

    pub fn remove(&mut self, item: &T) -> Result<usize, CollectionError> {
        self.live.remove(item)
    }

    pub fn replace(&mut self, target: &T, replacement: T) -> Result<(), CollectionError> {
        self.live.replace(target, replacement)
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.snapshots.len()
    }

    /// Record the live content as a new history entry, dropping any redo states.
    pub fn commit(&mut self) {
        self.snapshots.truncate(self.pointer + 1);
        self.snapshots.push(self.live.clone());
        self.pointer += 1;
        tracing::debug!(
            history = self.name,
            pointer = self.pointer,
            len = self.live.len(),
            "commit"
        );
        self.notify(HistoryEvent::Committed);
    }

    pub fn undo(&mut self) -> Result<(), CollectionError> {
        if !self.can_undo() {
            return Err(CollectionError::NoUndoableState);
        }
        self.pointer -= 1;
        self.live = self.snapshots[self.pointer].clone();
        tracing::debug!(history = self.name, pointer = self.pointer, "undo");
        self.notify(HistoryEvent::Undone);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), CollectionError> {
        if !self.can_redo() {
            return Err(CollectionError::NoRedoableState);
        }
        self.pointer += 1;
        self.live = self.snapshots[self.pointer].clone();
        tracing::debug!(history = self.name, pointer = self.pointer, "redo");
        self.notify(HistoryEvent::Redone);
        Ok(())
    }

    /// Overwrite the snapshot at `pointer` with the live content.
    ///
    /// Used for presentation-only changes (pinning) that must not become
    /// history entries of their own.
    pub(crate) fn amend(&mut self) {
        self.snapshots[self.pointer] = self.live.clone();
        self.notify(HistoryEvent::Amended);
    }

    /// Apply `edit` to the live content and to every snapshot, then amend.
    ///
    /// For presentation state that must look the same whichever snapshot is
    /// restored.
    pub(crate) fn rewrite_all<E, F>(&mut self, mut edit: F) -> Result<(), E>
    where
        F: FnMut(&mut UniqueList<T>) -> Result<(), E>,
    {
        for (index, snapshot) in self.snapshots.iter_mut().enumerate() {
            if index != self.pointer {
                edit(snapshot)?;
            }
        }
        edit(&mut self.live)?;
        self.amend();
        Ok(())
    }

    fn notify(&mut self, event: HistoryEvent) {
        let items = self.live.as_slice();
        for observer in &mut self.observers {
            observer(event, items);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("name", &self.name)
            .field("live", &self.live)
            .field("pointer", &self.pointer)
            .field("snapshots", &self.snapshots.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
