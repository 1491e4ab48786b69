//! Pinned region of the active list
//!
//! The first `pinned_count` sources of the active list are the pinned ones,
//! most recently pinned first. Pin and unpin are presentation changes: they
//! never become undo steps. Instead they are written into every snapshot of
//! the active history that holds the source, so undo and redo restore content
//! with the pin set already in place and the count is read back from the
//! restored list. General reordering (`reorder`) is a content change and
//! commits.

use std::convert::Infallible;

use crate::dual_list::{DualList, ListKind};
use crate::error::{CollectionError, PinError, Result};
use crate::list::UniqueList;
use crate::source::Source;

/// Maximum number of pinned sources
pub const MAX_PINNED: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinCoordinator {
    pinned_count: usize,
}

impl PinCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a persisted count: the first `count` active sources become the
    /// pinned region (clamped to the limit and the list length).
    pub fn load(count: usize, lists: &mut DualList) -> Self {
        let count = count.min(MAX_PINNED).min(lists.active().len());
        if count > 0 {
            tracing::debug!(pinned = count, "restoring pinned region");
        }
        let active = lists.get_mut(ListKind::Active);
        let marked: std::result::Result<(), Infallible> = active.rewrite_all(|list| {
            mark_prefix(list, count);
            Ok(())
        });
        if let Err(never) = marked {
            match never {}
        }
        Self {
            pinned_count: count,
        }
    }

    pub fn pinned_count(&self) -> usize {
        self.pinned_count
    }

    pub fn is_pinned_position(&self, index: usize) -> bool {
        index < self.pinned_count
    }

    /// Pin the active source at `index`, moving it to the front.
    pub fn pin(&mut self, lists: &mut DualList, index: usize) -> Result<()> {
        check_index(index, lists.active().len())?;
        if self.is_pinned_position(index) {
            return Err(PinError::AlreadyPinned.into());
        }
        if self.pinned_count + 1 > MAX_PINNED {
            return Err(PinError::PinLimitExceeded { limit: MAX_PINNED }.into());
        }

        let active = lists.get_mut(ListKind::Active);
        let target = active.live().as_slice()[index].clone();
        active.rewrite_all(|list| pin_in(list, &target))?;
        self.sync(lists);
        Ok(())
    }

    /// Unpin the active source at `index`, placing it right after the
    /// remaining pinned sources.
    pub fn unpin(&mut self, lists: &mut DualList, index: usize) -> Result<()> {
        check_index(index, lists.active().len())?;
        if !self.is_pinned_position(index) {
            return Err(PinError::NotPinned.into());
        }

        let active = lists.get_mut(ListKind::Active);
        let target = active.live().as_slice()[index].clone();
        active.rewrite_all(|list| unpin_in(list, &target))?;
        self.sync(lists);
        Ok(())
    }

    /// Move the active source at `from` to `to` and commit.
    ///
    /// Neither position may be inside the pinned region.
    pub fn reorder(&self, lists: &mut DualList, from: usize, to: usize) -> Result<()> {
        if self.is_pinned_position(from) || self.is_pinned_position(to) {
            return Err(PinError::PinnedPositionConflict.into());
        }
        let len = lists.active().len();
        check_index(from, len)?;
        check_index(to, len)?;

        let active = lists.get_mut(ListKind::Active);
        let source = take(active.live_mut(), from)?;
        active.live_mut().add_at(source, to)?;
        lists.commit(&[ListKind::Active]);
        Ok(())
    }

    /// Shrink the pinned region after the active source at `index` was removed.
    pub fn released(&mut self, index: usize) {
        if self.is_pinned_position(index) {
            self.pinned_count -= 1;
        }
    }

    /// Read the pinned region back from the active list, after undo or redo
    /// replaced its content.
    pub fn sync(&mut self, lists: &DualList) {
        self.pinned_count = pinned_prefix(lists.active().live());
    }
}

fn pinned_prefix(list: &UniqueList<Source>) -> usize {
    list.iter().take_while(|s| s.pinned).count()
}

fn mark_prefix(list: &mut UniqueList<Source>, count: usize) {
    for index in 0..list.len() {
        if let Some(source) = list.get_mut(index) {
            source.pinned = index < count;
        }
    }
}

/// Pin `target` in one version of the list. Versions without it, or whose
/// region is already full, are left alone.
fn pin_in(list: &mut UniqueList<Source>, target: &Source) -> std::result::Result<(), CollectionError> {
    let Some(index) = list.position_by_identity(target) else {
        return Ok(());
    };
    let region = pinned_prefix(list);
    if index < region || region >= MAX_PINNED {
        return Ok(());
    }
    let mut source = take(list, index)?;
    source.pinned = true;
    list.add_at(source, 0)
}

/// Unpin `target` in one version of the list, moving it to the end of what
/// remains of the region.
fn unpin_in(list: &mut UniqueList<Source>, target: &Source) -> std::result::Result<(), CollectionError> {
    let Some(index) = list.position_by_identity(target) else {
        return Ok(());
    };
    if index >= pinned_prefix(list) {
        return Ok(());
    }
    let mut source = take(list, index)?;
    source.pinned = false;
    let region = pinned_prefix(list);
    list.add_at(source, region)
}

fn check_index(index: usize, len: usize) -> std::result::Result<(), CollectionError> {
    if index >= len {
        return Err(CollectionError::InvalidIndex {
            index: index + 1,
            len,
        });
    }
    Ok(())
}

fn take(list: &mut UniqueList<Source>, index: usize) -> std::result::Result<Source, CollectionError> {
    list.remove_at(index).ok_or(CollectionError::InvalidIndex {
        index: index + 1,
        len: list.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImsourceError;

    fn src(title: &str) -> Source {
        Source::new(title, "book", "Anon")
    }

    fn lists_of(titles: &[&str]) -> DualList {
        let items = titles.iter().map(|t| src(t)).collect();
        DualList::new(UniqueList::from_items(items).unwrap(), UniqueList::new())
    }

    fn titles(lists: &DualList) -> Vec<String> {
        lists.active().live().iter().map(|s| s.title.clone()).collect()
    }

    fn assert_pin_invariant(pins: &PinCoordinator, lists: &DualList) {
        assert!(pins.pinned_count() <= MAX_PINNED);
        for (i, source) in lists.active().live().iter().enumerate() {
            assert_eq!(source.pinned, i < pins.pinned_count(), "position {i}");
        }
    }

    #[test]
    fn test_pin_moves_to_front_without_commit() {
        let mut lists = lists_of(&["A", "B", "C"]);
        let mut pins = PinCoordinator::new();
        pins.pin(&mut lists, 1).unwrap();

        assert_eq!(titles(&lists), ["B", "A", "C"]);
        assert_eq!(pins.pinned_count(), 1);
        assert!(!lists.can_undo());
        assert_pin_invariant(&pins, &lists);
    }

    #[test]
    fn test_newest_pin_goes_first() {
        let mut lists = lists_of(&["A", "B", "C"]);
        let mut pins = PinCoordinator::new();
        pins.pin(&mut lists, 1).unwrap();
        pins.pin(&mut lists, 2).unwrap();
        assert_eq!(titles(&lists), ["C", "B", "A"]);
        assert_pin_invariant(&pins, &lists);
    }

    #[test]
    fn test_pin_inside_region_fails() {
        let mut lists = lists_of(&["A", "B"]);
        let mut pins = PinCoordinator::new();
        pins.pin(&mut lists, 1).unwrap();
        let err = pins.pin(&mut lists, 0).unwrap_err();
        assert!(matches!(err, ImsourceError::Pin(PinError::AlreadyPinned)));
    }

    #[test]
    fn test_pin_limit() {
        let mut lists = lists_of(&["A", "B", "C", "D", "E", "F"]);
        let mut pins = PinCoordinator::new();
        for _ in 0..MAX_PINNED {
            pins.pin(&mut lists, 5).unwrap();
        }
        let err = pins.pin(&mut lists, 5).unwrap_err();
        assert!(matches!(
            err,
            ImsourceError::Pin(PinError::PinLimitExceeded { limit: MAX_PINNED })
        ));
        assert_eq!(pins.pinned_count(), MAX_PINNED);
        assert_pin_invariant(&pins, &lists);
    }

    #[test]
    fn test_unpin_goes_to_end_of_region() {
        let mut lists = lists_of(&["A", "B", "C", "D"]);
        let mut pins = PinCoordinator::new();
        pins.pin(&mut lists, 2).unwrap(); // C A B D
        pins.pin(&mut lists, 2).unwrap(); // B C A D
        pins.unpin(&mut lists, 0).unwrap(); // C B A D

        assert_eq!(titles(&lists), ["C", "B", "A", "D"]);
        assert_eq!(pins.pinned_count(), 1);
        assert_pin_invariant(&pins, &lists);
    }

    #[test]
    fn test_unpin_outside_region_fails() {
        let mut lists = lists_of(&["A", "B"]);
        let mut pins = PinCoordinator::new();
        let err = pins.unpin(&mut lists, 0).unwrap_err();
        assert!(matches!(err, ImsourceError::Pin(PinError::NotPinned)));
    }

    #[test]
    fn test_reorder_commits_and_respects_region() {
        let mut lists = lists_of(&["A", "B", "C"]);
        let mut pins = PinCoordinator::new();
        pins.pin(&mut lists, 1).unwrap();

        pins.reorder(&mut lists, 1, 2).unwrap();
        assert_eq!(titles(&lists), ["B", "C", "A"]);
        assert!(lists.can_undo());

        let err = pins.reorder(&mut lists, 0, 1).unwrap_err();
        assert!(matches!(err, ImsourceError::Pin(PinError::PinnedPositionConflict)));
        assert_eq!(titles(&lists), ["B", "C", "A"]);
    }

    #[test]
    fn test_index_out_of_range() {
        let mut lists = lists_of(&["A"]);
        let mut pins = PinCoordinator::new();
        let err = pins.pin(&mut lists, 3).unwrap_err();
        assert!(matches!(
            err,
            ImsourceError::Collection(CollectionError::InvalidIndex { index: 4, len: 1 })
        ));
    }

    #[test]
    fn test_pin_is_written_into_older_snapshots() {
        let mut lists = lists_of(&["A", "B", "C"]);
        let mut pins = PinCoordinator::new();
        pins.reorder(&mut lists, 0, 2).unwrap(); // B C A
        pins.pin(&mut lists, 2).unwrap(); // A B C

        lists.undo().unwrap();
        pins.sync(&lists);
        assert_eq!(titles(&lists), ["A", "B", "C"]);
        assert_eq!(pins.pinned_count(), 1);
        assert_pin_invariant(&pins, &lists);

        lists.redo().unwrap();
        pins.sync(&lists);
        assert_eq!(titles(&lists), ["A", "B", "C"]);
        assert_eq!(pins.pinned_count(), 1);
    }

    #[test]
    fn test_unpin_is_written_into_older_snapshots() {
        let mut lists = lists_of(&["A", "B", "C"]);
        let mut pins = PinCoordinator::new();
        pins.pin(&mut lists, 2).unwrap(); // C A B
        pins.reorder(&mut lists, 1, 2).unwrap(); // C B A
        pins.unpin(&mut lists, 0).unwrap();

        lists.undo().unwrap();
        pins.sync(&lists);
        assert_eq!(titles(&lists), ["C", "A", "B"]);
        assert_eq!(pins.pinned_count(), 0);
        assert_pin_invariant(&pins, &lists);
    }

    #[test]
    fn test_reorder_reports_conflict_before_bounds() {
        let mut lists = lists_of(&["A", "B", "C"]);
        let mut pins = PinCoordinator::new();
        pins.pin(&mut lists, 1).unwrap();

        let err = pins.reorder(&mut lists, 0, 3).unwrap_err();
        assert!(matches!(err, ImsourceError::Pin(PinError::PinnedPositionConflict)));
        let err = pins.reorder(&mut lists, 7, 0).unwrap_err();
        assert!(matches!(err, ImsourceError::Pin(PinError::PinnedPositionConflict)));
        let err = pins.reorder(&mut lists, 1, 3).unwrap_err();
        assert!(matches!(
            err,
            ImsourceError::Collection(CollectionError::InvalidIndex { index: 4, len: 3 })
        ));
    }

    #[test]
    fn test_released_shrinks_region() {
        let mut pins = PinCoordinator { pinned_count: 2 };
        pins.released(3);
        assert_eq!(pins.pinned_count(), 2);
        pins.released(1);
        assert_eq!(pins.pinned_count(), 1);
    }

    #[test]
    fn test_load_clamps_count() {
        let mut lists = lists_of(&["A", "B"]);
        let pins = PinCoordinator::load(9, &mut lists);
        assert_eq!(pins.pinned_count(), 2);
        assert_pin_invariant(&pins, &lists);
    }
}
