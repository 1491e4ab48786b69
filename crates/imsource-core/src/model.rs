//! In-memory session state that commands operate on
//!
//! The model ties together the two versioned collections, the pinned region,
//! the parser mode, the alias table and the view state (filter + selection).
//! Indices passed in are 0-based positions in the *displayed* list: the
//! current mode's collection after the active filter.

use crate::alias::AliasTable;
use crate::dual_list::{DeleteOutcome, DualList, ListKind, RestoreOutcome};
use crate::error::{CollectionError, Result};
use crate::history::History;
use crate::list::UniqueList;
use crate::mode::{ModeMachine, ParserMode};
use crate::pin::PinCoordinator;
use crate::source::Source;

#[derive(Debug, Default)]
pub struct Model {
    lists: DualList,
    pins: PinCoordinator,
    mode: ModeMachine,
    aliases: AliasTable,
    filter: Option<Vec<String>>,
    selected: Option<Source>,
}

impl Model {
    /// Build a model from loaded state. `pinned_count` is the persisted size
    /// of the pinned region.
    pub fn new(
        active: UniqueList<Source>,
        bin: UniqueList<Source>,
        aliases: AliasTable,
        pinned_count: usize,
    ) -> Self {
        let mut lists = DualList::new(active, bin);
        let pins = PinCoordinator::load(pinned_count, &mut lists);
        Self {
            lists,
            pins,
            mode: ModeMachine::new(),
            aliases,
            filter: None,
            selected: None,
        }
    }

    pub fn lists(&self) -> &DualList {
        &self.lists
    }

    pub fn active(&self) -> &History<Source> {
        self.lists.active()
    }

    pub fn bin(&self) -> &History<Source> {
        self.lists.bin()
    }

    pub fn mode(&self) -> ParserMode {
        self.mode.mode()
    }

    pub fn pinned_count(&self) -> usize {
        self.pins.pinned_count()
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn aliases_mut(&mut self) -> &mut AliasTable {
        &mut self.aliases
    }

    pub fn filter(&self) -> Option<&[String]> {
        self.filter.as_deref()
    }

    pub fn selected(&self) -> Option<&Source> {
        self.selected.as_ref()
    }

    /// The current mode's collection with the filter applied
    pub fn displayed(&self) -> Vec<&Source> {
        let list = self.lists.get(self.mode().list()).live();
        match &self.filter {
            None => list.iter().collect(),
            Some(keywords) => list
                .iter()
                .filter(|s| keywords.iter().any(|k| s.matches_keyword(k)))
                .collect(),
        }
    }

    /// The displayed source at `index`
    pub fn displayed_source(&self, index: usize) -> std::result::Result<Source, CollectionError> {
        let displayed = self.displayed();
        displayed
            .get(index)
            .map(|s| (*s).clone())
            .ok_or(CollectionError::InvalidIndex {
                index: index + 1,
                len: displayed.len(),
            })
    }

    /// Position in the active list of the displayed source at `index`
    fn active_position(&self, index: usize) -> Result<usize> {
        let source = self.displayed_source(index)?;
        Ok(self
            .lists
            .active()
            .live()
            .position(&source)
            .ok_or(CollectionError::EntityNotFound)?)
    }

    pub fn add_source(&mut self, source: Source) -> Result<()> {
        self.lists.get_mut(ListKind::Active).add(source)?;
        self.lists.commit(&[ListKind::Active]);
        Ok(())
    }

    /// Replace the displayed source at `index` with `edit(source)`.
    ///
    /// The pinned flag is carried over from the original.
    pub fn edit_source<F>(&mut self, index: usize, edit: F) -> Result<Source>
    where
        F: FnOnce(&Source) -> Source,
    {
        let target = self.displayed_source(index)?;
        let mut edited = edit(&target);
        edited.pinned = target.pinned;
        self.lists
            .get_mut(ListKind::Active)
            .replace(&target, edited.clone())?;
        self.lists.commit(&[ListKind::Active]);
        if self.selected.as_ref() == Some(&target) {
            self.selected = Some(edited.clone());
        }
        Ok(edited)
    }

    /// Delete from the active list (to the bin).
    pub fn delete_active(&mut self, index: usize) -> Result<(Source, DeleteOutcome)> {
        let source = self.displayed_source(index)?;
        let position = self.active_position(index)?;
        let outcome = self.lists.delete_active(&source)?;
        self.pins.released(position);
        self.deselect(&source);
        Ok((source, outcome))
    }

    /// Permanently delete from the bin.
    pub fn purge_bin(&mut self, index: usize) -> Result<Source> {
        let source = self.displayed_source(index)?;
        self.lists.purge(&source)?;
        self.deselect(&source);
        Ok(source)
    }

    pub fn restore(&mut self, index: usize) -> Result<(Source, RestoreOutcome)> {
        let source = self.displayed_source(index)?;
        let outcome = self.lists.restore(&source)?;
        self.deselect(&source);
        Ok((source, outcome))
    }

    pub fn empty_bin(&mut self) -> usize {
        self.selected = None;
        self.lists.empty_bin()
    }

    pub fn pin(&mut self, index: usize) -> Result<Source> {
        let position = self.active_position(index)?;
        let source = self.displayed_source(index)?;
        self.pins.pin(&mut self.lists, position)?;
        Ok(source)
    }

    pub fn unpin(&mut self, index: usize) -> Result<Source> {
        let position = self.active_position(index)?;
        let source = self.displayed_source(index)?;
        self.pins.unpin(&mut self.lists, position)?;
        Ok(source)
    }

    /// Move the displayed source at `from` to where the displayed source at `to` is.
    pub fn move_source(&mut self, from: usize, to: usize) -> Result<Source> {
        let from_position = self.active_position(from)?;
        let to_position = self.active_position(to)?;
        let source = self.displayed_source(from)?;
        self.pins.reorder(&mut self.lists, from_position, to_position)?;
        Ok(source)
    }

    /// Undo the last action on both collections. The pinned region is read
    /// back from the restored active list.
    pub fn undo(&mut self) -> Result<Vec<ListKind>> {
        let kinds = self.lists.undo()?;
        self.pins.sync(&self.lists);
        self.refresh_selection();
        Ok(kinds)
    }

    pub fn redo(&mut self) -> Result<Vec<ListKind>> {
        let kinds = self.lists.redo()?;
        self.pins.sync(&self.lists);
        self.refresh_selection();
        Ok(kinds)
    }

    pub fn set_filter(&mut self, keywords: Vec<String>) {
        self.filter = Some(keywords);
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    pub fn select(&mut self, index: usize) -> Result<Source> {
        let source = self.displayed_source(index)?;
        self.selected = Some(source.clone());
        Ok(source)
    }

    /// Switch to the recycle bin view. Returns whether the mode changed.
    pub fn enter_bin(&mut self) -> bool {
        let changed = self.mode.enter_recycle_bin();
        if changed {
            self.reset_view();
        }
        changed
    }

    /// Switch back to the active list view. Returns whether the mode changed.
    pub fn exit_bin(&mut self) -> bool {
        let changed = self.mode.exit_recycle_bin();
        if changed {
            self.reset_view();
        }
        changed
    }

    fn reset_view(&mut self) {
        self.filter = None;
        self.selected = None;
    }

    fn deselect(&mut self, source: &Source) {
        if self.selected.as_ref() == Some(source) {
            self.selected = None;
        }
    }

    fn refresh_selection(&mut self) {
        let list = self.lists.get(self.mode().list()).live();
        if let Some(selected) = &self.selected {
            if !list.contains_exact(selected) {
                self.selected = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ImsourceError, PinError};

    fn src(title: &str) -> Source {
        Source::new(title, "book", "Anon")
    }

    fn model_of(titles: &[&str]) -> Model {
        let items = titles.iter().map(|t| src(t)).collect();
        Model::new(
            UniqueList::from_items(items).unwrap(),
            UniqueList::new(),
            AliasTable::new(),
            0,
        )
    }

    fn displayed_titles(model: &Model) -> Vec<String> {
        model.displayed().iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn test_filter_maps_indices() {
        let mut model = model_of(&["Alpha", "Beta", "Gamma"]);
        model.set_filter(vec!["gamma".to_string()]);
        assert_eq!(displayed_titles(&model), ["Gamma"]);

        let (deleted, _) = model.delete_active(0).unwrap();
        assert_eq!(deleted.title, "Gamma");
        assert!(model.displayed().is_empty());
        model.clear_filter();
        assert_eq!(displayed_titles(&model), ["Alpha", "Beta"]);
    }

    #[test]
    fn test_index_out_of_displayed_range() {
        let mut model = model_of(&["Alpha"]);
        let err = model.delete_active(1).unwrap_err();
        assert!(matches!(
            err,
            ImsourceError::Collection(CollectionError::InvalidIndex { index: 2, len: 1 })
        ));
    }

    #[test]
    fn test_deleting_pinned_source_shrinks_region() {
        let mut model = model_of(&["A", "B", "C"]);
        model.pin(2).unwrap();
        model.pin(2).unwrap(); // B C A
        model.delete_active(0).unwrap();
        assert_eq!(displayed_titles(&model), ["C", "A"]);
        assert_eq!(model.pinned_count(), 1);
        assert!(model.active().get(0).unwrap().pinned);
        assert!(!model.active().get(1).unwrap().pinned);
    }

    #[test]
    fn test_redo_restores_pin_made_after_commit() {
        let mut model = model_of(&["A", "B", "C"]);
        model.add_source(src("D")).unwrap();
        model.pin(3).unwrap(); // D A B C
        model.undo().unwrap(); // D removed
        assert_eq!(displayed_titles(&model), ["A", "B", "C"]);
        assert_eq!(model.pinned_count(), 0);

        model.redo().unwrap();
        assert_eq!(displayed_titles(&model), ["D", "A", "B", "C"]);
        assert_eq!(model.pinned_count(), 1);
        assert!(model.active().get(0).unwrap().pinned);
        assert!(!model.active().get(1).unwrap().pinned);
    }

    #[test]
    fn test_pin_survives_unrelated_undo() {
        let mut model = model_of(&["A", "B", "C"]);
        model.add_source(src("D")).unwrap();
        model.pin(1).unwrap(); // B A C D
        model.undo().unwrap();
        assert_eq!(displayed_titles(&model), ["B", "A", "C"]);
        assert_eq!(model.pinned_count(), 1);
        model.redo().unwrap();
        assert_eq!(displayed_titles(&model), ["B", "A", "C", "D"]);
        assert_eq!(model.pinned_count(), 1);
    }

    #[test]
    fn test_edit_keeps_pinned_flag() {
        let mut model = model_of(&["A", "B"]);
        model.pin(1).unwrap();
        let edited = model
            .edit_source(0, |s| s.clone().with_tags(["x"]))
            .unwrap();
        assert!(edited.pinned);
        assert_eq!(model.pinned_count(), 1);
        assert!(model.lists().can_undo());
    }

    #[test]
    fn test_move_respects_pinned_region() {
        let mut model = model_of(&["A", "B", "C"]);
        model.pin(1).unwrap();
        let err = model.move_source(0, 2).unwrap_err();
        assert!(matches!(err, ImsourceError::Pin(PinError::PinnedPositionConflict)));
        model.move_source(2, 1).unwrap();
        assert_eq!(displayed_titles(&model), ["B", "C", "A"]);
    }

    #[test]
    fn test_bin_mode_shows_bin_and_resets_view() {
        let mut model = model_of(&["A", "B"]);
        model.delete_active(0).unwrap();
        model.set_filter(vec!["b".to_string()]);
        model.select(0).unwrap();

        assert!(model.enter_bin());
        assert!(model.filter().is_none());
        assert!(model.selected().is_none());
        assert_eq!(displayed_titles(&model), ["A"]);

        model.restore(0).unwrap();
        assert!(model.exit_bin());
        assert_eq!(displayed_titles(&model), ["B", "A"]);
    }

    #[test]
    fn test_selection_dropped_when_source_undone_away() {
        let mut model = model_of(&[]);
        model.add_source(src("A")).unwrap();
        model.select(0).unwrap();
        model.undo().unwrap();
        assert!(model.selected().is_none());
    }
}
