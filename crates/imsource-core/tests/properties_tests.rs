//! End-to-end behaviour of the collections, pins, aliases and undo log
//!
//! Drives [`Logic`] with in-memory storage the way the TUI does, plus a few
//! checks directly against `History` and `DualList`.

use imsource_core::{
    CollectionError, DualList, History, ImsourceError, ListKind, Logic, MemoryStorage,
    PinCoordinator, PinError, Source, UniqueList, MAX_PINNED,
};
use rstest::rstest;

fn source(title: &str) -> Source {
    Source::new(title, "book", "Anon")
}

fn logic_with(titles: &[&str]) -> Logic<MemoryStorage> {
    Logic::new(MemoryStorage {
        active: titles.iter().map(|t| source(t)).collect(),
        ..Default::default()
    })
}

fn titles(history: &History<Source>) -> Vec<String> {
    history.live().iter().map(|s| s.title.clone()).collect()
}

// === History ===

#[test]
fn test_undo_then_redo_restores_exact_content() {
    let mut history = History::empty("active");
    history.add(source("A")).unwrap();
    history.commit();
    history.add(source("B").with_detail("2nd")).unwrap();
    history.commit();
    history
        .replace(&source("A"), source("A").with_tags(["edited"]))
        .unwrap();
    history.commit();

    let before: Vec<Source> = history.live().iter().cloned().collect();
    history.undo().unwrap();
    assert_ne!(history.live().as_slice(), before.as_slice());
    history.redo().unwrap();
    assert_eq!(history.live().as_slice(), before.as_slice());
}

#[test]
fn test_fresh_history_cannot_undo_or_redo() {
    let mut history: History<Source> = History::empty("active");
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert!(matches!(history.undo(), Err(CollectionError::NoUndoableState)));
    assert!(matches!(history.redo(), Err(CollectionError::NoRedoableState)));

    history.add(source("A")).unwrap();
    history.commit();
    assert!(history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn test_commit_after_undo_discards_redo() {
    let mut history = History::empty("active");
    history.add(source("A")).unwrap();
    history.commit();
    history.undo().unwrap();
    history.add(source("B")).unwrap();
    history.commit();
    assert!(!history.can_redo());
    assert_eq!(titles(&history), ["B"]);
}

// === Pins ===

#[test]
fn test_pinned_region_is_bounded_and_at_front() {
    let names = ["A", "B", "C", "D", "E", "F", "G"];
    let mut logic = logic_with(&names);

    for _ in 0..MAX_PINNED {
        // the last source is never pinned yet
        logic.execute(&format!("pin {}", names.len())).unwrap();
    }
    let err = logic.execute(&format!("pin {}", names.len())).unwrap_err();
    assert!(matches!(
        err,
        ImsourceError::Pin(PinError::PinLimitExceeded { limit: MAX_PINNED })
    ));

    let model = logic.model();
    assert_eq!(model.pinned_count(), MAX_PINNED);
    for (index, s) in model.active().live().iter().enumerate() {
        assert_eq!(s.pinned, index < MAX_PINNED, "position {index}");
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn test_reorder_touching_pinned_region_fails(#[case] pinned: usize) {
    let mut lists = DualList::new(
        UniqueList::from_items(vec![
            source("A"),
            source("B"),
            source("C"),
            source("D"),
            source("E"),
        ])
        .unwrap(),
        UniqueList::new(),
    );
    let mut pins = PinCoordinator::new();
    for _ in 0..pinned {
        pins.pin(&mut lists, 4).unwrap();
    }
    let before = titles(lists.active());

    for inside in 0..pinned {
        for other in 0..=5 {
            for (from, to) in [(inside, other), (other, inside)] {
                let err = pins.reorder(&mut lists, from, to).unwrap_err();
                assert!(matches!(err, ImsourceError::Pin(PinError::PinnedPositionConflict)));
            }
        }
    }
    assert_eq!(titles(lists.active()), before);
}

#[test]
fn test_pin_then_move_scenario() {
    let mut logic = logic_with(&["A", "B", "C"]);

    logic.execute("pin 2").unwrap();
    assert_eq!(titles(logic.model().active()), ["B", "A", "C"]);
    assert_eq!(logic.model().pinned_count(), 1);

    logic.execute("move 2 3").unwrap();
    assert_eq!(titles(logic.model().active()), ["B", "C", "A"]);

    let err = logic.execute("move 1 2").unwrap_err();
    assert!(matches!(err, ImsourceError::Pin(PinError::PinnedPositionConflict)));
    assert_eq!(titles(logic.model().active()), ["B", "C", "A"]);
}

#[test]
fn test_undo_of_move_keeps_pin() {
    let mut logic = logic_with(&["A", "B", "C"]);
    logic.execute("pin 3").unwrap();
    logic.execute("move 2 3").unwrap();
    assert_eq!(titles(logic.model().active()), ["C", "B", "A"]);

    logic.execute("undo").unwrap();
    assert_eq!(titles(logic.model().active()), ["C", "A", "B"]);
    assert_eq!(logic.model().pinned_count(), 1);
    assert!(logic.model().active().get(0).is_some_and(|s| s.pinned));
}

#[test]
fn test_redo_after_pins_restores_pinned_region() {
    let mut logic = logic_with(&["A", "B", "C"]);
    logic.execute("add i/D y/book a/Anon").unwrap();
    logic.execute("pin 1").unwrap();
    logic.execute("pin 4").unwrap();
    assert_eq!(titles(logic.model().active()), ["D", "A", "B", "C"]);
    assert_eq!(logic.model().pinned_count(), 2);

    logic.execute("undo").unwrap();
    assert_eq!(titles(logic.model().active()), ["A", "B", "C"]);
    assert_eq!(logic.model().pinned_count(), 1);

    logic.execute("redo").unwrap();
    assert_eq!(titles(logic.model().active()), ["D", "A", "B", "C"]);
    assert_eq!(logic.model().pinned_count(), 2);
    let flags: Vec<bool> = logic.model().active().live().iter().map(|s| s.pinned).collect();
    assert_eq!(flags, [true, true, false, false]);
}

// === Aliases ===

#[test]
fn test_alias_dispatches_like_its_command() {
    let mut logic = logic_with(&["A", "B"]);
    logic.execute("alias al/c cm/count").unwrap();

    let via_alias = logic.execute("c").unwrap();
    let direct = logic.execute("count").unwrap();
    assert_eq!(via_alias, direct);
}

#[test]
fn test_aliases_survive_reload() {
    let mut logic = logic_with(&[]);
    logic.execute("alias al/ls cm/list").unwrap();

    let storage = logic.storage().clone();
    let mut reloaded = Logic::new(storage);
    assert_eq!(reloaded.model().aliases().resolve("ls"), Some("list"));
    assert!(reloaded.execute("ls").is_ok());
}

// === Recycle bin ===

#[test]
fn test_delete_with_identical_copy_in_bin_leaves_bin_alone() {
    let mut logic = Logic::new(MemoryStorage {
        active: vec![source("X"), source("Y")],
        bin: vec![source("X")],
        ..Default::default()
    });

    logic.execute("delete 1").unwrap();
    assert_eq!(titles(logic.model().active()), ["Y"]);
    assert_eq!(logic.model().bin().len(), 1);
}

#[test]
fn test_delete_then_undo_restores_both_lists() {
    let mut logic = logic_with(&["X", "Y"]);

    logic.execute("delete 1").unwrap();
    assert_eq!(titles(logic.model().active()), ["Y"]);
    assert_eq!(titles(logic.model().bin()), ["X"]);

    let result = logic.execute("undo").unwrap();
    assert_eq!(result.changed, [ListKind::Bin, ListKind::Active]);
    assert_eq!(titles(logic.model().active()), ["X", "Y"]);
    assert!(logic.model().bin().is_empty());
}

#[test]
fn test_per_collection_undo_restores_both_lists() {
    let mut active = History::new(
        "active",
        UniqueList::from_items(vec![source("X"), source("Y")]).unwrap(),
    );
    let mut bin: History<Source> = History::empty("bin");

    let x = source("X");
    bin.add(x.clone()).unwrap();
    bin.commit();
    active.remove(&x).unwrap();
    active.commit();

    active.undo().unwrap();
    bin.undo().unwrap();
    assert_eq!(titles(&active), ["X", "Y"]);
    assert!(bin.is_empty());
}

#[test]
fn test_bin_mode_round_trip() {
    let mut logic = logic_with(&["X", "Y"]);
    logic.execute("delete 2").unwrap();
    logic.execute("bin").unwrap();

    // active-only commands are unavailable while viewing the bin
    assert!(logic.execute("pin 1").is_err());

    logic.execute("restore 1").unwrap();
    assert!(logic.model().bin().is_empty());
    logic.execute("back").unwrap();
    assert_eq!(titles(logic.model().active()), ["X", "Y"]);
}
