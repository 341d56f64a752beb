//! Undo/redo history over workbench edits.

use proptest::prelude::*;
use vartab_tests::prelude::*;

fn bench(config: EngineConfig) -> Bench {
    Workbench::from_document(
        DocumentBuilder::new()
            .modifiers(&["heavy", "quick"])
            .entities(1)
            .events(&["hit"])
            .build(),
        config,
        RecordingPresenter::new(),
    )
}

/// Apply five edits, returning the document after each (index 0 is the start).
fn five_edits(bench: &mut Bench) -> Vec<Document> {
    let mut states = vec![bench.document().clone()];
    bench.add_event("miss").unwrap();
    states.push(bench.document().clone());
    bench
        .set_modifier_state(EntityId::new(1), ModifierId::new(1), ModifierState::On)
        .unwrap();
    states.push(bench.document().clone());
    bench.add_entity("Block").unwrap();
    states.push(bench.document().clone());
    bench
        .add_constraint(ModifierConstraint::requires(ModifierId::new(2), ModifierId::new(1)))
        .unwrap();
    states.push(bench.document().clone());
    bench.set_mode(TableMode::SelfPairs).unwrap();
    states.push(bench.document().clone());
    states
}

#[test]
fn test_undo_all_restores_start() {
    // GIVEN
    let mut bench = bench(EngineConfig::default());
    let states = five_edits(&mut bench);

    // WHEN
    for _ in 0..5 {
        assert!(bench.undo());
    }

    // THEN
    assert_eq!(bench.document(), &states[0]);
    assert!(!bench.undo());
}

#[test]
fn test_undo_then_redo_lands_on_intermediate_state() {
    for k in 1..=5 {
        for m in 0..=k {
            // GIVEN
            let mut bench = bench(EngineConfig::default());
            let states = five_edits(&mut bench);

            // WHEN k undos then m redos
            for _ in 0..k {
                assert!(bench.undo());
            }
            for _ in 0..m {
                assert!(bench.redo());
            }

            // THEN
            assert_eq!(bench.document(), &states[5 - k + m], "k={} m={}", k, m);
            let state = bench.undo_state();
            assert_eq!(state.undo_depth, 5 - k + m);
            assert_eq!(state.redo_depth, k - m);
        }
    }
}

#[test]
fn test_clear_history_leaves_document() {
    // GIVEN an undone edit, so both stacks are non-empty
    let mut bench = bench(EngineConfig::default());
    five_edits(&mut bench);
    assert!(bench.undo());
    let before = bench.document().clone();

    // WHEN
    bench.clear_history();

    // THEN
    assert!(!bench.undo());
    assert!(!bench.redo());
    assert_eq!(bench.document(), &before);
    assert!(!bench.undo_state().can_undo);
}

#[test]
fn test_new_edit_discards_redo() {
    let mut bench = bench(EngineConfig::default());
    five_edits(&mut bench);
    assert!(bench.undo());
    assert!(bench.undo());

    bench.add_event("parry").unwrap();

    let state = bench.undo_state();
    assert_eq!(state.redo_depth, 0);
    assert_eq!(state.undo_depth, 4);
    assert_eq!(state.undo_label.as_deref(), Some("Add event"));
    assert!(!bench.redo());
}

#[test]
fn test_history_limit_trims_oldest() {
    // GIVEN room for two entries
    let mut bench = bench(EngineConfig::default().with_history_limit(2));
    let states = five_edits(&mut bench);

    // THEN only the last two edits can be undone
    assert_eq!(bench.undo_state().undo_depth, 2);
    assert!(bench.undo());
    assert!(bench.undo());
    assert!(!bench.undo());
    assert_eq!(bench.document(), &states[3]);
}

#[test]
fn test_render_epoch_increases_with_every_flush() {
    let mut bench = bench(EngineConfig::default());
    let mut last = bench.render_epoch();

    for step in 0..4 {
        match step {
            0 => {
                bench.add_event("miss").unwrap();
            }
            1 => assert!(bench.undo()),
            2 => assert!(bench.redo()),
            _ => {
                bench.rebuild();
            }
        }
        let epoch = bench.render_epoch();
        assert!(epoch > last, "step {} did not render", step);
        last = epoch;
    }
    assert_eq!(bench.presenter().render_count(), 4);
}

#[test]
fn test_undo_status_names_the_edit() {
    let mut bench = bench(EngineConfig::default());
    bench.add_entity("Block").unwrap();

    assert!(bench.undo());
    assert_eq!(bench.last_status(), Some("Undo: Add entity"));
    assert!(bench.redo());
    assert_eq!(bench.last_status(), Some("Redo: Add entity"));
}

#[derive(Debug, Clone)]
enum Edit {
    AddModifier,
    AddEntity,
    AddEvent,
    RemoveEvent(u64),
    SetState(u64, u64, ModifierState),
    Mutex(u64, u64),
    ToggleMode,
}

fn edit() -> impl Strategy<Value = Edit> {
    let state = prop_oneof![
        Just(ModifierState::Off),
        Just(ModifierState::On),
        Just(ModifierState::Requires),
        Just(ModifierState::Bypass),
    ];
    prop_oneof![
        Just(Edit::AddModifier),
        Just(Edit::AddEntity),
        Just(Edit::AddEvent),
        (1u64..4).prop_map(Edit::RemoveEvent),
        (1u64..4, 1u64..5, state).prop_map(|(e, m, s)| Edit::SetState(e, m, s)),
        (1u64..5, 1u64..5).prop_map(|(a, b)| Edit::Mutex(a, b)),
        Just(Edit::ToggleMode),
    ]
}

fn apply(bench: &mut Bench, edit: &Edit) {
    // unknown ids fail and leave no history; that is part of what is tested
    let _ = match edit {
        Edit::AddModifier => bench.add_modifier("m").map(drop),
        Edit::AddEntity => bench.add_entity("e").map(drop),
        Edit::AddEvent => bench.add_event("v").map(drop),
        Edit::RemoveEvent(id) => bench.remove_event(EventId::new(*id)).map(drop),
        Edit::SetState(e, m, s) => {
            bench.set_modifier_state(EntityId::new(*e), ModifierId::new(*m), *s)
        }
        Edit::Mutex(a, b) => bench
            .add_constraint(ModifierConstraint::mutex([ModifierId::new(*a), ModifierId::new(*b)]))
            .map(drop),
        Edit::ToggleMode => {
            let mode = match bench.document().mode {
                TableMode::Cross => TableMode::SelfPairs,
                TableMode::SelfPairs => TableMode::Cross,
            };
            bench.set_mode(mode)
        }
    };
}

proptest! {
    #[test]
    fn prop_undo_everything_restores_start(edits in prop::collection::vec(edit(), 0..12)) {
        let mut bench = bench(EngineConfig::default());
        let start = bench.document().clone();

        for edit in &edits {
            apply(&mut bench, edit);
        }
        let end = bench.document().clone();
        let depth = bench.undo_state().undo_depth;

        let mut undone = 0;
        while bench.undo() {
            undone += 1;
        }
        prop_assert_eq!(undone, depth);
        prop_assert_eq!(bench.document(), &start);

        while bench.redo() {}
        prop_assert_eq!(bench.document(), &end);
    }
}
