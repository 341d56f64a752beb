//! Notes: canonical addressing, dual mirroring and pruning.

use vartab_tests::prelude::*;

const PHASE: &str = "outcome";

fn rock_paper() -> NoteKey {
    NoteKey::self_pair(EntityId::new(1), "", EntityId::new(2), "").with_phase(PHASE)
}

mod dual_outcomes {
    use super::*;

    pub fn scenario() -> Scenario {
        let key = rock_paper();
        let mirror = key.mirrored().unwrap_or_else(|| key.clone());
        let (set_key, clear_key) = (key.clone(), key.clone());
        let annotate_key = mirror.clone();

        Scenario::new("dual_outcomes")
            .seed(
                DocumentBuilder::new()
                    .entity(1, "Rock")
                    .entity(2, "Paper")
                    .mode(TableMode::SelfPairs)
                    .dual("win", "lose"),
            )
            .step(
                "rock_loses",
                move |b| b.set_note(&set_key, Note::outcome("lose")).map(drop),
                |a| {
                    a.notes(2)
                        .note_outcome(&key, "lose")
                        .note_outcome(&mirror, "win")
                        .undo_depth(1)
                },
            )
            .step(
                "annotate_mirror",
                move |b| {
                    let note = Note {
                        outcome: Some("win".to_string()),
                        text: "paper covers rock".to_string(),
                    };
                    b.set_note(&annotate_key, note).map(drop)
                },
                |a| {
                    a.notes(2)
                        .note_text(&mirror, "paper covers rock")
                        .note_outcome(&key, "lose")
                },
            )
            .step(
                "clear_rock",
                move |b| b.clear_note(&clear_key).map(drop),
                // the mirror keeps its text, loses its outcome
                |a| a.notes(1).no_note(&key).note_text(&mirror, "paper covers rock"),
            )
            .step(
                "undo_clear",
                |b| {
                    b.undo();
                    Ok(())
                },
                |a| {
                    a.notes(2)
                        .note_outcome(&key, "lose")
                        .note_outcome(&mirror, "win")
                        .status("Undo: Clear note")
                },
            )
    }

    #[test]
    fn test_dual_outcomes_stay_in_sync() {
        scenario().run().unwrap();
    }
}

#[test]
fn test_note_survives_catalog_reorder() {
    // GIVEN a note on a two-modifier variant
    let seed = DocumentBuilder::new()
        .modifiers(&["heavy", "quick"])
        .entity_with(
            1,
            "Strike",
            &[(1, ModifierState::Requires), (2, ModifierState::Requires)],
        )
        .events(&["hit"]);
    let mut bench = Workbench::from_document(
        seed.build(),
        EngineConfig::default(),
        RecordingPresenter::new(),
    );
    let key = bench.document().pairs[0].key.clone();
    assert_eq!(bench.document().pairs[0].left.signature, "1+2");
    bench.set_note(&key, Note::text("kept")).unwrap();

    // WHEN the catalog is reordered
    bench
        .reorder_catalog(&[ModifierId::new(2), ModifierId::new(1)])
        .unwrap();

    // THEN the display signature follows the catalog, the note follows the pair
    let row = &bench.document().pairs[0];
    assert_eq!(row.left.signature, "2+1");
    assert_eq!(row.key, key);
    assert_eq!(bench.note(&row.key).map(|n| n.text.as_str()), Some("kept"));
}

#[test]
fn test_structural_edit_prunes_orphans() {
    // GIVEN notes on two events
    let mut bench = Workbench::from_document(
        DocumentBuilder::new().entities(1).events(&["hit", "miss"]).build(),
        EngineConfig::default(),
        RecordingPresenter::new(),
    );
    let hit = NoteKey::cross(EntityId::new(1), "", EventId::new(1));
    let miss = NoteKey::cross(EntityId::new(1), "", EventId::new(2));
    bench.set_note(&hit, Note::text("ok")).unwrap();
    bench
        .set_note(&miss.with_phase("draft"), Note::text("gone"))
        .unwrap();

    // WHEN
    bench.remove_event(EventId::new(2)).unwrap();

    // THEN
    assert_eq!(bench.document().notes.len(), 1);
    assert!(bench.note(&hit).is_some());

    // AND undo brings the orphan back with its pair
    assert!(bench.undo());
    assert_eq!(bench.document().notes.len(), 2);
    assert!(bench.note(&miss.with_phase("draft")).is_some());
}

#[test]
fn test_notes_follow_variants_not_rows() {
    // GIVEN a note on the {a} variant
    let mut bench = Workbench::from_document(
        DocumentBuilder::new()
            .modifiers(&["a", "b"])
            .entity_with(1, "Strike", &[(1, ModifierState::On), (2, ModifierState::On)])
            .events(&["hit"])
            .build(),
        EngineConfig::default(),
        RecordingPresenter::new(),
    );
    let key = NoteKey::cross(EntityId::new(1), "1", EventId::new(1));
    bench.set_note(&key, Note::text("a only")).unwrap();
    let row_before = bench.document().pair_index[&key];

    // WHEN a rule removes earlier rows
    bench
        .add_constraint(ModifierConstraint::forbids(ModifierId::new(1), ModifierId::new(2)))
        .unwrap();
    bench
        .set_modifier_state(EntityId::new(1), ModifierId::new(2), ModifierState::Bypass)
        .unwrap();

    // THEN the note is still addressed by the same key, on a new row
    let row_after = bench.document().pair_index[&key];
    assert_ne!(row_before, row_after);
    assert_eq!(bench.note(&key).map(|n| n.text.as_str()), Some("a only"));
}

#[test]
fn test_prune_is_explicit_too() {
    let (mut doc, _) = DocumentBuilder::new()
        .entities(1)
        .events(&["hit"])
        .built(&EngineConfig::default());
    doc.notes.insert(
        NoteKey::cross(EntityId::new(7), "", EventId::new(1)),
        Note::text("orphan"),
    );

    assert_eq!(prune_notes(&mut doc), 1);
    assert_eq!(prune_notes(&mut doc), 0);
}
