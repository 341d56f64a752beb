//! Composite edits through workbench transactions.

use vartab_tests::prelude::*;

fn bench() -> Bench {
    Workbench::from_document(
        DocumentBuilder::new()
            .modifiers(&["heavy", "quick"])
            .entities(2)
            .events(&["hit"])
            .build(),
        EngineConfig::default(),
        RecordingPresenter::new(),
    )
}

fn add_event(tx: &mut WorkbenchTransaction<'_>, name: &str) -> SessionResult<EventId> {
    tx.run_mutation("Add event", MutationOptions::structural(), |doc| {
        let id = doc.next_event_id();
        doc.add_event(Event::new(id, name))?;
        Ok(id)
    })
}

#[test]
fn test_transaction_flushes_once() {
    // GIVEN
    let mut bench = bench();
    bench.presenter_mut().clear();

    // WHEN three edits run in one transaction
    bench
        .transaction("Add events", |tx| {
            add_event(tx, "miss")?;
            add_event(tx, "parry")?;
            tx.run_mutation("Enable heavy", MutationOptions::structural(), |doc| {
                Ok::<_, SessionError>(doc.set_modifier_state(
                    EntityId::new(1),
                    ModifierId::new(1),
                    ModifierState::On,
                )?)
            })
        })
        .unwrap();

    // THEN one render, one entry, and the table reflects all three edits
    assert_eq!(bench.presenter().render_count(), 1);
    assert_eq!(bench.presenter().statuses(), vec!["Add events"]);
    assert_eq!(bench.undo_state().undo_depth, 1);
    assert_eq!(bench.document().pairs.len(), 9);

    // AND one undo reverts all of it
    assert!(bench.undo());
    assert_eq!(bench.document().pairs.len(), 2);
}

#[test]
fn test_failed_nested_transaction_restores_entry_state() {
    // GIVEN
    let mut bench = bench();

    // WHEN a nested boundary fails and the outer one recovers
    bench
        .transaction("Edit events", |tx| {
            add_event(tx, "miss")?;
            let at_entry = tx.doc().clone();

            let nested: SessionResult<()> =
                tx.run_transaction("Bad batch", MutationOptions::structural(), |inner| {
                    add_event(inner, "parry")?;
                    inner.run_mutation("Unknown entity", MutationOptions::structural(), |doc| {
                        Ok::<_, SessionError>(doc.set_modifier_state(
                            EntityId::new(9),
                            ModifierId::new(1),
                            ModifierState::On,
                        )?)
                    })
                });

            // THEN the nested edits are gone
            assert!(nested.is_err());
            assert_eq!(tx.doc(), &at_entry);
            Ok(())
        })
        .unwrap();

    // AND only the outer edit is recorded
    assert_eq!(bench.document().events.len(), 2);
    assert_eq!(bench.undo_state().undo_depth, 1);
}

#[test]
fn test_failed_transaction_leaves_no_trace() {
    // GIVEN
    let mut bench = bench();
    let before = bench.document().clone();
    let epoch = bench.render_epoch();

    // WHEN
    let result: SessionResult<()> = bench.transaction("Broken", |tx| {
        add_event(tx, "miss")?;
        tx.run_mutation("Unknown event", MutationOptions::structural(), |doc| {
            doc.remove_event(EventId::new(42))?;
            Ok::<_, SessionError>(())
        })
    });

    // THEN
    assert!(result.is_err());
    assert_eq!(bench.document(), &before);
    assert_eq!(bench.render_epoch(), epoch);
    assert!(!bench.undo_state().can_undo);
}

#[test]
fn test_transaction_value_is_returned() {
    let mut bench = bench();

    let ids = bench
        .transaction("Add events", |tx| {
            Ok(vec![add_event(tx, "miss")?, add_event(tx, "parry")?])
        })
        .unwrap();

    assert_eq!(ids, vec![EventId::new(2), EventId::new(3)]);
    assert_eq!(bench.undo_state().undo_label.as_deref(), Some("Add events"));
}

#[test]
fn test_nested_effects_merge_into_boundary() {
    let mut bench = bench();

    bench
        .transaction("Annotate", |tx| {
            tx.run_mutation(
                "Touch",
                MutationOptions::new().render(true),
                |_| Ok::<_, SessionError>(()),
            )?;
            let pending = tx.pending();
            assert!(pending.render);
            assert!(!pending.layout);
            assert_eq!(tx.depth(), 1);
            Ok(())
        })
        .unwrap();
}
