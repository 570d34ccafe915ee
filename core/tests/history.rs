//! Undo/redo history tests — bounded snapshots, branch truncation,
//! restoration fidelity.

use endaxis_core::config::{GameData, SkillCategory};
use endaxis_core::engine::PlanEngine;
use endaxis_core::history::MAX_HISTORY;
use endaxis_core::ids::SequentialIds;
use endaxis_core::skill::SkillTemplate;

fn engine() -> PlanEngine {
    PlanEngine::new(GameData::default_test(), Box::new(SequentialIds::default()))
}

fn attack() -> SkillTemplate {
    SkillTemplate {
        global_id: "test_attack".into(),
        name: "Heavy Attack".into(),
        category: SkillCategory::Attack,
        element: Some("physical".into()),
        duration: 1.0,
        cooldown: 0.0,
        sp_cost: 0.0,
        sp_gain: 10.0,
        gauge_cost: 0.0,
        gauge_gain: 0.0,
        team_gauge_gain: 0.0,
        stagger: 0.0,
        damage_ticks: Vec::new(),
        anomalies: Vec::new(),
    }
}

/// Undo restores the exact pre-command state, byte for byte.
#[test]
fn undo_restores_identical_snapshot() {
    let mut engine = engine();
    engine.add_action(0, &attack(), 1.0);
    let before = serde_json::to_string(engine.state()).expect("serialize");

    engine.add_action(0, &attack(), 5.0);
    assert_ne!(
        before,
        serde_json::to_string(engine.state()).expect("serialize"),
        "second placement should change the state"
    );

    assert!(engine.undo(), "undo should succeed");
    let after = serde_json::to_string(engine.state()).expect("serialize");
    assert_eq!(before, after, "undone state must match the snapshot exactly");
}

/// Redo re-applies the undone command exactly.
#[test]
fn redo_reapplies_undone_command() {
    let mut engine = engine();
    engine.add_action(0, &attack(), 1.0);
    engine.add_action(0, &attack(), 5.0);
    let latest = serde_json::to_string(engine.state()).expect("serialize");

    assert!(engine.undo());
    assert!(engine.redo(), "redo should succeed after undo");
    assert_eq!(
        latest,
        serde_json::to_string(engine.state()).expect("serialize")
    );
}

/// A fresh engine has exactly one baseline snapshot and nothing to undo.
#[test]
fn fresh_engine_has_single_baseline() {
    let mut engine = engine();
    assert_eq!(engine.history_len(), 1);
    assert_eq!(engine.history_index(), 0);
    assert!(!engine.undo(), "nothing to undo at the baseline");
    assert!(!engine.redo(), "nothing to redo at the baseline");
}

/// History never holds more than MAX_HISTORY snapshots; the oldest is
/// evicted and the undo chain stays consistent.
#[test]
fn history_is_bounded_and_evicts_oldest() {
    let mut engine = engine();
    for i in 0..(MAX_HISTORY + 20) {
        engine.add_action(0, &attack(), i as f64 * 0.5);
    }
    assert_eq!(engine.history_len(), MAX_HISTORY);

    let mut undone = 0;
    while engine.undo() {
        undone += 1;
    }
    assert_eq!(
        undone,
        MAX_HISTORY - 1,
        "undo depth must be the bound minus the current snapshot"
    );
    // The oldest retained snapshot is not the empty plan any more.
    let actions: usize = engine.state().tracks.iter().map(|t| t.actions.len()).sum();
    assert!(actions > 0, "baseline was evicted, oldest snapshot is non-empty");
}

/// Committing after undo discards the redo branch.
#[test]
fn commit_truncates_redo_branch() {
    let mut engine = engine();
    engine.add_action(0, &attack(), 1.0);
    engine.add_action(0, &attack(), 5.0);
    engine.undo();

    // New command from the past: the 5.0 placement is gone for good.
    engine.add_action(0, &attack(), 9.0);
    assert!(!engine.redo(), "redo branch must be discarded by a new commit");
    let starts: Vec<f64> = engine.state().tracks[0]
        .actions
        .iter()
        .map(|a| a.start_time)
        .collect();
    assert_eq!(starts, vec![1.0, 9.0]);
}

/// Undo clears selection; stale ids must never survive a state swap.
#[test]
fn undo_clears_selection() {
    let mut engine = engine();
    let id = engine.add_action(0, &attack(), 1.0).expect("placed");
    engine.add_action(0, &attack(), 5.0);
    engine.select_action(&id);
    assert!(engine.selection().contains(&id));

    engine.undo();
    assert!(
        engine.selection().instance_set().is_empty(),
        "selection must be cleared on undo"
    );
}
