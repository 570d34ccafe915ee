//! Linking tests — session lifecycle, lazy effect ids, deduplication.

use endaxis_core::config::{EffectCellSpec, GameData, SkillCategory};
use endaxis_core::engine::PlanEngine;
use endaxis_core::ids::SequentialIds;
use endaxis_core::linking::CellAnchor;
use endaxis_core::skill::SkillTemplate;

fn engine() -> PlanEngine {
    PlanEngine::new(GameData::default_test(), Box::new(SequentialIds::default()))
}

fn with_cells() -> SkillTemplate {
    SkillTemplate {
        global_id: "test_cells".into(),
        name: "Anomaly Skill".into(),
        category: SkillCategory::Skill,
        element: Some("cold".into()),
        duration: 2.0,
        cooldown: 0.0,
        sp_cost: 0.0,
        sp_gain: 0.0,
        gauge_cost: 0.0,
        gauge_gain: 0.0,
        team_gauge_gain: 0.0,
        stagger: 0.0,
        damage_ticks: Vec::new(),
        anomalies: vec![vec![
            EffectCellSpec {
                offset: 0.5,
                kind: "cold_attach".into(),
                stagger: 0.0,
            },
            EffectCellSpec {
                offset: 1.5,
                kind: "cold_burst".into(),
                stagger: 0.0,
            },
        ]],
    }
}

fn plain() -> SkillTemplate {
    SkillTemplate {
        anomalies: Vec::new(),
        ..with_cells()
    }
}

/// Placement never assigns effect ids; they appear on first link
/// reference and never change afterwards.
#[test]
fn effect_ids_are_assigned_lazily_and_stick() {
    let mut engine = engine();
    let a = engine.add_action(0, &with_cells(), 1.0).expect("placed");
    let b = engine.add_action(1, &plain(), 5.0).expect("placed");

    let (_, action) = engine.state().find_action(&a).expect("found");
    assert!(
        action.assigned_effect_ids().is_empty(),
        "placement must not assign effect ids"
    );

    engine.select_action(&a);
    engine.start_linking(Some(CellAnchor { row: 0, col: 0 }));
    engine.confirm_linking(&b, None).expect("edge created");

    let (_, action) = engine.state().find_action(&a).expect("found");
    let first = action.effect_cell(0, 0).and_then(|c| c.effect_id.clone());
    assert!(first.is_some(), "first reference assigns an id");
    assert!(
        action.effect_cell(0, 1).expect("cell").effect_id.is_none(),
        "unreferenced cells stay unassigned"
    );

    // Second edge from the same cell reuses the id.
    engine.clear_selection();
    engine.select_action(&a);
    engine.start_linking(Some(CellAnchor { row: 0, col: 0 }));
    let c = engine.add_action(2, &plain(), 9.0).expect("placed");
    engine.confirm_linking(&c, None).expect("edge created");

    let (_, action) = engine.state().find_action(&a).expect("found");
    assert_eq!(
        action.effect_cell(0, 0).and_then(|c| c.effect_id.clone()),
        first,
        "an assigned effect id is immutable"
    );
}

/// Duplicate edges (same endpoints, same anchors) are rejected without
/// a commit.
#[test]
fn duplicate_edges_are_rejected() {
    let mut engine = engine();
    let a = engine.add_action(0, &plain(), 1.0).expect("placed");
    let b = engine.add_action(1, &plain(), 5.0).expect("placed");

    engine.select_action(&a);
    engine.start_linking(None);
    assert!(engine.confirm_linking(&b, None).is_some());
    let history = engine.history_len();

    engine.clear_selection();
    engine.select_action(&a);
    engine.start_linking(None);
    assert!(
        engine.confirm_linking(&b, None).is_none(),
        "identical edge must be rejected"
    );
    assert_eq!(engine.state().connections.len(), 1);
    assert_eq!(engine.history_len(), history, "no commit for a rejected edge");
}

/// Anchoring distinguishes edges: instance-level and cell-level edges
/// between the same pair coexist.
#[test]
fn different_anchors_are_different_edges() {
    let mut engine = engine();
    let a = engine.add_action(0, &with_cells(), 1.0).expect("placed");
    let b = engine.add_action(1, &plain(), 5.0).expect("placed");

    engine.select_action(&a);
    engine.start_linking(None);
    assert!(engine.confirm_linking(&b, None).is_some());

    engine.clear_selection();
    engine.select_action(&a);
    engine.start_linking(Some(CellAnchor { row: 0, col: 1 }));
    assert!(engine.confirm_linking(&b, None).is_some());

    assert_eq!(engine.state().connections.len(), 2);
    assert_eq!(
        engine.state().incoming_connections(&b).len(),
        2,
        "both edges point at the target"
    );
}

/// A self-link at the same granularity is rejected, but an instance may
/// link to one of its own effect cells.
#[test]
fn self_link_rules() {
    let mut engine = engine();
    let a = engine.add_action(0, &with_cells(), 1.0).expect("placed");

    engine.select_action(&a);
    engine.start_linking(None);
    assert!(
        engine.confirm_linking(&a, None).is_none(),
        "instance-to-itself is never an edge"
    );

    engine.clear_selection();
    engine.select_action(&a);
    engine.start_linking(None);
    assert!(
        engine
            .confirm_linking(&a, Some(CellAnchor { row: 0, col: 0 }))
            .is_some(),
        "instance-to-own-cell is a valid edge"
    );
}

/// Starting a session again on the same source and anchor cancels it.
#[test]
fn restart_toggles_session_off() {
    let mut engine = engine();
    let a = engine.add_action(0, &plain(), 1.0).expect("placed");

    engine.select_action(&a);
    engine.start_linking(None);
    assert!(engine.linking_session().is_active());

    engine.start_linking(None);
    assert!(
        !engine.linking_session().is_active(),
        "same source and anchor toggles the session off"
    );
}

/// Confirming against a vanished endpoint cancels the session quietly.
#[test]
fn confirm_against_missing_target_is_a_noop() {
    let mut engine = engine();
    let a = engine.add_action(0, &plain(), 1.0).expect("placed");
    engine.select_action(&a);
    engine.start_linking(None);

    assert!(engine.confirm_linking("inst_missing", None).is_none());
    assert!(engine.state().connections.is_empty());
    assert!(!engine.linking_session().is_active());
}
