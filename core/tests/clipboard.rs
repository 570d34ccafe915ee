//! Copy/paste tests — identity remapping, relative offsets, anchor
//! preservation.

use endaxis_core::config::{EffectCellSpec, GameData, SkillCategory};
use endaxis_core::engine::PlanEngine;
use endaxis_core::ids::SequentialIds;
use endaxis_core::linking::CellAnchor;
use endaxis_core::skill::SkillTemplate;

fn engine() -> PlanEngine {
    PlanEngine::new(GameData::default_test(), Box::new(SequentialIds::default()))
}

fn plain() -> SkillTemplate {
    SkillTemplate {
        global_id: "test_copy".into(),
        name: "Copy Test".into(),
        category: SkillCategory::Attack,
        element: Some("physical".into()),
        duration: 1.0,
        cooldown: 0.0,
        sp_cost: 0.0,
        sp_gain: 0.0,
        gauge_cost: 0.0,
        gauge_gain: 0.0,
        team_gauge_gain: 0.0,
        stagger: 0.0,
        damage_ticks: Vec::new(),
        anomalies: Vec::new(),
    }
}

fn with_cell() -> SkillTemplate {
    SkillTemplate {
        anomalies: vec![vec![EffectCellSpec {
            offset: 0.5,
            kind: "cold_attach".into(),
            stagger: 0.0,
        }]],
        ..plain()
    }
}

/// Without a cursor, paste lands two seconds after the originals.
#[test]
fn paste_without_cursor_offsets_by_two() {
    let mut engine = engine();
    let a = engine.add_action(0, &plain(), 3.0).expect("placed");
    engine.select_action(&a);
    engine.copy_selection();
    engine.paste_selection();

    let starts: Vec<f64> = engine.state().tracks[0]
        .actions
        .iter()
        .map(|s| s.start_time)
        .collect();
    assert_eq!(starts, vec![3.0, 5.0]);
}

/// Pasting at the cursor anchors the earliest copied action there and
/// preserves relative offsets and track assignment.
#[test]
fn paste_at_cursor_preserves_relative_layout() {
    let mut engine = engine();
    let a = engine.add_action(0, &plain(), 3.0).expect("placed");
    let b = engine.add_action(1, &plain(), 5.0).expect("placed");
    engine.set_multi_selection(vec![a, b]);
    engine.copy_selection();
    engine.set_cursor_time(10.0);
    engine.paste_selection();

    let track0: Vec<f64> = engine.state().tracks[0].actions.iter().map(|s| s.start_time).collect();
    let track1: Vec<f64> = engine.state().tracks[1].actions.iter().map(|s| s.start_time).collect();
    assert_eq!(track0, vec![3.0, 10.0]);
    assert_eq!(track1, vec![5.0, 12.0]);
}

/// Pasted copies get fresh instance ids and become the new selection;
/// the originals are untouched.
#[test]
fn paste_mints_fresh_ids_and_selects_them() {
    let mut engine = engine();
    let a = engine.add_action(0, &plain(), 3.0).expect("placed");
    engine.select_action(&a);
    engine.copy_selection();
    engine.paste_selection();

    let ids: Vec<&str> = engine.state().tracks[0]
        .actions
        .iter()
        .map(|s| s.instance_id.as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1], "pasted copy must have a fresh id");
    let new_id = ids[1].to_string();
    assert!(
        engine.selection().contains(&new_id),
        "selection moves to the pasted copies"
    );
    assert!(!engine.selection().contains(&a), "original is deselected");
}

/// Connections internal to the copied set are recreated between the new
/// ids; effect anchors are remapped to the fresh cell ids.
#[test]
fn paste_remaps_connections_and_effect_anchors() {
    let mut engine = engine();
    let a = engine.add_action(0, &with_cell(), 3.0).expect("placed");
    let b = engine.add_action(1, &plain(), 5.0).expect("placed");

    engine.select_action(&a);
    engine.start_linking(Some(CellAnchor { row: 0, col: 0 }));
    engine.confirm_linking(&b, None).expect("edge created");
    let old_effect = engine
        .state()
        .find_action(&a)
        .and_then(|(_, action)| action.effect_cell(0, 0).and_then(|c| c.effect_id.clone()))
        .expect("effect id assigned");

    engine.set_multi_selection(vec![a.clone(), b.clone()]);
    engine.copy_selection();
    engine.paste_selection();

    assert_eq!(engine.state().connections.len(), 2, "edge is duplicated");
    let new_edge = engine
        .state()
        .connections
        .iter()
        .find(|c| c.from != a)
        .expect("remapped edge");
    assert_ne!(new_edge.from, a);
    assert_ne!(new_edge.to, b);
    let new_effect = new_edge.from_effect.clone().expect("anchor preserved");
    assert_ne!(new_effect, old_effect, "effect anchor remaps to a fresh id");

    let (_, pasted) = engine
        .state()
        .find_action(&new_edge.from)
        .expect("pasted source found");
    assert_eq!(
        pasted.effect_cell(0, 0).and_then(|c| c.effect_id.clone()),
        Some(new_effect),
        "the fresh anchor id lives on the pasted cell"
    );
}

/// Connections with an endpoint outside the copied set are not captured,
/// so pasting never creates dangling edges.
#[test]
fn paste_never_creates_dangling_edges() {
    let mut engine = engine();
    let a = engine.add_action(0, &plain(), 3.0).expect("placed");
    let b = engine.add_action(1, &plain(), 5.0).expect("placed");
    engine.select_action(&a);
    engine.start_linking(None);
    engine.confirm_linking(&b, None).expect("edge created");

    // Copy only one endpoint.
    engine.clear_selection();
    engine.select_action(&a);
    engine.copy_selection();
    engine.paste_selection();

    assert_eq!(engine.state().connections.len(), 1, "no edge for the copy");
    assert_eq!(engine.state().tracks[0].actions.len(), 2);
}

/// Paste clamps to the timeline origin when the cursor would push a
/// copy negative.
#[test]
fn paste_clamps_at_origin() {
    let mut engine = engine();
    let a = engine.add_action(0, &plain(), 3.0).expect("placed");
    let b = engine.add_action(1, &plain(), 6.0).expect("placed");
    engine.set_multi_selection(vec![a, b]);
    engine.copy_selection();
    engine.set_cursor_time(0.0);
    engine.paste_selection();

    let track0: Vec<f64> = engine.state().tracks[0].actions.iter().map(|s| s.start_time).collect();
    let track1: Vec<f64> = engine.state().tracks[1].actions.iter().map(|s| s.start_time).collect();
    assert_eq!(track0, vec![0.0, 3.0], "anchor lands on the cursor");
    assert_eq!(track1, vec![3.0, 6.0]);
}

/// Copying nothing leaves the clipboard empty; pasting then is a no-op.
#[test]
fn empty_copy_is_a_noop() {
    let mut engine = engine();
    engine.copy_selection();
    let before = engine.history_len();
    engine.paste_selection();
    assert_eq!(engine.history_len(), before);
    let actions: usize = engine.state().tracks.iter().map(|t| t.actions.len()).sum();
    assert_eq!(actions, 0);
}
