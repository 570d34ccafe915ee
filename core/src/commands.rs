//! Entity store CRUD commands.
//!
//! RULES:
//!   - Every command that changes persisted state ends with exactly one
//!     history commit.
//!   - Commands that find no matching entity are silent no-ops (expected
//!     under concurrent UI edits), never errors.
//!   - Policy rejections (operator already assigned) abort with an error
//!     and leave state untouched.

use crate::engine::PlanEngine;
use crate::error::{PlanError, PlanResult};
use crate::skill::SkillTemplate;
use crate::state::{ActionPatch, OverridePatch};
use crate::types::{InstanceId, OperatorId, SkillGlobalId, Time};
use std::collections::BTreeSet;

/// Gap kept between cause and effect by the before/after align modes.
pub const TRIGGER_WINDOW: Time = 0.1;

/// Relative placement modes for `align_action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignMode {
    /// End exactly at the target's start, minus the trigger window.
    Before,
    /// Start at the target's end, plus the trigger window.
    After,
    AlignStart,
    AlignEnd,
}

fn round_tenth(t: Time) -> Time {
    (t * 10.0).round() / 10.0
}

impl PlanEngine {
    /// Place a template on a track. Returns the new instance id, or None
    /// when the track does not exist.
    pub fn add_action(
        &mut self,
        track_index: usize,
        template: &SkillTemplate,
        start_time: Time,
    ) -> Option<InstanceId> {
        if track_index >= self.state.tracks.len() {
            return None;
        }
        let instance_id = self.ids.instance_id();
        let action = template.instantiate(instance_id.clone(), start_time);
        let track = &mut self.state.tracks[track_index];
        track.actions.push(action);
        track.sort_actions();
        self.commit();
        Some(instance_id)
    }

    /// Remove one instance, cascading every connection anchored to it.
    pub fn remove_action(&mut self, instance_id: &str) {
        let Some(track_index) = self.state.track_index_of(instance_id) else {
            return;
        };
        self.state.tracks[track_index]
            .actions
            .retain(|a| a.instance_id != instance_id);

        let mut ids = BTreeSet::new();
        ids.insert(instance_id.to_string());
        let dropped = self.state.remove_connections_for_instances(&ids);
        if dropped > 0 {
            log::debug!("removed {dropped} connection(s) cascaded from {instance_id}");
        }

        if self.selection.primary.as_deref() == Some(instance_id) {
            self.selection.primary = None;
        }
        self.selection.multi.remove(instance_id);
        self.commit();
    }

    /// Bulk-remove the current selection. Returns (actions, connections)
    /// removed. Selecting a connection removes just that edge.
    pub fn remove_selection(&mut self) -> (usize, usize) {
        if let Some(conn_id) = self.selection.connection.clone() {
            let before = self.state.connections.len();
            self.state.connections.retain(|c| c.id != conn_id);
            let removed = before - self.state.connections.len();
            self.selection.clear();
            if removed > 0 {
                self.commit();
            }
            return (0, removed);
        }

        let targets = self.selection.instance_set();
        if targets.is_empty() {
            return (0, 0);
        }

        let mut actions_removed = 0;
        for track in &mut self.state.tracks {
            let before = track.actions.len();
            track.actions.retain(|a| !targets.contains(&a.instance_id));
            actions_removed += before - track.actions.len();
        }
        let connections_removed = self.state.remove_connections_for_instances(&targets);
        self.selection.clear();

        if actions_removed > 0 || connections_removed > 0 {
            self.commit();
        }
        (actions_removed, connections_removed)
    }

    /// Update properties of a single placed instance.
    pub fn update_action(&mut self, instance_id: &str, patch: &ActionPatch) {
        let Some((track_index, action)) = self.state.find_action_mut(instance_id) else {
            return;
        };
        patch.props.apply_to_instance(action);
        if let Some(start) = patch.start_time {
            action.start_time = start.max(0.0);
            self.state.tracks[track_index].sort_actions();
        }
        self.commit();
    }

    /// Edit a library skill. The patch is recorded as an override against
    /// the global id and retroactively applied to every placed instance
    /// sharing that id.
    pub fn update_library_skill(&mut self, global_id: &SkillGlobalId, patch: &OverridePatch) {
        self.state
            .overrides
            .entry(global_id.clone())
            .or_default()
            .merge(patch);

        for track in &mut self.state.tracks {
            for action in &mut track.actions {
                if &action.skill_id == global_id {
                    patch.apply_to_instance(action);
                }
            }
        }
        self.commit();
    }

    /// Assign an operator to a track. Rejected when the operator is
    /// already active on another track; otherwise the track is cleared
    /// and its connections cascade.
    pub fn change_track_operator(
        &mut self,
        track_index: usize,
        operator: OperatorId,
    ) -> PlanResult<()> {
        if track_index >= self.state.tracks.len() {
            return Ok(());
        }
        if let Some(other) = self
            .state
            .tracks
            .iter()
            .position(|t| t.operator.as_ref() == Some(&operator))
            .filter(|&i| i != track_index)
        {
            log::warn!("operator {operator} already assigned to track {other}");
            return Err(PlanError::OperatorInUse {
                operator,
                track: other,
            });
        }

        let removed: BTreeSet<InstanceId> = self.state.tracks[track_index]
            .actions
            .drain(..)
            .map(|a| a.instance_id)
            .collect();
        self.state.remove_connections_for_instances(&removed);
        self.state.tracks[track_index].operator = Some(operator);
        self.commit();
        Ok(())
    }

    /// Remove every action on a track, cascading connections. No-op when
    /// the track is missing or already empty.
    pub fn clear_track(&mut self, track_index: usize) {
        let Some(track) = self.state.tracks.get_mut(track_index) else {
            return;
        };
        if track.actions.is_empty() {
            return;
        }
        let removed: BTreeSet<InstanceId> =
            track.actions.drain(..).map(|a| a.instance_id).collect();
        self.state.remove_connections_for_instances(&removed);
        self.commit();
    }

    pub fn set_track_initial_gauge(&mut self, track_index: usize, value: f64) {
        let Some(track) = self.state.tracks.get_mut(track_index) else {
            return;
        };
        track.initial_gauge = value.max(0.0);
        self.commit();
    }

    pub fn set_track_max_gauge(&mut self, track_index: usize, value: Option<f64>) {
        let Some(track) = self.state.tracks.get_mut(track_index) else {
            return;
        };
        track.max_gauge_override = value;
        self.commit();
    }

    /// Shift every selected instance's start time by a signed delta,
    /// clamped to zero. One commit for the whole batch.
    pub fn nudge_selection(&mut self, delta: Time) {
        let targets = self.selection.instance_set();
        if targets.is_empty() {
            return;
        }
        let mut touched = false;
        for track in &mut self.state.tracks {
            let mut hit = false;
            for action in &mut track.actions {
                if targets.contains(&action.instance_id) {
                    action.start_time = (action.start_time + delta).max(0.0);
                    hit = true;
                }
            }
            if hit {
                track.sort_actions();
                touched = true;
            }
        }
        if touched {
            self.commit();
        }
    }

    /// Re-position one instance relative to a target instance. Results
    /// are rounded to one decimal place and clamped to zero.
    pub fn align_action(&mut self, instance_id: &str, target_id: &str, mode: AlignMode) {
        if instance_id == target_id {
            return;
        }
        let Some((_, target)) = self.state.find_action(target_id) else {
            return;
        };
        let (target_start, target_end) = (target.start_time, target.end_time());

        let Some((track_index, action)) = self.state.find_action_mut(instance_id) else {
            return;
        };
        let new_start = match mode {
            AlignMode::Before => target_start - TRIGGER_WINDOW - action.duration,
            AlignMode::After => target_end + TRIGGER_WINDOW,
            AlignMode::AlignStart => target_start,
            AlignMode::AlignEnd => target_end - action.duration,
        };
        action.start_time = round_tenth(new_start).max(0.0);
        self.state.tracks[track_index].sort_actions();
        self.commit();
    }

    /// Delete a connection by id. No-op when it does not exist.
    pub fn remove_connection(&mut self, connection_id: &str) {
        let before = self.state.connections.len();
        self.state.connections.retain(|c| c.id != connection_id);
        if self.state.connections.len() == before {
            return;
        }
        if self.selection.connection.as_deref() == Some(connection_id) {
            self.selection.connection = None;
        }
        self.commit();
    }

    /// Flip a connection between trigger and consumption semantics.
    pub fn set_connection_consumption(&mut self, connection_id: &str, is_consumption: bool) {
        let Some(conn) = self
            .state
            .connections
            .iter_mut()
            .find(|c| c.id == connection_id)
        else {
            return;
        };
        if conn.is_consumption == is_consumption {
            return;
        }
        conn.is_consumption = is_consumption;
        self.commit();
    }

    /// Delete one effect cell from an instance's grid, cascading every
    /// connection anchored to it.
    pub fn remove_effect_cell(&mut self, instance_id: &str, row: usize, col: usize) {
        let Some((_, action)) = self.state.find_action_mut(instance_id) else {
            return;
        };
        let Some(cells) = action.physical_anomaly.get_mut(row) else {
            return;
        };
        if col >= cells.len() {
            return;
        }
        let cell = cells.remove(col);
        if let Some(effect_id) = cell.effect_id {
            self.state.remove_connections_for_effect(&effect_id);
        }
        if let Some(selected) = &self.selection.effect {
            if selected.instance == instance_id && selected.row == row && selected.col == col {
                self.selection.effect = None;
            }
        }
        self.commit();
    }
}
