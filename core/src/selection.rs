//! Selection state and the copy/paste clipboard.
//!
//! RULE: Selection is transient view state. It is never snapshotted,
//! and undo/redo clears it. Selecting any one category (action,
//! connection, effect cell) clears the others.

use crate::engine::PlanEngine;
use crate::state::{ActionInstance, Connection};
use crate::types::{ConnectionId, InstanceId, Time};
use std::collections::BTreeSet;

/// Default paste offset when no cursor time is available.
const PASTE_FALLBACK_OFFSET: Time = 2.0;

/// A selected effect cell, addressed by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectCellRef {
    pub instance: InstanceId,
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub primary: Option<InstanceId>,
    pub multi: BTreeSet<InstanceId>,
    pub connection: Option<ConnectionId>,
    pub effect: Option<EffectCellRef>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.primary = None;
        self.multi.clear();
        self.connection = None;
        self.effect = None;
    }

    /// Every instance currently selected, primary included.
    pub fn instance_set(&self) -> BTreeSet<InstanceId> {
        let mut set = self.multi.clone();
        if let Some(primary) = &self.primary {
            set.insert(primary.clone());
        }
        set
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.primary.as_deref() == Some(instance_id) || self.multi.contains(instance_id)
    }
}

/// Copied actions with their owning track index, plus every connection
/// internal to the copied set, plus the earliest start time as anchor.
#[derive(Debug, Clone)]
pub struct Clipboard {
    pub(crate) actions: Vec<CopiedAction>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) base_time: Time,
}

#[derive(Debug, Clone)]
pub(crate) struct CopiedAction {
    pub track_index: usize,
    pub data: ActionInstance,
}

impl PlanEngine {
    // ── Selection commands (no history commits) ────────────────

    /// Toggle-select a single action as the primary selection.
    pub fn select_action(&mut self, instance_id: &str) {
        let already = self.selection.primary.as_deref() == Some(instance_id);
        self.selection.clear();
        if !already {
            self.selection.primary = Some(instance_id.to_string());
            self.selection.multi.insert(instance_id.to_string());
        }
    }

    pub fn set_multi_selection(&mut self, ids: Vec<InstanceId>) {
        self.selection.clear();
        if ids.len() == 1 {
            self.selection.primary = Some(ids[0].clone());
        }
        self.selection.multi = ids.into_iter().collect();
    }

    pub fn select_connection(&mut self, connection_id: &str) {
        self.selection.clear();
        self.selection.connection = Some(connection_id.to_string());
    }

    pub fn select_effect_cell(&mut self, cell: EffectCellRef) {
        self.selection.clear();
        self.selection.effect = Some(cell);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ── Clipboard ──────────────────────────────────────────────

    /// Capture the current selection: deep copies of every selected
    /// instance with its track index, plus connections whose both
    /// endpoints are selected. No-op when nothing is selected.
    pub fn copy_selection(&mut self) {
        let targets = self.selection.instance_set();
        if targets.is_empty() {
            return;
        }

        let mut actions = Vec::new();
        let mut base_time = f64::INFINITY;
        for (track_index, track) in self.state.tracks.iter().enumerate() {
            for action in &track.actions {
                if targets.contains(&action.instance_id) {
                    if action.start_time < base_time {
                        base_time = action.start_time;
                    }
                    actions.push(CopiedAction {
                        track_index,
                        data: action.clone(),
                    });
                }
            }
        }
        if actions.is_empty() {
            return;
        }

        let connections = self
            .state
            .connections
            .iter()
            .filter(|c| targets.contains(&c.from) && targets.contains(&c.to))
            .cloned()
            .collect();

        self.clipboard = Some(Clipboard {
            actions,
            connections,
            base_time,
        });
    }

    /// Re-create the clipboard contents at the cursor time (or +2s),
    /// with fresh instance and effect identifiers, preserving relative
    /// offsets and internal connections. Commits once.
    pub fn paste_selection(&mut self) {
        let Some(clipboard) = self.clipboard.clone() else {
            return;
        };

        let time_delta = match self.cursor_time {
            Some(cursor) => cursor - clipboard.base_time,
            None => PASTE_FALLBACK_OFFSET,
        };

        let mut instance_map = std::collections::BTreeMap::new();
        let mut effect_map = std::collections::BTreeMap::new();
        let mut touched_tracks = BTreeSet::new();

        for item in &clipboard.actions {
            if item.track_index >= self.state.tracks.len() {
                continue;
            }
            let new_id = self.ids.instance_id();
            instance_map.insert(item.data.instance_id.clone(), new_id.clone());

            let mut action = item.data.clone();
            action.instance_id = new_id;
            action.start_time = (action.start_time + time_delta).max(0.0);
            for row in &mut action.physical_anomaly {
                for cell in row {
                    if let Some(old) = cell.effect_id.take() {
                        let fresh = self.ids.effect_id();
                        effect_map.insert(old, fresh.clone());
                        cell.effect_id = Some(fresh);
                    }
                }
            }

            self.state.tracks[item.track_index].actions.push(action);
            touched_tracks.insert(item.track_index);
        }

        if instance_map.is_empty() {
            return;
        }

        for &index in &touched_tracks {
            self.state.tracks[index].sort_actions();
        }

        // Remap copied connections; anything referencing an identifier
        // outside the copied set is dropped.
        for conn in &clipboard.connections {
            let (Some(from), Some(to)) = (instance_map.get(&conn.from), instance_map.get(&conn.to))
            else {
                continue;
            };
            let from_effect = match &conn.from_effect {
                Some(old) => match effect_map.get(old) {
                    Some(new) => Some(new.clone()),
                    None => continue,
                },
                None => None,
            };
            let to_effect = match &conn.to_effect {
                Some(old) => match effect_map.get(old) {
                    Some(new) => Some(new.clone()),
                    None => continue,
                },
                None => None,
            };
            let id = self.ids.connection_id();
            self.state.connections.push(Connection {
                id,
                from: from.clone(),
                to: to.clone(),
                from_effect,
                to_effect,
                is_consumption: conn.is_consumption,
            });
        }

        let new_ids: Vec<InstanceId> = instance_map.values().cloned().collect();
        self.set_multi_selection(new_ids);
        self.commit();
    }
}
