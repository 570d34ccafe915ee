//! Core entity state — tracks, placed actions, connections, overrides.
//!
//! RULE: `PlanState` is the unit of snapshotting. Everything the history
//! manager, the scenario containers, and the project document persist is
//! in here; selection, linking sessions, and the clipboard are not.

use crate::config::{DamageTick, SkillCategory};
use crate::types::{
    ConnectionId, EffectId, InstanceId, OperatorId, SkillGlobalId, Time,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Exactly four tracks exist at all times.
pub const TRACK_COUNT: usize = 4;

/// One cell of a placed action's effect grid. The stable id is assigned
/// lazily the first time a link references the cell, and never changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_id: Option<EffectId>,
    pub offset: Time,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub stagger: f64,
}

/// A placed, time-positioned copy of a skill template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInstance {
    pub instance_id: InstanceId,
    /// Global id of the template this instance was placed from.
    pub skill_id: SkillGlobalId,
    pub name: String,
    pub category: SkillCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    pub start_time: Time,
    pub duration: Time,
    #[serde(default)]
    pub cooldown: Time,
    #[serde(default)]
    pub sp_cost: f64,
    #[serde(default)]
    pub sp_gain: f64,
    #[serde(default)]
    pub gauge_cost: f64,
    #[serde(default)]
    pub gauge_gain: f64,
    #[serde(default)]
    pub team_gauge_gain: f64,
    #[serde(default)]
    pub stagger: f64,
    #[serde(default)]
    pub damage_ticks: Vec<DamageTick>,
    #[serde(default)]
    pub physical_anomaly: Vec<Vec<EffectCell>>,
}

impl ActionInstance {
    pub fn end_time(&self) -> Time {
        self.start_time + self.duration
    }

    pub fn effect_cell(&self, row: usize, col: usize) -> Option<&EffectCell> {
        self.physical_anomaly.get(row).and_then(|r| r.get(col))
    }

    pub fn effect_cell_mut(&mut self, row: usize, col: usize) -> Option<&mut EffectCell> {
        self.physical_anomaly.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// All effect ids currently assigned inside this instance.
    pub fn assigned_effect_ids(&self) -> Vec<EffectId> {
        self.physical_anomaly
            .iter()
            .flatten()
            .filter_map(|c| c.effect_id.clone())
            .collect()
    }
}

/// Directed edge between two actions, optionally anchored to a specific
/// effect cell on either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub from: InstanceId,
    pub to: InstanceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_effect: Option<EffectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_effect: Option<EffectId>,
    #[serde(default)]
    pub is_consumption: bool,
}

/// Partial property patch stored against a global skill id. Applying it
/// mutates both the generated template and every placed instance sharing
/// that id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverridePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sp_gain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge_gain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_gauge_gain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stagger: Option<f64>,
}

impl OverridePatch {
    /// Fold another patch on top of this one. Set fields win.
    pub fn merge(&mut self, other: &OverridePatch) {
        if other.duration.is_some() {
            self.duration = other.duration;
        }
        if other.cooldown.is_some() {
            self.cooldown = other.cooldown;
        }
        if other.sp_cost.is_some() {
            self.sp_cost = other.sp_cost;
        }
        if other.sp_gain.is_some() {
            self.sp_gain = other.sp_gain;
        }
        if other.gauge_cost.is_some() {
            self.gauge_cost = other.gauge_cost;
        }
        if other.gauge_gain.is_some() {
            self.gauge_gain = other.gauge_gain;
        }
        if other.team_gauge_gain.is_some() {
            self.team_gauge_gain = other.team_gauge_gain;
        }
        if other.stagger.is_some() {
            self.stagger = other.stagger;
        }
    }

    pub fn apply_to_instance(&self, a: &mut ActionInstance) {
        if let Some(v) = self.duration {
            a.duration = v;
        }
        if let Some(v) = self.cooldown {
            a.cooldown = v;
        }
        if let Some(v) = self.sp_cost {
            a.sp_cost = v;
        }
        if let Some(v) = self.sp_gain {
            a.sp_gain = v;
        }
        if let Some(v) = self.gauge_cost {
            a.gauge_cost = v;
        }
        if let Some(v) = self.gauge_gain {
            a.gauge_gain = v;
        }
        if let Some(v) = self.team_gauge_gain {
            a.team_gauge_gain = v;
        }
        if let Some(v) = self.stagger {
            a.stagger = v;
        }
    }
}

/// Typed property update for a single placed instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Time>,
    #[serde(flatten)]
    pub props: OverridePatch,
}

/// One of the four parallel timelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Owning operator, at most one; unique across all tracks.
    #[serde(default)]
    pub operator: Option<OperatorId>,
    /// Invariant: always sorted ascending by start_time.
    #[serde(default)]
    pub actions: Vec<ActionInstance>,
    #[serde(default)]
    pub initial_gauge: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gauge_override: Option<f64>,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            operator: None,
            actions: Vec::new(),
            initial_gauge: 0.0,
            max_gauge_override: None,
        }
    }
}

impl Track {
    /// Restore the sorted-by-start-time invariant. Stable, so equal
    /// timestamps keep their insertion order.
    pub fn sort_actions(&mut self) {
        self.actions.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(Ordering::Equal)
        });
    }
}

/// The complete snapshot-able entity state of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanState {
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default, rename = "characterOverrides")]
    pub overrides: BTreeMap<SkillGlobalId, OverridePatch>,
}

impl Default for PlanState {
    fn default() -> Self {
        Self {
            tracks: (0..TRACK_COUNT).map(|_| Track::default()).collect(),
            connections: Vec::new(),
            overrides: BTreeMap::new(),
        }
    }
}

impl PlanState {
    /// Locate a placed instance. Returns (track index, action).
    pub fn find_action(&self, instance_id: &str) -> Option<(usize, &ActionInstance)> {
        self.tracks.iter().enumerate().find_map(|(i, t)| {
            t.actions
                .iter()
                .find(|a| a.instance_id == instance_id)
                .map(|a| (i, a))
        })
    }

    pub fn find_action_mut(&mut self, instance_id: &str) -> Option<(usize, &mut ActionInstance)> {
        self.tracks.iter_mut().enumerate().find_map(|(i, t)| {
            t.actions
                .iter_mut()
                .find(|a| a.instance_id == instance_id)
                .map(|a| (i, a))
        })
    }

    pub fn track_index_of(&self, instance_id: &str) -> Option<usize> {
        self.find_action(instance_id).map(|(i, _)| i)
    }

    /// Drop every connection touching any of the given instances.
    /// Covers effect-anchored edges too, since anchors always live on an
    /// endpoint instance. Returns how many edges were removed.
    pub fn remove_connections_for_instances(&mut self, ids: &BTreeSet<InstanceId>) -> usize {
        let before = self.connections.len();
        self.connections
            .retain(|c| !ids.contains(&c.from) && !ids.contains(&c.to));
        before - self.connections.len()
    }

    /// Drop every connection anchored to a specific effect cell.
    pub fn remove_connections_for_effect(&mut self, effect_id: &str) -> usize {
        let before = self.connections.len();
        self.connections.retain(|c| {
            c.from_effect.as_deref() != Some(effect_id)
                && c.to_effect.as_deref() != Some(effect_id)
        });
        before - self.connections.len()
    }

    pub fn incoming_connections(&self, instance_id: &str) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| c.to == instance_id)
            .collect()
    }
}
