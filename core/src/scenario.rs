//! Scenario containers — multiple independent plans, one active.
//!
//! A scenario stores one complete `PlanState` snapshot. The live state is
//! captured back into the active container before any switch, add,
//! duplicate, or delete; every scenario operation resets history to a
//! single fresh commit (engine side).

use crate::engine::PlanEngine;
use crate::linking::LinkSession;
use crate::state::PlanState;
use crate::types::ScenarioId;
use serde::{Deserialize, Serialize};

/// Hard cap on coexisting scenarios.
pub const MAX_SCENARIOS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: String,
    /// Stored snapshot. None means the scenario has never been entered;
    /// loading it yields a fresh empty state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PlanState>,
}

#[derive(Debug, Clone)]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
    active: ScenarioId,
}

impl ScenarioSet {
    /// A set always holds at least one scenario.
    pub fn new(first_id: ScenarioId, first_name: String) -> Self {
        Self {
            scenarios: vec![Scenario {
                id: first_id.clone(),
                name: first_name,
                data: None,
            }],
            active: first_id,
        }
    }

    /// Rebuild from imported parts. The caller has already validated that
    /// `scenarios` is non-empty; an unknown active id falls back to the
    /// first entry.
    pub fn from_parts(scenarios: Vec<Scenario>, active: ScenarioId) -> Self {
        debug_assert!(!scenarios.is_empty());
        let active = if scenarios.iter().any(|s| s.id == active) {
            active
        } else {
            scenarios[0].id.clone()
        };
        Self { scenarios, active }
    }

    pub fn active_id(&self) -> &str {
        &self.active
    }

    pub fn set_active(&mut self, id: ScenarioId) {
        debug_assert!(self.contains(&id));
        self.active = id;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenarios.iter().any(|s| s.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Scenario> {
        self.scenarios.iter_mut().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.scenarios.len() >= MAX_SCENARIOS
    }

    pub fn entries(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Capture a live state into the given scenario's container.
    pub fn capture(&mut self, id: &str, state: &PlanState) {
        if let Some(s) = self.get_mut(id) {
            s.data = Some(state.clone());
        }
    }

    /// Append a new scenario. False when the cap is reached.
    pub fn push(&mut self, scenario: Scenario) -> bool {
        if self.is_full() {
            return false;
        }
        self.scenarios.push(scenario);
        true
    }

    /// Remove a scenario by id. The engine rejects removing the last one
    /// and never removes the active entry without switching first.
    pub fn remove(&mut self, id: &str) -> Option<Scenario> {
        let pos = self.scenarios.iter().position(|s| s.id == id)?;
        Some(self.scenarios.remove(pos))
    }

    /// The entry next to `id`: the previous one, or the following one when
    /// `id` is first. Used to pick a fallback before deleting the active
    /// scenario.
    pub fn neighbor_of(&self, id: &str) -> Option<ScenarioId> {
        let pos = self.scenarios.iter().position(|s| s.id == id)?;
        if pos > 0 {
            Some(self.scenarios[pos - 1].id.clone())
        } else {
            self.scenarios.get(1).map(|s| s.id.clone())
        }
    }
}

impl PlanEngine {
    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    pub fn active_scenario_id(&self) -> &str {
        self.scenarios.active_id()
    }

    /// Swap live state into `id`. The outgoing state is captured first, so
    /// switching back round-trips exactly. Selection, linking, and history
    /// do not survive the switch.
    pub fn switch_scenario(&mut self, id: &str) -> bool {
        if id == self.scenarios.active_id() || !self.scenarios.contains(id) {
            return false;
        }
        let active = self.scenarios.active_id().to_string();
        self.scenarios.capture(&active, &self.state);
        self.scenarios.set_active(id.to_string());

        self.state = self
            .scenarios
            .get(id)
            .and_then(|s| s.data.clone())
            .unwrap_or_default();
        self.reset_transients();
        true
    }

    /// Create an empty scenario and switch to it. None when at the cap.
    pub fn add_scenario(&mut self, name: String) -> Option<ScenarioId> {
        if self.scenarios.is_full() {
            log::warn!("scenario cap ({MAX_SCENARIOS}) reached");
            return None;
        }
        let active = self.scenarios.active_id().to_string();
        self.scenarios.capture(&active, &self.state);

        let id = self.ids.scenario_id();
        self.scenarios.push(Scenario {
            id: id.clone(),
            name,
            data: None,
        });
        self.scenarios.set_active(id.clone());
        self.state = PlanState::default();
        self.reset_transients();
        Some(id)
    }

    /// Deep-copy a scenario under a " (copy)" name and switch to the copy.
    /// None when the source is unknown or the cap is reached.
    pub fn duplicate_scenario(&mut self, id: &str) -> Option<ScenarioId> {
        if self.scenarios.is_full() {
            log::warn!("scenario cap ({MAX_SCENARIOS}) reached");
            return None;
        }
        let active = self.scenarios.active_id().to_string();
        self.scenarios.capture(&active, &self.state);

        let source = self.scenarios.get(id)?;
        let copy = Scenario {
            id: self.ids.scenario_id(),
            name: format!("{} (copy)", source.name),
            data: source.data.clone(),
        };
        let new_id = copy.id.clone();
        let snapshot = copy.data.clone().unwrap_or_default();
        self.scenarios.push(copy);
        self.scenarios.set_active(new_id.clone());
        self.state = snapshot;
        self.reset_transients();
        Some(new_id)
    }

    /// Delete a scenario. Deleting the active one switches to a neighbor
    /// first. The last remaining scenario cannot be deleted.
    pub fn delete_scenario(&mut self, id: &str) -> bool {
        if !self.scenarios.contains(id) || self.scenarios.len() <= 1 {
            return false;
        }
        if id == self.scenarios.active_id() {
            if let Some(neighbor) = self.scenarios.neighbor_of(id) {
                self.scenarios.set_active(neighbor.clone());
                self.state = self
                    .scenarios
                    .get(&neighbor)
                    .and_then(|s| s.data.clone())
                    .unwrap_or_default();
                self.reset_transients();
            }
        }
        let removed = self.scenarios.remove(id).is_some();
        if removed {
            self.persist_best_effort();
        }
        removed
    }

    pub fn rename_scenario(&mut self, id: &str, name: String) {
        if let Some(scenario) = self.scenarios.get_mut(id) {
            scenario.name = name;
            self.persist_best_effort();
        }
    }

    /// Shared tail of every scenario operation: clear view state, restart
    /// history from the new baseline, notify, save.
    fn reset_transients(&mut self) {
        self.selection.clear();
        self.linking = LinkSession::Idle;
        self.history.reset(self.state.clone());
        self.publish();
        self.persist_best_effort();
    }
}
