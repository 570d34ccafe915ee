//! The planner engine — the one explicit context object.
//!
//! RULES:
//!   - No ambient globals. The application owns exactly one PlanEngine
//!     and passes it to every command and view.
//!   - Every mutating command runs to completion and produces at most one
//!     history commit before returning; no partial application.
//!   - Observers are notified explicitly after a successful mutation.
//!   - Persistence is best-effort and fire-and-forget: it never blocks or
//!     fails a command.

use crate::config::{CharacterData, GameData, SystemConstants};
use crate::history::History;
use crate::ids::{IdProvider, UuidProvider};
use crate::linking::LinkSession;
use crate::persist::{SavedProjectStore, SAVE_KEY};
use crate::scenario::ScenarioSet;
use crate::selection::{Clipboard, Selection};
use crate::skill::{self, SkillTemplate};
use crate::state::PlanState;
use crate::types::{OperatorId, Time};

pub type Observer = Box<dyn FnMut(&PlanState) + Send>;

pub struct PlanEngine {
    pub(crate) constants: SystemConstants,
    pub(crate) roster: Vec<CharacterData>,
    pub(crate) state: PlanState,
    pub(crate) history: History,
    pub(crate) scenarios: ScenarioSet,
    pub(crate) selection: Selection,
    pub(crate) clipboard: Option<Clipboard>,
    pub(crate) linking: LinkSession,
    pub(crate) cursor_time: Option<Time>,
    pub(crate) ids: Box<dyn IdProvider>,
    pub(crate) persistence: Option<SavedProjectStore>,
    observers: Vec<Observer>,
}

impl PlanEngine {
    /// Build a fresh engine around loaded game data. Establishes the
    /// initial history snapshot immediately, like any other load path.
    pub fn new(game: GameData, mut ids: Box<dyn IdProvider>) -> Self {
        let state = PlanState::default();
        let first_scenario = ids.scenario_id();
        let mut engine = Self {
            constants: game.system_constants,
            roster: game.character_roster,
            state,
            history: History::new(),
            scenarios: ScenarioSet::new(first_scenario, "Plan 1".to_string()),
            selection: Selection::default(),
            clipboard: None,
            linking: LinkSession::Idle,
            cursor_time: None,
            ids,
            persistence: None,
            observers: Vec::new(),
        };
        engine.history.reset(engine.state.clone());
        engine
    }

    /// Convenience constructor with the production id provider.
    pub fn with_defaults(game: GameData) -> Self {
        Self::new(game, Box::new(UuidProvider))
    }

    /// Attach a durable store. Saved state is restored once, here; a
    /// missing or unreadable document is treated as no saved state.
    pub fn with_persistence(mut self, store: SavedProjectStore) -> Self {
        match store.load(SAVE_KEY) {
            Ok(Some(json)) => {
                if let Err(err) = self.import_json(&json) {
                    log::warn!("saved project ignored: {err}");
                }
            }
            Ok(None) => log::debug!("no saved project found"),
            Err(err) => log::warn!("saved project unavailable: {err}"),
        }
        self.persistence = Some(store);
        self
    }

    /// Register an observer invoked after every successful mutation.
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    // ── Read access ────────────────────────────────────────────

    pub fn state(&self) -> &PlanState {
        &self.state
    }

    pub fn constants(&self) -> &SystemConstants {
        &self.constants
    }

    pub fn roster(&self) -> &[CharacterData] {
        &self.roster
    }

    pub fn character(&self, operator: &str) -> Option<&CharacterData> {
        self.roster.iter().find(|c| c.id == operator)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    pub fn cursor_time(&self) -> Option<Time> {
        self.cursor_time
    }

    /// Placeable templates for one operator, overrides applied.
    pub fn skill_library(&self, operator: &OperatorId) -> Vec<SkillTemplate> {
        let Some(character) = self.character(operator) else {
            return Vec::new();
        };
        skill::skill_library(character, &self.constants, &self.state.overrides)
    }

    // ── Cursor ─────────────────────────────────────────────────

    pub fn set_cursor_time(&mut self, time: Time) {
        self.cursor_time = Some(time.max(0.0));
    }

    pub fn clear_cursor_time(&mut self) {
        self.cursor_time = None;
    }

    // ── History ────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.state = snapshot;
        self.selection.clear();
        self.publish();
        self.persist_best_effort();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.state = snapshot;
        self.selection.clear();
        self.publish();
        self.persist_best_effort();
        true
    }

    // ── Commit plumbing ────────────────────────────────────────

    /// End-of-command bookkeeping: snapshot, notify, persist.
    pub(crate) fn commit(&mut self) {
        self.history.commit(self.state.clone());
        self.publish();
        self.persist_best_effort();
    }

    pub(crate) fn publish(&mut self) {
        // Observers must not observe half-applied commands, so this is
        // only called once per command, after the mutation settled.
        let state = &self.state;
        for observer in &mut self.observers {
            observer(state);
        }
    }

    /// Write-through to durable storage. Failure is logged and ignored;
    /// in-memory state is already correct.
    pub(crate) fn persist_best_effort(&mut self) {
        if self.persistence.is_none() {
            return;
        }
        let json = match self.export_json() {
            Ok(json) => json,
            Err(err) => {
                log::warn!("serializing project for save failed: {err}");
                return;
            }
        };
        if let Some(store) = &self.persistence {
            if let Err(err) = store.save(SAVE_KEY, &json) {
                log::warn!("saving project failed: {err}");
            }
        }
    }
}
