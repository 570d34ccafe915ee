//! Project document — the single serialized surface for saving, sharing,
//! and embedding.
//!
//! RULE: Import validates before touching anything. A malformed document
//! returns an error and leaves the live engine exactly as it was.

use crate::engine::PlanEngine;
use crate::error::{PlanError, PlanResult};
use crate::linking::LinkSession;
use crate::scenario::{Scenario, ScenarioSet};
use crate::types::ScenarioId;
use serde::{Deserialize, Serialize};

/// Document schema version written on every export.
pub const PROJECT_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub version: String,
    /// Export time, unix milliseconds.
    pub timestamp: i64,
    pub scenario_list: Vec<Scenario>,
    pub active_scenario_id: ScenarioId,
    pub system_constants: crate::config::SystemConstants,
}

impl PlanEngine {
    /// Snapshot the whole project. The live state is captured into the
    /// active scenario first so the document is self-contained.
    pub fn export_document(&mut self) -> ProjectDocument {
        let active = self.scenarios.active_id().to_string();
        self.scenarios.capture(&active, &self.state);
        ProjectDocument {
            version: PROJECT_VERSION.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            scenario_list: self.scenarios.entries().to_vec(),
            active_scenario_id: active,
            system_constants: self.constants.clone(),
        }
    }

    pub fn export_json(&mut self) -> PlanResult<String> {
        let doc = self.export_document();
        Ok(serde_json::to_string(&doc)?)
    }

    /// Replace the whole project with a document's contents. An unknown
    /// active id falls back to the first scenario; a scenario with no
    /// stored data loads as an empty plan.
    pub fn import_document(&mut self, doc: ProjectDocument) -> PlanResult<()> {
        if doc.scenario_list.is_empty() {
            return Err(PlanError::InvalidDocument(
                "document contains no scenarios".to_string(),
            ));
        }
        log::debug!(
            "importing project v{} with {} scenario(s)",
            doc.version,
            doc.scenario_list.len()
        );

        self.scenarios = ScenarioSet::from_parts(doc.scenario_list, doc.active_scenario_id);
        self.state = self
            .scenarios
            .get(&self.scenarios.active_id().to_string())
            .and_then(|s| s.data.clone())
            .unwrap_or_default();
        self.constants = doc.system_constants;

        self.selection.clear();
        self.linking = LinkSession::Idle;
        self.clipboard = None;
        self.history.reset(self.state.clone());
        self.publish();
        self.persist_best_effort();
        Ok(())
    }

    /// Parse-then-apply: a JSON error surfaces before any state changes.
    pub fn import_json(&mut self, json: &str) -> PlanResult<()> {
        let doc: ProjectDocument = serde_json::from_str(json)?;
        self.import_document(doc)
    }
}
