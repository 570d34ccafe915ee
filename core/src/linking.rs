//! Linking subsystem — transient session plus the connection graph.
//!
//! A session is either idle or holds a source instance with an optional
//! effect-cell anchor. Confirming resolves stable effect ids (assigning
//! one lazily when the anchored cell has none yet), dedupes against
//! existing edges by anchor identifier, and commits on success.

use crate::engine::PlanEngine;
use crate::state::Connection;
use crate::types::{ConnectionId, EffectId, InstanceId};

/// Position of an effect cell inside an action's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAnchor {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkSession {
    #[default]
    Idle,
    Active {
        source: InstanceId,
        anchor: Option<CellAnchor>,
    },
}

impl LinkSession {
    pub fn is_active(&self) -> bool {
        matches!(self, LinkSession::Active { .. })
    }
}

impl PlanEngine {
    /// Begin a linking session from the primary selected instance.
    /// Calling again with the same source and anchor cancels the session.
    pub fn start_linking(&mut self, anchor: Option<CellAnchor>) {
        let Some(source) = self.selection.primary.clone() else {
            return;
        };
        if let LinkSession::Active {
            source: cur_source,
            anchor: cur_anchor,
        } = &self.linking
        {
            if *cur_source == source && *cur_anchor == anchor {
                self.cancel_linking();
                return;
            }
        }
        self.linking = LinkSession::Active { source, anchor };
    }

    pub fn cancel_linking(&mut self) {
        self.linking = LinkSession::Idle;
    }

    pub fn linking_session(&self) -> &LinkSession {
        &self.linking
    }

    /// Close the session against a target. Returns the new connection id,
    /// or None when the session was cancelled without creating an edge
    /// (self-link at equal granularity, missing endpoint, or duplicate).
    pub fn confirm_linking(
        &mut self,
        target: &str,
        target_anchor: Option<CellAnchor>,
    ) -> Option<ConnectionId> {
        let LinkSession::Active { source, anchor } = self.linking.clone() else {
            return None;
        };
        self.cancel_linking();

        // Same instance at the same granularity is never a valid edge.
        if source == target && anchor == target_anchor {
            return None;
        }
        if self.state.find_action(&source).is_none() || self.state.find_action(target).is_none() {
            return None;
        }

        let from_effect = match anchor {
            Some(a) => Some(self.resolve_effect_id(&source, a)?),
            None => None,
        };
        let to_effect = match target_anchor {
            Some(a) => Some(self.resolve_effect_id(target, a)?),
            None => None,
        };

        // Dedupe on endpoints plus anchor identifiers. Anchor ids are
        // stable, so identifier equality is authoritative here.
        let duplicate = self.state.connections.iter().any(|c| {
            c.from == source
                && c.to == target
                && c.from_effect == from_effect
                && c.to_effect == to_effect
        });
        if duplicate {
            return None;
        }

        let id = self.ids.connection_id();
        self.state.connections.push(Connection {
            id: id.clone(),
            from: source,
            to: target.to_string(),
            from_effect,
            to_effect,
            is_consumption: false,
        });
        self.commit();
        Some(id)
    }

    /// Stable id of an anchored cell, assigned lazily on first reference.
    /// None when the cell does not exist.
    fn resolve_effect_id(&mut self, instance_id: &str, anchor: CellAnchor) -> Option<EffectId> {
        // Mint the id first; assigning it only when the cell lacks one
        // keeps already-assigned ids immutable.
        let fresh = self.ids.effect_id();
        let (_, action) = self.state.find_action_mut(instance_id)?;
        let cell = action.effect_cell_mut(anchor.row, anchor.col)?;
        if cell.effect_id.is_none() {
            cell.effect_id = Some(fresh);
        }
        cell.effect_id.clone()
    }
}
