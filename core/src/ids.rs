//! Identifier provider.
//!
//! RULE: All identifier generation flows through an IdProvider.
//! Commands never mint ids inline — uniqueness across the whole
//! store is the provider's contract, and tests swap in a
//! deterministic sequential provider.

use crate::types::{ConnectionId, EffectId, InstanceId, ScenarioId};

pub trait IdProvider: Send {
    fn instance_id(&mut self) -> InstanceId;
    fn connection_id(&mut self) -> ConnectionId;
    fn effect_id(&mut self) -> EffectId;
    fn scenario_id(&mut self) -> ScenarioId;
}

/// Production provider backed by random v4 UUIDs.
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn instance_id(&mut self) -> InstanceId {
        format!("inst_{}", uuid::Uuid::new_v4().simple())
    }

    fn connection_id(&mut self) -> ConnectionId {
        format!("conn_{}", uuid::Uuid::new_v4().simple())
    }

    fn effect_id(&mut self) -> EffectId {
        format!("fx_{}", uuid::Uuid::new_v4().simple())
    }

    fn scenario_id(&mut self) -> ScenarioId {
        format!("sc_{}", uuid::Uuid::new_v4().simple())
    }
}

/// Deterministic provider for tests: monotonic counters per kind.
#[derive(Default)]
pub struct SequentialIds {
    instances: u64,
    connections: u64,
    effects: u64,
    scenarios: u64,
}

impl IdProvider for SequentialIds {
    fn instance_id(&mut self) -> InstanceId {
        self.instances += 1;
        format!("inst_{}", self.instances)
    }

    fn connection_id(&mut self) -> ConnectionId {
        self.connections += 1;
        format!("conn_{}", self.connections)
    }

    fn effect_id(&mut self) -> EffectId {
        self.effects += 1;
        format!("fx_{}", self.effects)
    }

    fn scenario_id(&mut self) -> ScenarioId {
        self.scenarios += 1;
        format!("sc_{}", self.scenarios)
    }
}
