//! Shared primitive types used across the entire planner core.

/// A point on the rotation timeline, in seconds.
pub type Time = f64;

/// Stable identifier of a placed action instance. Never reused.
pub type InstanceId = String;

/// Stable identifier of a connection edge.
pub type ConnectionId = String;

/// Stable identifier of an effect cell inside an action.
/// Assigned lazily the first time a link references the cell.
pub type EffectId = String;

/// Character/operator identifier from the roster.
pub type OperatorId = String;

/// Global skill identifier: operator id + category suffix
/// (e.g. `lena_skill`), or operator id + variant id.
pub type SkillGlobalId = String;

/// Scenario container identifier.
pub type ScenarioId = String;
