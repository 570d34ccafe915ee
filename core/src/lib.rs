//! Deterministic planning core for timeline-based combat rotations.
//!
//! The engine owns four operator tracks of placed actions, a bounded
//! undo/redo history of full-state snapshots, a set of independent
//! scenarios, and pure simulators that derive energy, gauge, and stagger
//! curves from the plan. Commands mutate through [`PlanEngine`]; nothing
//! else holds state.

pub mod commands;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod history;
pub mod ids;
pub mod linking;
pub mod persist;
pub mod png_meta;
pub mod scenario;
pub mod selection;
pub mod share;
pub mod simulation;
pub mod skill;
pub mod state;
pub mod types;

pub use engine::PlanEngine;
pub use error::{PlanError, PlanResult};
