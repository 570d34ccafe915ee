//! Deterministic resource simulators.
//!
//! RULES:
//!   - Every generator is a pure function of the plan state: no caching,
//!     no side effects, idempotent across calls.
//!   - Curves are sample lists; two samples at the same timestamp are an
//!     instantaneous jump and renderers draw a vertical step.
//!   - Events at equal timestamps apply in insertion order (tracks first
//!     to last, actions in sorted order, per-action event order fixed).

use crate::config::{CharacterData, SystemConstants};
use crate::state::PlanState;
use crate::types::Time;
use std::cmp::Ordering;

/// Fixed timeline length every curve runs to.
pub const TOTAL_DURATION: Time = 120.0;

/// Energy regeneration is suppressed for this long after a battle-skill
/// cast begins. Hard-coded to the skill category until product says
/// otherwise.
pub const SKILL_REGEN_LOCK: Time = 0.5;

/// Length of the break window opened when the stagger meter fills.
pub const BREAK_LOCK_DURATION: Time = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: Time,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockWindow {
    pub start: Time,
    pub end: Time,
}

/// Per-track gauge curve plus the ceiling it was clamped against.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeCurve {
    pub ceiling: f64,
    pub points: Vec<Sample>,
}

/// Stagger curve plus the break windows recorded along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct StaggerCurve {
    pub points: Vec<Sample>,
    pub locks: Vec<LockWindow>,
}

fn sort_by_time<E>(events: &mut [(Time, E)]) {
    // Stable sort: ties keep insertion order.
    events.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
}

// ── Energy (SP) ────────────────────────────────────────────────

enum SpEvent {
    Delta(f64),
    LockStart,
    LockEnd,
}

/// Global energy curve across all tracks.
///
/// Value rises linearly at the regen rate between events (zero while any
/// regen lock is open; locks stack), is interpolated to emit a point
/// exactly where the cap would be crossed, and is clamped at the top
/// only — negative energy is the intended under-resourced signal.
pub fn energy_curve(state: &PlanState, constants: &SystemConstants) -> Vec<Sample> {
    let mut events: Vec<(Time, SpEvent)> = Vec::new();
    for track in &state.tracks {
        for action in &track.actions {
            if action.sp_cost > 0.0 {
                events.push((action.start_time, SpEvent::Delta(-action.sp_cost)));
            }
            if action.sp_gain > 0.0 {
                events.push((action.end_time(), SpEvent::Delta(action.sp_gain)));
            }
            for tick in &action.damage_ticks {
                if tick.sp > 0.0 {
                    events.push((action.start_time + tick.offset, SpEvent::Delta(tick.sp)));
                }
            }
            if action.category == crate::config::SkillCategory::Skill {
                events.push((action.start_time, SpEvent::LockStart));
                events.push((action.start_time + SKILL_REGEN_LOCK, SpEvent::LockEnd));
            }
        }
    }
    sort_by_time(&mut events);

    let max_sp = constants.max_sp;
    let rate = constants.sp_regen_rate;
    let mut value = constants.initial_sp.min(max_sp);
    let mut time: Time = 0.0;
    let mut locks: u32 = 0;
    let mut points = vec![Sample { time: 0.0, value }];

    // Move the walk to `target`, emitting a point at the exact moment the
    // cap is crossed. Does not emit a point at `target` itself.
    let advance = |time: &mut Time, value: &mut f64, locks: u32, target: Time, points: &mut Vec<Sample>| {
        if target <= *time {
            return;
        }
        if locks == 0 && rate > 0.0 && *value < max_sp {
            let projected = *value + (target - *time) * rate;
            if projected >= max_sp {
                let crossing = *time + (max_sp - *value) / rate;
                if crossing < target {
                    points.push(Sample {
                        time: crossing,
                        value: max_sp,
                    });
                }
                *value = max_sp;
            } else {
                *value = projected;
            }
        }
        *time = target;
    };

    for (at, event) in events {
        advance(&mut time, &mut value, locks, at, &mut points);
        match event {
            SpEvent::Delta(delta) => {
                points.push(Sample { time, value });
                value += delta;
                // Upper clamp only; going negative is meaningful.
                if value > max_sp {
                    value = max_sp;
                }
                points.push(Sample { time, value });
            }
            SpEvent::LockStart => locks += 1,
            SpEvent::LockEnd => locks = locks.saturating_sub(1),
        }
    }

    if time < TOTAL_DURATION {
        advance(&mut time, &mut value, locks, TOTAL_DURATION, &mut points);
        points.push(Sample { time, value });
    }
    points
}

// ── Per-track gauge ────────────────────────────────────────────

/// Resolved gauge ceiling for a track, by priority: explicit per-track
/// override, else an override recorded against the track's ultimate,
/// else the character's default, else 100.
pub fn gauge_ceiling(
    state: &PlanState,
    roster: &[CharacterData],
    track_index: usize,
) -> Option<f64> {
    let track = state.tracks.get(track_index)?;
    let operator = track.operator.as_ref()?;
    let character = roster.iter().find(|c| &c.id == operator)?;

    if let Some(explicit) = track.max_gauge_override.filter(|v| *v > 0.0) {
        return Some(explicit);
    }
    let ultimate_id = format!("{operator}_ultimate");
    if let Some(from_override) = state
        .overrides
        .get(&ultimate_id)
        .and_then(|o| o.gauge_cost)
        .filter(|v| *v > 0.0)
    {
        return Some(from_override);
    }
    Some(character.ultimate_gauge_max.unwrap_or(100.0))
}

/// Ultimate gauge curve for one track. None when the track has no
/// operator or the operator is not in the roster.
///
/// The track's own actions contribute cost at start and gain at end;
/// other tracks contribute team gauge at their end, unless the receiving
/// character opted out. Clamped to [0, ceiling] after every change.
pub fn gauge_curve(
    state: &PlanState,
    roster: &[CharacterData],
    track_index: usize,
) -> Option<GaugeCurve> {
    let ceiling = gauge_ceiling(state, roster, track_index)?;
    let track = &state.tracks[track_index];
    let operator = track.operator.as_ref()?;
    let character = roster.iter().find(|c| &c.id == operator)?;

    let mut events: Vec<(Time, f64)> = Vec::new();
    for (index, source) in state.tracks.iter().enumerate() {
        for action in &source.actions {
            if index == track_index {
                if action.gauge_cost > 0.0 {
                    events.push((action.start_time, -action.gauge_cost));
                }
                if action.gauge_gain > 0.0 {
                    events.push((action.end_time(), action.gauge_gain));
                }
            } else if action.team_gauge_gain > 0.0 && !character.team_gauge_opt_out {
                events.push((action.end_time(), action.team_gauge_gain));
            }
        }
    }
    sort_by_time(&mut events);

    let mut value = track.initial_gauge.clamp(0.0, ceiling);
    let mut points = vec![Sample { time: 0.0, value }];
    for (at, delta) in events {
        points.push(Sample { time: at, value });
        value = (value + delta).clamp(0.0, ceiling);
        points.push(Sample { time: at, value });
    }
    points.push(Sample {
        time: TOTAL_DURATION,
        value,
    });

    Some(GaugeCurve { ceiling, points })
}

// ── Stagger / break ────────────────────────────────────────────

/// Global stagger meter. Contributions come from action-level stagger at
/// the action's end, damage ticks and effect cells at start+offset. When
/// an accumulation reaches the cap the meter resets to zero and a break
/// window opens; gains inside an open window are ignored.
pub fn stagger_curve(state: &PlanState, constants: &SystemConstants) -> StaggerCurve {
    let mut events: Vec<(Time, f64)> = Vec::new();
    for track in &state.tracks {
        for action in &track.actions {
            if action.stagger > 0.0 {
                events.push((action.end_time(), action.stagger));
            }
            for tick in &action.damage_ticks {
                if tick.stagger > 0.0 {
                    events.push((action.start_time + tick.offset, tick.stagger));
                }
            }
            for cell in action.physical_anomaly.iter().flatten() {
                if cell.stagger > 0.0 {
                    events.push((action.start_time + cell.offset, cell.stagger));
                }
            }
        }
    }
    sort_by_time(&mut events);

    let max_stagger = constants.max_stagger;
    let mut value = 0.0f64;
    let mut locked_until = f64::NEG_INFINITY;
    let mut points = vec![Sample {
        time: 0.0,
        value: 0.0,
    }];
    let mut locks = Vec::new();
    let mut last_time: Time = 0.0;

    for (at, gain) in events {
        points.push(Sample { time: at, value });
        if at >= locked_until {
            value += gain;
            if value >= max_stagger {
                value = 0.0;
                locked_until = at + BREAK_LOCK_DURATION;
                locks.push(LockWindow {
                    start: at,
                    end: locked_until,
                });
            }
        }
        points.push(Sample { time: at, value });
        last_time = at;
    }

    if last_time < TOTAL_DURATION {
        points.push(Sample {
            time: TOTAL_DURATION,
            value,
        });
    }

    StaggerCurve { points, locks }
}
