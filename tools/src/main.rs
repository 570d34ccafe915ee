//! plan-runner: headless plan loader and simulator.
//!
//! Usage:
//!   plan-runner --gamedata data/gamedata.json --project plan.json
//!   plan-runner --gamedata data/gamedata.json --share CODE --db plans.db

use anyhow::Result;
use endaxis_core::{
    config::GameData,
    engine::PlanEngine,
    persist::SavedProjectStore,
    simulation::{energy_curve, gauge_curve, stagger_curve},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let gamedata = flag_value(&args, "--gamedata");
    let project = flag_value(&args, "--project");
    let share = flag_value(&args, "--share");
    let db = flag_value(&args, "--db");

    let game = match gamedata {
        Some(path) => GameData::load(path)?,
        None => GameData::default_test(),
    };

    println!("endaxis — plan-runner");
    println!("  roster:    {} character(s)", game.character_roster.len());
    println!("  gamedata:  {}", gamedata.unwrap_or("(built-in)"));
    println!("  db:        {}", db.unwrap_or("(none)"));
    println!();

    let mut engine = PlanEngine::with_defaults(game);
    if let Some(path) = db {
        engine = engine.with_persistence(SavedProjectStore::open(path)?);
    }

    if let Some(path) = project {
        if share.is_some() {
            log::warn!("--share is ignored when --project is given");
        }
        let json = std::fs::read_to_string(path)?;
        engine.import_json(&json)?;
        println!("loaded project from {path}");
    } else if let Some(code) = share {
        engine.import_share_code(code.trim())?;
        println!("loaded project from share code");
    }

    print_summary(&mut engine);
    Ok(())
}

fn print_summary(engine: &mut PlanEngine) {
    let state = engine.state().clone();
    let constants = *engine.constants();
    let roster = engine.roster().to_vec();

    let total_actions: usize = state.tracks.iter().map(|t| t.actions.len()).sum();
    println!("=== PLAN SUMMARY ===");
    println!("  scenario:     {}", engine.active_scenario_id());
    println!("  scenarios:    {}", engine.scenarios().len());
    println!("  actions:      {total_actions}");
    println!("  connections:  {}", state.connections.len());
    println!();

    let energy = energy_curve(&state, &constants);
    let (min_sp, end_sp) = energy
        .iter()
        .fold((f64::INFINITY, 0.0), |(min, _), s| (min.min(s.value), s.value));
    println!("=== ENERGY ===");
    println!("  samples:  {}", energy.len());
    println!("  minimum:  {min_sp:.1}");
    println!("  final:    {end_sp:.1}");
    if min_sp < 0.0 {
        println!("  WARNING: plan under-resources energy (minimum below zero)");
    }
    println!();

    println!("=== TRACKS ===");
    for (index, track) in state.tracks.iter().enumerate() {
        let operator = track.operator.as_deref().unwrap_or("(empty)");
        match gauge_curve(&state, &roster, index) {
            Some(curve) => {
                let last = curve.points.last().map(|s| s.value).unwrap_or(0.0);
                println!(
                    "  track {index}: {operator:<12} actions: {:>3}  gauge: {last:.0}/{:.0}",
                    track.actions.len(),
                    curve.ceiling
                );
            }
            None => println!("  track {index}: {operator:<12} actions: {:>3}", track.actions.len()),
        }
    }
    println!();

    let stagger = stagger_curve(&state, &constants);
    println!("=== STAGGER ===");
    println!("  break windows: {}", stagger.locks.len());
    for window in &stagger.locks {
        println!("    [{:.1}s .. {:.1}s]", window.start, window.end);
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
