//! Skill template builder.
//!
//! Turns a character's per-category `SkillSpec` into a ready-to-place
//! `SkillTemplate`: category defaults first, then the character's numbers,
//! then any stored override patch. Placing a template deep-copies its
//! effect grid; stable effect ids are NOT assigned here — they appear
//! lazily the first time a link references a cell.

use crate::config::{
    CharacterData, DamageTick, EffectCellSpec, SkillCategory, SkillSpec, SystemConstants,
};
use crate::state::{ActionInstance, EffectCell, OverridePatch};
use crate::types::{InstanceId, SkillGlobalId, Time};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillTemplate {
    pub global_id: SkillGlobalId,
    pub name: String,
    pub category: SkillCategory,
    pub element: Option<String>,
    pub duration: Time,
    pub cooldown: Time,
    pub sp_cost: f64,
    pub sp_gain: f64,
    pub gauge_cost: f64,
    pub gauge_gain: f64,
    pub team_gauge_gain: f64,
    pub stagger: f64,
    pub damage_ticks: Vec<DamageTick>,
    pub anomalies: Vec<Vec<EffectCellSpec>>,
}

impl SkillTemplate {
    /// Place this template on the timeline: fresh instance identity, deep
    /// copy of the effect grid with unassigned effect ids.
    pub fn instantiate(&self, instance_id: InstanceId, start_time: Time) -> ActionInstance {
        ActionInstance {
            instance_id,
            skill_id: self.global_id.clone(),
            name: self.name.clone(),
            category: self.category,
            element: self.element.clone(),
            start_time: start_time.max(0.0),
            duration: self.duration,
            cooldown: self.cooldown,
            sp_cost: self.sp_cost,
            sp_gain: self.sp_gain,
            gauge_cost: self.gauge_cost,
            gauge_gain: self.gauge_gain,
            team_gauge_gain: self.team_gauge_gain,
            stagger: self.stagger,
            damage_ticks: self.damage_ticks.clone(),
            physical_anomaly: self
                .anomalies
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| EffectCell {
                            effect_id: None,
                            offset: cell.offset,
                            kind: cell.kind.clone(),
                            stagger: cell.stagger,
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

impl OverridePatch {
    pub fn apply_to_template(&self, t: &mut SkillTemplate) {
        if let Some(v) = self.duration {
            t.duration = v;
        }
        if let Some(v) = self.cooldown {
            t.cooldown = v;
        }
        if let Some(v) = self.sp_cost {
            t.sp_cost = v;
        }
        if let Some(v) = self.sp_gain {
            t.sp_gain = v;
        }
        if let Some(v) = self.gauge_cost {
            t.gauge_cost = v;
        }
        if let Some(v) = self.gauge_gain {
            t.gauge_gain = v;
        }
        if let Some(v) = self.team_gauge_gain {
            t.team_gauge_gain = v;
        }
        if let Some(v) = self.stagger {
            t.stagger = v;
        }
    }
}

/// Build one base-category template for a character.
pub fn build_template(
    character: &CharacterData,
    category: SkillCategory,
    constants: &SystemConstants,
    overrides: &BTreeMap<SkillGlobalId, OverridePatch>,
) -> SkillTemplate {
    let spec = character.skills.get(&category).cloned().unwrap_or_default();
    let global_id = format!("{}_{}", character.id, category.suffix());
    from_spec(
        character,
        global_id,
        category.display_name().to_string(),
        category,
        &spec,
        constants,
        overrides,
    )
}

/// Build a template for one of the character's variant skills.
pub fn build_variant(
    character: &CharacterData,
    variant_id: &str,
    constants: &SystemConstants,
    overrides: &BTreeMap<SkillGlobalId, OverridePatch>,
) -> Option<SkillTemplate> {
    let variant = character.variants.iter().find(|v| v.id == variant_id)?;
    let global_id = format!("{}_{}", character.id, variant.id);
    Some(from_spec(
        character,
        global_id,
        variant.name.clone(),
        SkillCategory::Variant,
        &variant.spec,
        constants,
        overrides,
    ))
}

/// The full placeable library for one character: the five base slots plus
/// every variant, overrides applied.
pub fn skill_library(
    character: &CharacterData,
    constants: &SystemConstants,
    overrides: &BTreeMap<SkillGlobalId, OverridePatch>,
) -> Vec<SkillTemplate> {
    let mut out: Vec<SkillTemplate> = SkillCategory::BASE
        .iter()
        .map(|&cat| build_template(character, cat, constants, overrides))
        .collect();
    for variant in &character.variants {
        if let Some(t) = build_variant(character, &variant.id, constants, overrides) {
            out.push(t);
        }
    }
    out
}

fn from_spec(
    character: &CharacterData,
    global_id: SkillGlobalId,
    name: String,
    category: SkillCategory,
    spec: &SkillSpec,
    constants: &SystemConstants,
    overrides: &BTreeMap<SkillGlobalId, OverridePatch>,
) -> SkillTemplate {
    // Element derivation: attacks and executions are always physical,
    // link strikes carry no element of their own.
    let element = match category {
        SkillCategory::Attack | SkillCategory::Execution => Some("physical".to_string()),
        SkillCategory::Link => None,
        _ => spec
            .element
            .clone()
            .or_else(|| character.element.clone())
            .or_else(|| Some("physical".to_string())),
    };

    let mut template = SkillTemplate {
        global_id: global_id.clone(),
        name,
        category,
        element,
        duration: spec.duration.unwrap_or(1.0),
        cooldown: spec.cooldown.unwrap_or(0.0),
        sp_cost: 0.0,
        sp_gain: spec.sp_gain.unwrap_or(0.0),
        gauge_cost: 0.0,
        gauge_gain: spec.gauge_gain.unwrap_or(0.0),
        team_gauge_gain: spec.team_gauge_gain.unwrap_or(0.0),
        stagger: spec.stagger.unwrap_or(0.0),
        damage_ticks: spec.damage_ticks.clone(),
        anomalies: spec.anomalies.clone(),
    };

    // Category defaults for the resource columns that differ per slot.
    match category {
        SkillCategory::Skill => {
            template.sp_cost = spec.sp_cost.unwrap_or(constants.skill_sp_cost_default);
        }
        SkillCategory::Ultimate => {
            template.gauge_cost = spec
                .gauge_cost
                .or(character.ultimate_gauge_max)
                .unwrap_or(100.0);
        }
        SkillCategory::Variant => {
            template.sp_cost = spec.sp_cost.unwrap_or(0.0);
            template.gauge_cost = spec.gauge_cost.unwrap_or(0.0);
        }
        _ => {}
    }

    if let Some(patch) = overrides.get(&global_id) {
        patch.apply_to_template(&mut template);
    }

    template
}
