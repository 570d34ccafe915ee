//! Game data configuration — system constants and the character roster.
//!
//! RULE: Skill data is an explicit per-category schema. No code anywhere
//! concatenates category names into field lookups; everything resolves
//! through `SkillCategory` and `SkillSpec`.

use crate::types::{OperatorId, Time};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Process-wide tunables, persisted per project and overridable from a
/// loaded game-data document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemConstants {
    pub max_sp: f64,
    pub initial_sp: f64,
    pub sp_regen_rate: f64,
    pub skill_sp_cost_default: f64,
    pub max_stagger: f64,
}

impl Default for SystemConstants {
    fn default() -> Self {
        Self {
            max_sp: 300.0,
            initial_sp: 200.0,
            sp_regen_rate: 8.0,
            skill_sp_cost_default: 100.0,
            max_stagger: 100.0,
        }
    }
}

/// The five base skill slots every character has, plus free-form variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Attack,
    Execution,
    Skill,
    Link,
    Ultimate,
    Variant,
}

impl SkillCategory {
    /// The five slots present on every character, in display order.
    pub const BASE: [SkillCategory; 5] = [
        SkillCategory::Attack,
        SkillCategory::Execution,
        SkillCategory::Skill,
        SkillCategory::Link,
        SkillCategory::Ultimate,
    ];

    /// Suffix appended to the operator id to form the global skill id.
    pub fn suffix(&self) -> &'static str {
        match self {
            SkillCategory::Attack => "attack",
            SkillCategory::Execution => "execution",
            SkillCategory::Skill => "skill",
            SkillCategory::Link => "link",
            SkillCategory::Ultimate => "ultimate",
            SkillCategory::Variant => "variant",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillCategory::Attack => "Heavy Attack",
            SkillCategory::Execution => "Execution",
            SkillCategory::Skill => "Battle Skill",
            SkillCategory::Link => "Link Strike",
            SkillCategory::Ultimate => "Ultimate",
            SkillCategory::Variant => "Variant",
        }
    }
}

/// A single damage tick inside a skill, relative to the action's start.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DamageTick {
    pub offset: Time,
    pub sp: f64,
    pub stagger: f64,
}

/// One cell of a skill's effect grid, as declared in game data.
/// Placed instances carry `EffectCell`, which adds the stable id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectCellSpec {
    pub offset: Time,
    pub kind: String,
    pub stagger: f64,
}

/// Per-category skill numbers for one character. Every field is optional;
/// category defaults are filled in by the template builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillSpec {
    pub duration: Option<Time>,
    pub cooldown: Option<Time>,
    pub element: Option<String>,
    pub sp_cost: Option<f64>,
    pub sp_gain: Option<f64>,
    pub gauge_cost: Option<f64>,
    pub gauge_gain: Option<f64>,
    pub team_gauge_gain: Option<f64>,
    pub stagger: Option<f64>,
    pub damage_ticks: Vec<DamageTick>,
    pub anomalies: Vec<Vec<EffectCellSpec>>,
}

/// An extra, named skill outside the five base slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSpec {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub spec: SkillSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub id: OperatorId,
    pub name: String,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub rarity: u8,
    /// Default full charge of the ultimate gauge. Last fallback for the
    /// per-track gauge ceiling.
    #[serde(default)]
    pub ultimate_gauge_max: Option<f64>,
    /// True when this character does not receive team gauge from allies.
    #[serde(default)]
    pub team_gauge_opt_out: bool,
    #[serde(default)]
    pub skills: BTreeMap<SkillCategory, SkillSpec>,
    #[serde(default)]
    pub variants: Vec<VariantSpec>,
}

/// The static game database: constants plus the full roster.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameData {
    pub system_constants: SystemConstants,
    pub character_roster: Vec<CharacterData>,
}

impl GameData {
    /// Load game data from a JSON document on disk.
    /// The roster is sorted by rarity descending, highest first.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading game data from {path}"))?;
        let mut data: GameData =
            serde_json::from_str(&raw).with_context(|| format!("parsing game data {path}"))?;
        data.character_roster.sort_by(|a, b| b.rarity.cmp(&a.rarity));
        Ok(data)
    }

    /// A small fixed roster with known numbers, used throughout the tests.
    pub fn default_test() -> Self {
        let mut lena_skills = BTreeMap::new();
        lena_skills.insert(
            SkillCategory::Attack,
            SkillSpec {
                duration: Some(1.0),
                sp_gain: Some(10.0),
                stagger: Some(5.0),
                ..Default::default()
            },
        );
        lena_skills.insert(
            SkillCategory::Execution,
            SkillSpec {
                duration: Some(1.5),
                sp_gain: Some(15.0),
                ..Default::default()
            },
        );
        lena_skills.insert(
            SkillCategory::Skill,
            SkillSpec {
                duration: Some(2.0),
                sp_gain: Some(20.0),
                team_gauge_gain: Some(10.0),
                stagger: Some(10.0),
                damage_ticks: vec![DamageTick {
                    offset: 0.5,
                    sp: 5.0,
                    stagger: 2.0,
                }],
                anomalies: vec![vec![
                    EffectCellSpec {
                        offset: 0.5,
                        kind: "cold_attach".into(),
                        stagger: 5.0,
                    },
                    EffectCellSpec {
                        offset: 1.5,
                        kind: "cold_burst".into(),
                        stagger: 8.0,
                    },
                ]],
                ..Default::default()
            },
        );
        lena_skills.insert(
            SkillCategory::Link,
            SkillSpec {
                duration: Some(1.0),
                sp_gain: Some(8.0),
                gauge_gain: Some(10.0),
                ..Default::default()
            },
        );
        lena_skills.insert(
            SkillCategory::Ultimate,
            SkillSpec {
                duration: Some(3.0),
                gauge_gain: Some(0.0),
                stagger: Some(30.0),
                ..Default::default()
            },
        );

        let mut marcel_skills = BTreeMap::new();
        marcel_skills.insert(
            SkillCategory::Attack,
            SkillSpec {
                duration: Some(1.0),
                sp_gain: Some(8.0),
                stagger: Some(4.0),
                ..Default::default()
            },
        );
        marcel_skills.insert(
            SkillCategory::Skill,
            SkillSpec {
                duration: Some(1.5),
                sp_cost: Some(80.0),
                stagger: Some(15.0),
                team_gauge_gain: Some(20.0),
                ..Default::default()
            },
        );
        marcel_skills.insert(
            SkillCategory::Ultimate,
            SkillSpec {
                duration: Some(2.5),
                ..Default::default()
            },
        );

        Self {
            system_constants: SystemConstants::default(),
            character_roster: vec![
                CharacterData {
                    id: "lena".into(),
                    name: "Lena".into(),
                    element: Some("cold".into()),
                    rarity: 6,
                    ultimate_gauge_max: Some(100.0),
                    team_gauge_opt_out: false,
                    skills: lena_skills,
                    variants: vec![VariantSpec {
                        id: "frost_field".into(),
                        name: "Frost Field".into(),
                        spec: SkillSpec {
                            duration: Some(4.0),
                            stagger: Some(12.0),
                            ..Default::default()
                        },
                    }],
                },
                CharacterData {
                    id: "marcel".into(),
                    name: "Marcel".into(),
                    element: Some("blaze".into()),
                    rarity: 5,
                    ultimate_gauge_max: Some(120.0),
                    team_gauge_opt_out: false,
                    skills: marcel_skills,
                    variants: Vec::new(),
                },
                CharacterData {
                    id: "yvonne".into(),
                    name: "Yvonne".into(),
                    element: Some("emag".into()),
                    rarity: 5,
                    ultimate_gauge_max: Some(100.0),
                    team_gauge_opt_out: true,
                    skills: BTreeMap::new(),
                    variants: Vec::new(),
                },
                CharacterData {
                    id: "quentin".into(),
                    name: "Quentin".into(),
                    element: Some("nature".into()),
                    rarity: 4,
                    ultimate_gauge_max: Some(100.0),
                    team_gauge_opt_out: false,
                    skills: BTreeMap::new(),
                    variants: Vec::new(),
                },
            ],
        }
    }
}
