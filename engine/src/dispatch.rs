//! Server-side check dispatcher.
//!
//! Requests arrive as tagged JSON (`{"type": "skill", ...}`) naming actors
//! from a roster; each is resolved against the roster and rolled.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::checks::{
    resolve_opposed, skill_check, CheckOutcome, DefenseMode, Difficulty, OpposedCheckResult,
    Winner,
};
use crate::damage::{roll_damage, DamageRoll};
use crate::error::{EngineError, Result};
use crate::sheet::Investigator;
use crate::Dice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckRequest {
    Skill {
        actor: String,
        skill: String,
        #[serde(default)]
        difficulty: Difficulty,
    },
    Opposed {
        attacker: String,
        attacker_skill: String,
        defender: String,
        defender_skill: String,
        #[serde(default)]
        dodge: bool,
    },
    /// Weapon attack against Dodge (when dodging) or Fighting, with damage
    /// rolled on a win.
    Attack {
        attacker: String,
        #[serde(default)]
        weapon: Option<String>,
        defender: String,
        #[serde(default)]
        dodge: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckReport {
    Skill {
        actor: String,
        skill: String,
        difficulty: Difficulty,
        outcome: CheckOutcome,
        passed: bool,
    },
    Opposed {
        attacker: String,
        defender: String,
        result: OpposedCheckResult,
    },
    Attack {
        attacker: String,
        defender: String,
        weapon: String,
        result: OpposedCheckResult,
        damage: Option<DamageRoll>,
    },
}

fn find_actor<'a>(roster: &'a [Investigator], name: &str) -> Result<&'a Investigator> {
    roster
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| EngineError::UnknownActor(name.to_string()))
}

/// Resolve one request. Lookups happen before any die is rolled, so a bad
/// request leaves `dice` untouched.
pub fn dispatch(dice: &mut Dice, roster: &[Investigator], request: &CheckRequest) -> Result<CheckReport> {
    let report = match request {
        CheckRequest::Skill { actor, skill, difficulty } => {
            let who = find_actor(roster, actor)?;
            let value = who.skill(skill)?;
            let outcome = skill_check(dice, value);
            CheckReport::Skill {
                actor: who.name.clone(),
                skill: skill.clone(),
                difficulty: *difficulty,
                passed: outcome.meets(*difficulty),
                outcome,
            }
        }
        CheckRequest::Opposed { attacker, attacker_skill, defender, defender_skill, dodge } => {
            let att = find_actor(roster, attacker)?;
            let def = find_actor(roster, defender)?;
            let att_value = att.skill(attacker_skill)?;
            let def_value = def.skill(defender_skill)?;
            let result = resolve_opposed(dice, att_value, def_value, DefenseMode::from_dodging(*dodge));
            CheckReport::Opposed { attacker: att.name.clone(), defender: def.name.clone(), result }
        }
        CheckRequest::Attack { attacker, weapon, defender, dodge } => {
            let att = find_actor(roster, attacker)?;
            let def = find_actor(roster, defender)?;
            let weapon = match weapon {
                Some(name) => att.weapon(name)?,
                None => att.primary_weapon()?,
            };
            let defense = DefenseMode::from_dodging(*dodge);
            let def_value = match defense {
                DefenseMode::Dodge => def.skill("dodge")?,
                DefenseMode::Block => def.skill("fighting")?,
            };
            let result = resolve_opposed(dice, weapon.skill, def_value, defense);
            let damage = (result.winner == Winner::Attacker).then(|| {
                roll_damage(dice, weapon.damage, att.derived.damage_bonus, def.armor, result.partial_hit)
            });
            CheckReport::Attack {
                attacker: att.name.clone(),
                defender: def.name.clone(),
                weapon: weapon.name.clone(),
                result,
                damage,
            }
        }
    };
    info!(?request, "check dispatched");
    Ok(report)
}

/// Resolve requests in order, stopping at the first bad one.
pub fn dispatch_all(
    dice: &mut Dice,
    roster: &[Investigator],
    requests: &[CheckRequest],
) -> Result<Vec<CheckReport>> {
    requests.iter().map(|r| dispatch(dice, roster, r)).collect()
}
