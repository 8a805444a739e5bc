use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::notation::{DamageBonus, DiceNotation};
use crate::Dice;

/// Breakdown of one damage roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub weapon: DiceNotation,
    pub weapon_roll: i32,
    pub bonus: DamageBonus,
    pub bonus_roll: i32,
    pub armor: i32,
    pub partial_hit: bool,
    pub total: i32,
}

/// Weapon dice plus bonus dice, less armor (floored at 0), halved on a
/// partial hit. Flat bonuses add nothing.
pub fn roll_damage(
    dice: &mut Dice,
    weapon: DiceNotation,
    bonus: DamageBonus,
    armor: i32,
    partial_hit: bool,
) -> DamageRoll {
    let weapon_roll = dice.roll_notation(weapon);
    let bonus_roll = bonus.dice().map_or(0, |d| dice.roll_notation(d));
    let mut total = weapon_roll.saturating_add(bonus_roll).saturating_sub(armor).max(0);
    if partial_hit {
        total = total.div_euclid(2);
    }
    debug!(%weapon, weapon_roll, %bonus, bonus_roll, armor, partial_hit, total, "damage");
    DamageRoll { weapon, weapon_roll, bonus, bonus_roll, armor, partial_hit, total }
}

/// String form of [`roll_damage`] for sheet data such as `("1D6", "+1D4")`.
pub fn compute_damage(
    dice: &mut Dice,
    weapon: &str,
    bonus: &str,
    armor: i32,
    partial_hit: bool,
) -> Result<i32> {
    let weapon: DiceNotation = weapon.parse()?;
    let bonus: DamageBonus = bonus.parse()?;
    Ok(roll_damage(dice, weapon, bonus, armor, partial_hit).total)
}
