use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attributes::{apply_age_modifiers, AttributeSet};
use crate::notation::{DamageBonus, DiceNotation};
use crate::Dice;

/// Professional skill points granted when a profession names a formula
/// this table doesn't know.
pub const FALLBACK_PROFESSIONAL_POINTS: i32 = 200;

/// Secondary statistics, recomputed from the attributes whenever they change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DerivedStats {
    pub damage_bonus: DamageBonus,
    pub build: i32,
    pub move_rate: i32,
    pub hit_points: i32,
    #[serde(default)]
    pub magic_points: i32,
    pub sanity: i32,
    #[serde(default)]
    pub professional_points: i32,
    #[serde(default)]
    pub interest_points: i32,
}

/// Damage bonus and build from STR + SIZ.
pub fn damage_bonus_and_build(strength: i32, size: i32) -> (DamageBonus, i32) {
    let d6 = |n| DamageBonus::Dice(DiceNotation::new(n, 6));
    match strength.saturating_add(size) {
        2..=64 => (DamageBonus::Flat(-2), -2),
        65..=84 => (DamageBonus::Flat(-1), -1),
        85..=124 => (DamageBonus::Flat(0), 0),
        125..=164 => (DamageBonus::Dice(DiceNotation::new(1, 4)), 1),
        165..=204 => (d6(1), 2),
        205..=284 => (d6(2), 3),
        285..=364 => (d6(3), 4),
        365..=444 => (d6(4), 5),
        445..=524 => (d6(5), 6),
        total if total > 524 => {
            // One more D6 and one more build per full 80 points past 524.
            let extra = (total - 524) / 80;
            (d6(5 + extra as u32), 6 + extra)
        }
        _ => (DamageBonus::Flat(0), 0),
    }
}

/// Base move rate: 8 when either STR or DEX equals SIZ, 9 when both exceed
/// it, 7 when both fall short, otherwise 8.
pub fn move_rate(strength: i32, dexterity: i32, size: i32) -> i32 {
    if strength == size || dexterity == size {
        8
    } else if strength > size && dexterity > size {
        9
    } else if strength < size && dexterity < size {
        7
    } else {
        8
    }
}

/// Linear combination of characteristics a profession spends on its skills.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SkillPointFormula {
    Edu4,
    EduLuck,
    EduDex,
    EduApp,
    EduPow,
    EduStr,
    PowStr,
    DexStr,
    /// Kept verbatim so it can be written back out.
    Unrecognized(String),
}

impl SkillPointFormula {
    pub fn from_tag(tag: &str) -> Self {
        let normalized: String = tag
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '*' { '×' } else { c.to_ascii_uppercase() })
            .collect();
        match normalized.as_str() {
            "EDU×4" => Self::Edu4,
            "EDU×2+LUCK×2" => Self::EduLuck,
            "EDU×2+DEX×2" => Self::EduDex,
            "EDU×2+APP×2" => Self::EduApp,
            "EDU×2+POW×2" => Self::EduPow,
            "EDU×2+STR×2" => Self::EduStr,
            "POW×2+STR×2" => Self::PowStr,
            "DEX×2+STR×2" => Self::DexStr,
            _ => Self::Unrecognized(tag.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Edu4 => "EDU × 4",
            Self::EduLuck => "EDU × 2 + LUCK × 2",
            Self::EduDex => "EDU × 2 + DEX × 2",
            Self::EduApp => "EDU × 2 + APP × 2",
            Self::EduPow => "EDU × 2 + POW × 2",
            Self::EduStr => "EDU × 2 + STR × 2",
            Self::PowStr => "POW × 2 + STR × 2",
            Self::DexStr => "DEX × 2 + STR × 2",
            Self::Unrecognized(tag) => tag,
        }
    }

    pub fn points(&self, a: &AttributeSet) -> i32 {
        let doubled = |x: i32, y: i32| x.saturating_mul(2).saturating_add(y.saturating_mul(2));
        match self {
            Self::Edu4 => a.education.saturating_mul(4),
            Self::EduLuck => doubled(a.education, a.luck),
            Self::EduDex => doubled(a.education, a.dexterity),
            Self::EduApp => doubled(a.education, a.appearance),
            Self::EduPow => doubled(a.education, a.power),
            Self::EduStr => doubled(a.education, a.strength),
            Self::PowStr => doubled(a.power, a.strength),
            Self::DexStr => doubled(a.dexterity, a.strength),
            Self::Unrecognized(_) => FALLBACK_PROFESSIONAL_POINTS,
        }
    }
}

impl fmt::Display for SkillPointFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl From<String> for SkillPointFormula {
    fn from(value: String) -> Self {
        Self::from_tag(&value)
    }
}

impl From<SkillPointFormula> for String {
    fn from(value: SkillPointFormula) -> Self {
        value.tag().to_string()
    }
}

/// Without a profession there are no professional points to spend.
pub fn professional_points(attributes: &AttributeSet, formula: Option<&SkillPointFormula>) -> i32 {
    formula.map_or(0, |f| f.points(attributes))
}

/// Derived statistics for already-aged attributes. `move_rate_delta` is the
/// age band's adjustment; the result never drops below 0.
pub fn derive_stats(
    attributes: &AttributeSet,
    move_rate_delta: i32,
    formula: Option<&SkillPointFormula>,
) -> DerivedStats {
    let (damage_bonus, build) = damage_bonus_and_build(attributes.strength, attributes.size);
    let base_move = move_rate(attributes.strength, attributes.dexterity, attributes.size);
    DerivedStats {
        damage_bonus,
        build,
        move_rate: base_move.saturating_add(move_rate_delta).max(0),
        hit_points: attributes.constitution.saturating_add(attributes.size).div_euclid(10),
        magic_points: attributes.power.div_euclid(5),
        sanity: attributes.power,
        professional_points: professional_points(attributes, formula),
        interest_points: attributes.intelligence.saturating_mul(2),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub age: u32,
    pub attributes: AttributeSet,
    pub derived: DerivedStats,
}

/// Roll a new investigator's characteristics, age them and derive the rest.
pub fn generate_attributes(
    dice: &mut Dice,
    age: u32,
    formula: Option<&SkillPointFormula>,
) -> CharacterStats {
    let rolled = AttributeSet::roll(dice);
    let aged = apply_age_modifiers(dice, rolled, age);
    let derived = derive_stats(&aged.attributes, aged.move_rate_delta, formula);
    debug!(age, hp = derived.hit_points, db = %derived.damage_bonus, "generated attributes");
    CharacterStats { age, attributes: aged.attributes, derived }
}
