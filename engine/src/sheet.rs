use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeSet, Characteristic};
use crate::content::{CreditRange, Profession};
use crate::derived::{CharacterStats, DerivedStats};
use crate::error::{EngineError, Result};
use crate::notation::DiceNotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDef {
    pub key: &'static str,
    pub label: &'static str,
    pub base: i32,
}

const fn skill(key: &'static str, label: &'static str, base: i32) -> SkillDef {
    SkillDef { key, label, base }
}

/// Ceiling for any skill raised during character creation.
pub const MAX_SKILL_VALUE: i32 = 90;

/// Every skill an investigator can allocate points to, with its base value.
pub const SKILLS: &[SkillDef] = &[
    skill("fighting", "Fighting", 25),
    skill("firearms", "Firearms", 20),
    skill("dodge", "Dodge", 20),
    skill("mechanics", "Mechanics", 10),
    skill("drive", "Drive", 20),
    skill("stealth", "Stealth", 20),
    skill("investigate", "Investigate", 25),
    skill("sleightOfHand", "Sleight of Hand", 10),
    skill("electronics", "Electronics", 10),
    skill("history", "History", 10),
    skill("science", "Science", 10),
    skill("medicine", "Medicine", 5),
    skill("occult", "Occult", 5),
    skill("library", "Library Use", 20),
    skill("art", "Art", 5),
    skill("persuade", "Persuade", 15),
    skill("psychology", "Psychology", 10),
];

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn find_skill(name: &str) -> Option<&'static SkillDef> {
    let wanted = normalize(name);
    SKILLS
        .iter()
        .find(|s| normalize(s.key) == wanted || normalize(s.label) == wanted)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: DiceNotation,
    /// Attack skill percentage used with this weapon.
    pub skill: i32,
}

impl Weapon {
    /// Bare fists: 1D3 on the Fighting skill.
    pub fn unarmed(fighting: i32) -> Self {
        Self { name: "Fist".to_string(), damage: DiceNotation::new(1, 3), skill: fighting }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Investigator {
    pub name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub profession: Option<String>,
    pub attributes: AttributeSet,
    pub derived: DerivedStats,
    /// Skills raised above their base value, in sheet order.
    #[serde(default)]
    pub skills: IndexMap<String, i32>,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub credit_rating: i32,
}

impl Investigator {
    /// A fresh sheet: no allocated skills, armed with fists.
    pub fn from_stats(name: impl Into<String>, stats: CharacterStats, profession: Option<&str>) -> Self {
        let fighting = find_skill("fighting").map_or(0, |s| s.base);
        Self {
            name: name.into(),
            age: stats.age,
            profession: profession.map(str::to_string),
            attributes: stats.attributes,
            derived: stats.derived,
            skills: IndexMap::new(),
            weapons: vec![Weapon::unarmed(fighting)],
            armor: 0,
            credit_rating: 0,
        }
    }

    /// Skill value by name: allocated value, else catalogue base, else a
    /// characteristic (STR, EDU, ...) or SAN.
    pub fn skill(&self, name: &str) -> Result<i32> {
        let wanted = normalize(name);
        let def = find_skill(name);
        let allocated = self.skills.iter().find(|(k, _)| {
            let k = normalize(k);
            k == wanted || def.is_some_and(|d| k == normalize(d.label) || k == normalize(d.key))
        });
        if let Some((_, v)) = allocated {
            return Ok(*v);
        }
        if let Some(def) = def {
            return Ok(def.base);
        }
        if let Some(c) = Characteristic::from_name(name) {
            return Ok(self.attributes.get(c));
        }
        if wanted == "san" || wanted == "sanity" {
            return Ok(self.derived.sanity);
        }
        if wanted == "creditrating" {
            return Ok(self.credit_rating);
        }
        Err(EngineError::UnknownSkill(name.to_string()))
    }

    pub fn weapon(&self, name: &str) -> Result<&Weapon> {
        self.weapons
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| EngineError::UnknownWeapon {
                actor: self.name.clone(),
                weapon: name.to_string(),
            })
    }

    pub fn primary_weapon(&self) -> Result<&Weapon> {
        self.weapons.first().ok_or_else(|| EngineError::Unarmed(self.name.clone()))
    }

    /// Raise a catalogue skill by up to `points`, capped at
    /// [`MAX_SKILL_VALUE`]. Occupation skills draw on the professional pool,
    /// everything else on interest points; only the points the cap lets
    /// through are spent. Returns the new value.
    pub fn allocate_skill(
        &mut self,
        name: &str,
        points: i32,
        profession: Option<&Profession>,
        pool: &mut SkillPool,
    ) -> Result<i32> {
        let def = find_skill(name).ok_or_else(|| EngineError::UnknownSkill(name.to_string()))?;
        let source = PointSource::for_skill(def, profession);
        let current = self.skill(def.label)?;
        let value = raise_capped(current, points, MAX_SKILL_VALUE, source, pool)?;
        if value != current {
            self.skills.insert(def.label.to_string(), value);
        }
        Ok(value)
    }

    /// Raise Credit Rating by up to `points` from the chosen pool, capped at
    /// the top of `range`.
    pub fn raise_credit_rating(
        &mut self,
        points: i32,
        source: PointSource,
        range: &CreditRange,
        pool: &mut SkillPool,
    ) -> Result<i32> {
        self.credit_rating = raise_capped(self.credit_rating, points, range.max, source, pool)?;
        Ok(self.credit_rating)
    }

    /// A sheet is finished once every occupation skill sits above its base,
    /// Credit Rating is inside the occupation's band and no interest points
    /// remain.
    pub fn validate_allocation(&self, profession: &Profession, pool: &SkillPool) -> Result<()> {
        for label in &profession.skills {
            let def = find_skill(label).ok_or_else(|| EngineError::UnknownSkill(label.clone()))?;
            if self.skill(def.label)? <= def.base {
                return Err(EngineError::SkillNotRaised(def.label.to_string()));
            }
        }
        let range = profession.credit_rating;
        if !range.contains(self.credit_rating) {
            return Err(EngineError::CreditOutOfRange {
                value: self.credit_rating,
                min: range.min,
                max: range.max,
            });
        }
        if pool.interest != 0 {
            return Err(EngineError::InterestUnspent(pool.interest));
        }
        Ok(())
    }
}

fn raise_capped(
    current: i32,
    points: i32,
    cap: i32,
    source: PointSource,
    pool: &mut SkillPool,
) -> Result<i32> {
    if points < 0 {
        return Err(EngineError::PointsExhausted {
            requested: points,
            available: pool.available(source),
        });
    }
    let value = current.saturating_add(points).min(cap).max(current);
    pool.spend(source, value - current)?;
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    Professional,
    Interest,
}

impl PointSource {
    /// The pool a skill is paid from: professional points for the
    /// occupation's own skills, interest points otherwise.
    pub fn for_skill(skill: &SkillDef, profession: Option<&Profession>) -> Self {
        if profession.is_some_and(|p| p.lists_skill(skill)) {
            PointSource::Professional
        } else {
            PointSource::Interest
        }
    }
}

/// Unspent skill points left from character generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillPool {
    pub professional: i32,
    pub interest: i32,
}

impl SkillPool {
    pub fn for_stats(derived: &DerivedStats) -> Self {
        Self {
            professional: derived.professional_points,
            interest: derived.interest_points,
        }
    }

    pub fn available(&self, source: PointSource) -> i32 {
        match source {
            PointSource::Professional => self.professional,
            PointSource::Interest => self.interest,
        }
    }

    pub fn spend(&mut self, source: PointSource, points: i32) -> Result<()> {
        let available = match source {
            PointSource::Professional => &mut self.professional,
            PointSource::Interest => &mut self.interest,
        };
        if points < 0 || points > *available {
            return Err(EngineError::PointsExhausted { requested: points, available: *available });
        }
        *available -= points;
        Ok(())
    }
}
