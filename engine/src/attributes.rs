use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Dice;

/// The nine characteristics of an investigator, on the ×5 percentile scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AttributeSet {
    pub strength: i32,
    pub constitution: i32,
    pub size: i32,
    pub dexterity: i32,
    pub appearance: i32,
    pub intelligence: i32,
    pub power: i32,
    pub education: i32,
    pub luck: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Characteristic {
    Str,
    Con,
    Siz,
    Dex,
    App,
    Int,
    Pow,
    Edu,
    Luck,
}

impl Characteristic {
    pub const ALL: [Characteristic; 9] = [
        Characteristic::Str,
        Characteristic::Con,
        Characteristic::Siz,
        Characteristic::Dex,
        Characteristic::App,
        Characteristic::Int,
        Characteristic::Pow,
        Characteristic::Edu,
        Characteristic::Luck,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            Characteristic::Str => "STR",
            Characteristic::Con => "CON",
            Characteristic::Siz => "SIZ",
            Characteristic::Dex => "DEX",
            Characteristic::App => "APP",
            Characteristic::Int => "INT",
            Characteristic::Pow => "POW",
            Characteristic::Edu => "EDU",
            Characteristic::Luck => "LUCK",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Characteristic::Str => "strength",
            Characteristic::Con => "constitution",
            Characteristic::Siz => "size",
            Characteristic::Dex => "dexterity",
            Characteristic::App => "appearance",
            Characteristic::Int => "intelligence",
            Characteristic::Pow => "power",
            Characteristic::Edu => "education",
            Characteristic::Luck => "luck",
        }
    }

    /// Matches either the abbreviation or the full name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|c| {
            c.abbreviation().eq_ignore_ascii_case(name) || c.name().eq_ignore_ascii_case(name)
        })
    }
}

impl AttributeSet {
    pub fn get(&self, c: Characteristic) -> i32 {
        match c {
            Characteristic::Str => self.strength,
            Characteristic::Con => self.constitution,
            Characteristic::Siz => self.size,
            Characteristic::Dex => self.dexterity,
            Characteristic::App => self.appearance,
            Characteristic::Int => self.intelligence,
            Characteristic::Pow => self.power,
            Characteristic::Edu => self.education,
            Characteristic::Luck => self.luck,
        }
    }

    fn get_mut(&mut self, c: Characteristic) -> &mut i32 {
        match c {
            Characteristic::Str => &mut self.strength,
            Characteristic::Con => &mut self.constitution,
            Characteristic::Siz => &mut self.size,
            Characteristic::Dex => &mut self.dexterity,
            Characteristic::App => &mut self.appearance,
            Characteristic::Int => &mut self.intelligence,
            Characteristic::Pow => &mut self.power,
            Characteristic::Edu => &mut self.education,
            Characteristic::Luck => &mut self.luck,
        }
    }

    /// Roll a fresh set: SIZ, INT and EDU are (2D6+6)×5, the rest 3D6×5.
    pub fn roll(dice: &mut Dice) -> Self {
        let strength = dice.roll(3, 6) * 5;
        let constitution = dice.roll(3, 6) * 5;
        let size = (dice.roll(2, 6) + 6) * 5;
        let dexterity = dice.roll(3, 6) * 5;
        let appearance = dice.roll(3, 6) * 5;
        let intelligence = (dice.roll(2, 6) + 6) * 5;
        let power = dice.roll(3, 6) * 5;
        let education = (dice.roll(2, 6) + 6) * 5;
        let luck = dice.roll(3, 6) * 5;
        Self {
            strength,
            constitution,
            size,
            dexterity,
            appearance,
            intelligence,
            power,
            education,
            luck,
        }
    }

    fn floor_at_zero(&mut self) {
        for c in Characteristic::ALL {
            let v = self.get_mut(c);
            *v = (*v).max(0);
        }
    }
}

/// Fixed adjustments for one age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    pub min_age: u32,
    pub max_age: u32,
    pub strength: i32,
    pub constitution: i32,
    pub size: i32,
    pub dexterity: i32,
    pub appearance: i32,
    pub education: i32,
    pub move_rate: i32,
    pub education_checks: u32,
    /// Luck is rolled twice (3D6×5) and the higher kept.
    pub reroll_luck: bool,
}

const fn band(min_age: u32, max_age: u32, deltas: [i32; 7], education_checks: u32) -> AgeBand {
    let [strength, constitution, size, dexterity, appearance, education, move_rate] = deltas;
    AgeBand {
        min_age,
        max_age,
        strength,
        constitution,
        size,
        dexterity,
        appearance,
        education,
        move_rate,
        education_checks,
        reroll_luck: false,
    }
}

//                       STR  CON  SIZ  DEX  APP  EDU  MOV
pub const AGE_BANDS: [AgeBand; 7] = [
    AgeBand { reroll_luck: true, ..band(15, 19, [-5, 0, -5, 0, 0, -5, 0], 0) },
    band(20, 39, [0, 0, 0, 0, 0, 0, 0], 1),
    band(40, 49, [-2, -2, 0, -1, -5, 0, -1], 2),
    band(50, 59, [-3, -3, 0, -4, -10, 0, -2], 3),
    band(60, 69, [-7, -7, 0, -6, -15, 0, -3], 4),
    band(70, 79, [-13, -13, 0, -14, -20, 0, -4], 4),
    band(80, 89, [-26, -26, 0, -28, -25, 0, -5], 4),
];

pub fn age_band(age: u32) -> Option<&'static AgeBand> {
    AGE_BANDS.iter().find(|b| (b.min_age..=b.max_age).contains(&age))
}

/// Attributes after age adjustment, plus the move-rate delta the band
/// imposes (applied when the move rate is derived).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgedAttributes {
    pub attributes: AttributeSet,
    pub move_rate_delta: i32,
    /// EDU gained from each successful improvement check.
    pub education_gains: Vec<i32>,
}

/// Apply the age band's deltas, luck reroll and EDU improvement checks,
/// then floor every characteristic at 0. Ages outside 15..=89 get no band
/// adjustments, only the floor.
pub fn apply_age_modifiers(dice: &mut Dice, attributes: AttributeSet, age: u32) -> AgedAttributes {
    let mut modified = attributes;
    let mut move_rate_delta = 0;
    let mut education_gains = Vec::new();

    if let Some(band) = age_band(age) {
        modified.strength = modified.strength.saturating_add(band.strength);
        modified.constitution = modified.constitution.saturating_add(band.constitution);
        modified.size = modified.size.saturating_add(band.size);
        modified.dexterity = modified.dexterity.saturating_add(band.dexterity);
        modified.appearance = modified.appearance.saturating_add(band.appearance);
        modified.education = modified.education.saturating_add(band.education);
        move_rate_delta = band.move_rate;

        if band.reroll_luck {
            let first = dice.roll(3, 6) * 5;
            let second = dice.roll(3, 6) * 5;
            modified.luck = first.max(second);
        }

        for _ in 0..band.education_checks {
            let roll = dice.d100();
            if roll > modified.education {
                let gain = dice.roll(1, 10);
                modified.education = modified.education.saturating_add(gain);
                education_gains.push(gain);
            }
        }
        debug!(age, checks = band.education_checks, gains = ?education_gains, "age modifiers applied");
    }

    modified.floor_at_zero();
    AgedAttributes { attributes: modified, move_rate_delta, education_gains }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_age_from_15_to_89_has_exactly_one_band() {
        for age in 15..=89 {
            let n = AGE_BANDS
                .iter()
                .filter(|b| (b.min_age..=b.max_age).contains(&age))
                .count();
            assert_eq!(n, 1, "age {age}");
        }
        assert!(age_band(14).is_none());
        assert!(age_band(90).is_none());
    }

    #[test]
    fn characteristic_lookup_by_name() {
        assert_eq!(Characteristic::from_name("str"), Some(Characteristic::Str));
        assert_eq!(Characteristic::from_name("Education"), Some(Characteristic::Edu));
        assert_eq!(Characteristic::from_name("Luck"), Some(Characteristic::Luck));
        assert_eq!(Characteristic::from_name("sanity"), None);
    }
}
