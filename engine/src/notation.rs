use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// `<count>D<sides>`, e.g. `1D6` or `2D6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceNotation {
    pub count: u32,
    pub sides: u32,
}

impl DiceNotation {
    pub const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    pub fn min(&self) -> i32 {
        i32::try_from(self.count).unwrap_or(i32::MAX)
    }

    /// Highest possible total, saturating at `i32::MAX` like [`crate::Dice::roll`].
    pub fn max(&self) -> i32 {
        let sides = self.sides.min(i32::MAX as u32) as i64;
        (self.count as i64 * sides).min(i32::MAX as i64) as i32
    }
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D{}", self.count, self.sides)
    }
}

impl FromStr for DiceNotation {
    type Err = EngineError;

    /// Accepts an optional leading `+` and either case of `D`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidDice(s.to_string());
        let body = s.trim();
        let body = body.strip_prefix('+').unwrap_or(body);
        let (count, sides) = body.split_once(['D', 'd']).ok_or_else(invalid)?;
        let count: u32 = count.trim().parse().map_err(|_| invalid())?;
        let sides: u32 = sides.trim().parse().map_err(|_| invalid())?;
        if count == 0 || sides < 2 {
            return Err(invalid());
        }
        Ok(Self { count, sides })
    }
}

impl TryFrom<String> for DiceNotation {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceNotation> for String {
    fn from(value: DiceNotation) -> Self {
        value.to_string()
    }
}

/// Damage bonus as printed on the sheet: a flat value (`"0"`, `"-1"`,
/// `"-2"`) or extra dice (`"+1D4"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DamageBonus {
    Flat(i32),
    Dice(DiceNotation),
}

impl DamageBonus {
    /// Dice to add to a damage roll. Flat bonuses roll nothing.
    pub fn dice(&self) -> Option<DiceNotation> {
        match self {
            DamageBonus::Dice(d) => Some(*d),
            DamageBonus::Flat(_) => None,
        }
    }
}

impl Default for DamageBonus {
    fn default() -> Self {
        DamageBonus::Flat(0)
    }
}

impl fmt::Display for DamageBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DamageBonus::Flat(n) if *n > 0 => write!(f, "+{}", n),
            DamageBonus::Flat(n) => write!(f, "{}", n),
            DamageBonus::Dice(d) => write!(f, "+{}", d),
        }
    }
}

impl FromStr for DamageBonus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(['D', 'd']) {
            return s.parse().map(DamageBonus::Dice);
        }
        s.trim()
            .parse()
            .map(DamageBonus::Flat)
            .map_err(|_| EngineError::InvalidDice(s.to_string()))
    }
}

impl TryFrom<String> for DamageBonus {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DamageBonus> for String {
    fn from(value: DamageBonus) -> Self {
        value.to_string()
    }
}
