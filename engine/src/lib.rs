use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

pub mod api;
pub mod attributes;
pub mod checks;
pub mod content;
pub mod damage;
pub mod derived;
pub mod dispatch;
pub mod error;
pub mod life;
pub mod notation;
pub mod sheet;

pub use attributes::{apply_age_modifiers, AgedAttributes, AttributeSet, Characteristic};
pub use checks::{
    classify, resolve_opposed, settle_opposed, skill_check, CheckOutcome, DefenseMode,
    Difficulty, OpposedCheckResult, SuccessTier, Winner,
};
pub use damage::{compute_damage, roll_damage, DamageRoll};
pub use derived::{
    damage_bonus_and_build, derive_stats, generate_attributes, move_rate, professional_points,
    CharacterStats, DerivedStats, SkillPointFormula,
};
pub use dispatch::{dispatch, CheckReport, CheckRequest};
pub use error::{EngineError, Result};
pub use notation::{DamageBonus, DiceNotation};
pub use sheet::{Investigator, Weapon};

enum Source {
    Seeded(ChaCha8Rng),
    Scripted { faces: Vec<i32>, next: usize },
}

/// Source of every die face the engine rolls.
///
/// Seeded dice are deterministic per seed; scripted dice replay a fixed
/// list of faces (cycling when exhausted), which lets callers pin exact
/// outcomes.
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    /// Seeded from the thread RNG; for callers that don't need replay.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn from_scripted(faces: Vec<i32>) -> Self {
        Self { source: Source::Scripted { faces, next: 0 } }
    }

    /// One face of a `sides`-sided die, in `1..=sides`. Side counts past
    /// `i32::MAX` roll as an `i32::MAX`-sided die.
    pub fn die(&mut self, sides: u32) -> i32 {
        let sides = i32::try_from(sides.max(1)).unwrap_or(i32::MAX);
        let face = match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=sides),
            Source::Scripted { faces, next } => {
                if faces.is_empty() {
                    1
                } else {
                    let face = faces[*next % faces.len()];
                    *next += 1;
                    face.clamp(1, sides)
                }
            }
        };
        trace!(sides, face, "die");
        face
    }

    /// Sum of `count` independent faces of a `sides`-sided die, saturating
    /// at `i32::MAX`.
    pub fn roll(&mut self, count: u32, sides: u32) -> i32 {
        (0..count).fold(0i32, |total, _| total.saturating_add(self.die(sides)))
    }

    pub fn roll_notation(&mut self, notation: DiceNotation) -> i32 {
        self.roll(notation.count, notation.sides)
    }

    /// Percentile roll, `1..=100`.
    pub fn d100(&mut self) -> i32 {
        self.die(100)
    }
}
