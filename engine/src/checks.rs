use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Dice;

/// Success grades, declared worst to best so `Ord` follows desirability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessTier {
    CriticalFailure,
    Failure,
    RegularSuccess,
    HardSuccess,
    ExtremeSuccess,
    CriticalSuccess,
}

impl SuccessTier {
    pub fn is_success(self) -> bool {
        self >= SuccessTier::RegularSuccess
    }

    /// Rank used when both sides of an opposed check succeed. Criticals rank
    /// 0 here; they are settled before ranks are compared.
    pub fn rank(self) -> u8 {
        match self {
            SuccessTier::ExtremeSuccess => 3,
            SuccessTier::HardSuccess => 2,
            SuccessTier::RegularSuccess => 1,
            _ => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SuccessTier::CriticalSuccess => "critical success",
            SuccessTier::ExtremeSuccess => "extreme success",
            SuccessTier::HardSuccess => "hard success",
            SuccessTier::RegularSuccess => "regular success",
            SuccessTier::Failure => "failure",
            SuccessTier::CriticalFailure => "critical failure",
        }
    }
}

impl fmt::Display for SuccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One percentile roll judged against one skill value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub roll: i32,
    pub threshold: i32,
    pub tier: SuccessTier,
    pub success: bool,
}

impl CheckOutcome {
    /// Whether the outcome clears the tier a difficulty demands.
    pub fn meets(&self, difficulty: Difficulty) -> bool {
        self.success && self.tier >= difficulty.required_tier()
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (D100={})", self.tier, self.roll)
    }
}

/// Classify `roll` against `threshold`.
///
/// A 1 is always a critical success and a 100 always a critical failure,
/// whatever the threshold. Otherwise the fifth and half thresholds are
/// floored before comparison.
pub fn classify(roll: i32, threshold: i32) -> CheckOutcome {
    let tier = if roll == 1 {
        SuccessTier::CriticalSuccess
    } else if roll == 100 {
        SuccessTier::CriticalFailure
    } else if roll <= threshold.div_euclid(5) {
        SuccessTier::ExtremeSuccess
    } else if roll <= threshold.div_euclid(2) {
        SuccessTier::HardSuccess
    } else if roll <= threshold {
        SuccessTier::RegularSuccess
    } else {
        SuccessTier::Failure
    };
    CheckOutcome { roll, threshold, tier, success: tier.is_success() }
}

/// Roll a fresh percentile die and classify it.
pub fn skill_check(dice: &mut Dice, threshold: i32) -> CheckOutcome {
    let outcome = classify(dice.d100(), threshold);
    debug!(threshold, roll = outcome.roll, tier = %outcome.tier, "skill check");
    outcome
}

/// How hard a single unopposed check is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Regular,
    Hard,
    Extreme,
}

impl Difficulty {
    pub fn required_tier(self) -> SuccessTier {
        match self {
            Difficulty::Regular => SuccessTier::RegularSuccess,
            Difficulty::Hard => SuccessTier::HardSuccess,
            Difficulty::Extreme => SuccessTier::ExtremeSuccess,
        }
    }
}

/// How the defender meets an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseMode {
    Dodge,
    /// Blocking or parrying, i.e. fighting back.
    #[default]
    Block,
}

impl DefenseMode {
    pub fn from_dodging(dodging: bool) -> Self {
        if dodging { DefenseMode::Dodge } else { DefenseMode::Block }
    }

    pub fn label(self) -> &'static str {
        match self {
            DefenseMode::Dodge => "dodge",
            DefenseMode::Block => "block",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Attacker,
    Defender,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpposedCheckResult {
    pub winner: Winner,
    pub attacker: CheckOutcome,
    pub defender: CheckOutcome,
    pub defense: DefenseMode,
    pub description: String,
    /// Attacker won an evenly matched exchange against a block; damage is halved.
    pub partial_hit: bool,
}

/// Roll attacker then defender and settle the contest.
pub fn resolve_opposed(
    dice: &mut Dice,
    attacker_skill: i32,
    defender_skill: i32,
    defense: DefenseMode,
) -> OpposedCheckResult {
    let attacker = classify(dice.d100(), attacker_skill);
    let defender = classify(dice.d100(), defender_skill);
    let result = settle_opposed(attacker, defender, defense);
    debug!(
        attacker = %result.attacker,
        defender = %result.defender,
        defense = result.defense.label(),
        winner = ?result.winner,
        partial_hit = result.partial_hit,
        "opposed check"
    );
    result
}

/// Settle an opposed check from two already-classified rolls.
///
/// Order matters: double failure, then natural 1s, then 100s, then plain
/// failures, then tier ranks, then the dodge/block tie-break.
pub fn settle_opposed(
    attacker: CheckOutcome,
    defender: CheckOutcome,
    defense: DefenseMode,
) -> OpposedCheckResult {
    let d = defense.label();
    let (winner, partial_hit, description) = if !attacker.success && !defender.success {
        (
            Winner::None,
            false,
            format!("Attacker {attacker}, defender {defender}: both sides fail!"),
        )
    } else if attacker.roll == 1 && defender.roll != 1 {
        (
            Winner::Attacker,
            false,
            format!("Attacker rolls a critical success! Defender {defender}"),
        )
    } else if defender.roll == 1 && attacker.roll != 1 {
        (
            Winner::Defender,
            false,
            format!("Defender rolls a critical success, a perfect {d}! Attacker {attacker}"),
        )
    } else if attacker.roll == 100 && defender.roll != 100 {
        (
            Winner::Defender,
            false,
            format!("Attacker fumbles! Defender {defender}"),
        )
    } else if defender.roll == 100 && attacker.roll != 100 {
        (
            Winner::Attacker,
            false,
            format!("Defender fumbles, the {d} falls apart! Attacker {attacker}"),
        )
    } else if !attacker.success {
        (
            Winner::Defender,
            false,
            format!("Attack {attacker}, the {d} holds!"),
        )
    } else if !defender.success {
        (
            Winner::Attacker,
            false,
            format!("Attack {attacker}, {d} {defender} fails!"),
        )
    } else {
        let (a, b) = (attacker.tier.rank(), defender.tier.rank());
        if a > b {
            (
                Winner::Attacker,
                false,
                format!("Attack {attacker} beats defender's {defender}, the {d} fails!"),
            )
        } else if b > a {
            (
                Winner::Defender,
                false,
                format!("Defense {defender} beats attacker's {attacker}, the {d} succeeds!"),
            )
        } else if defense == DefenseMode::Dodge {
            (
                Winner::Defender,
                false,
                "Attack and dodge are evenly matched, the dodge succeeds!".to_string(),
            )
        } else {
            (
                Winner::Attacker,
                true,
                "Attack and block are evenly matched, the attack partially lands!".to_string(),
            )
        }
    };

    OpposedCheckResult { winner, attacker, defender, defense, description, partial_hit }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_order_by_desirability() {
        use SuccessTier::*;
        let ordered = [CriticalFailure, Failure, RegularSuccess, HardSuccess, ExtremeSuccess, CriticalSuccess];
        assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn difficulty_gates_on_tier() {
        let hard = classify(30, 60);
        assert_eq!(hard.tier, SuccessTier::HardSuccess);
        assert!(hard.meets(Difficulty::Regular));
        assert!(hard.meets(Difficulty::Hard));
        assert!(!hard.meets(Difficulty::Extreme));
        assert!(!classify(100, 60).meets(Difficulty::Regular));
    }
}
