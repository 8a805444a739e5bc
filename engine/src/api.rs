use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::checks::{resolve_opposed, DefenseMode, OpposedCheckResult, Winner};
use crate::content::load_investigator;
use crate::damage::{roll_damage, DamageRoll};
use crate::life::{apply_damage, Health};
use crate::sheet::{Investigator, Weapon};
use crate::Dice;

const MAX_ROUNDS: u32 = 30;
const DEFAULT_DODGE_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelConfig {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub player_path: Option<String>,
    #[serde(default)]
    pub enemy_id: Option<String>,
    #[serde(default)]
    pub enemy_path: Option<String>,
    /// Player's weapon by name; defaults to the first listed.
    #[serde(default)]
    pub weapon: Option<String>,
    /// Player defends with Dodge instead of Fighting.
    #[serde(default)]
    pub player_dodges: bool,
    /// Chance (0..=1) that the enemy spends its turn preparing to dodge.
    #[serde(default)]
    pub dodge_chance: Option<f64>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelResult {
    pub winner: String,
    pub rounds: u32,
    pub player_hp_end: i32,
    pub enemy_hp_end: i32,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelStats {
    pub samples: u32,
    pub player_wins: u32,
    pub enemy_wins: u32,
    pub draws: u32,
}

/// Per-duel knobs once the combatants are loaded.
#[derive(Debug, Clone)]
pub struct DuelOptions {
    pub weapon: Option<String>,
    pub player_dodges: bool,
    pub dodge_chance: f64,
    pub max_rounds: u32,
}

impl DuelOptions {
    fn from_config(cfg: &DuelConfig) -> Self {
        Self {
            weapon: cfg.weapon.clone(),
            player_dodges: cfg.player_dodges,
            dodge_chance: cfg.dodge_chance.unwrap_or(DEFAULT_DODGE_CHANCE).clamp(0.0, 1.0),
            max_rounds: cfg.max_rounds.unwrap_or(MAX_ROUNDS),
        }
    }
}

impl Default for DuelOptions {
    fn default() -> Self {
        Self::from_config(&DuelConfig::default())
    }
}

fn load_pair(cfg: &DuelConfig) -> Result<(Investigator, Investigator)> {
    let player = load_investigator(cfg.player_id.as_deref(), cfg.player_path.as_deref())?;
    let enemy = load_investigator(cfg.enemy_id.as_deref(), cfg.enemy_path.as_deref())?;
    Ok((player, enemy))
}

pub fn simulate_duel(cfg: DuelConfig) -> Result<DuelResult> {
    let (player, enemy) = load_pair(&cfg)?;
    let opts = DuelOptions::from_config(&cfg);
    let mut dice = Dice::from_seed(cfg.seed);
    run_duel(&mut dice, &player, &enemy, &opts)
}

/// Run `samples` duels on seeds `seed`, `seed + 1`, ...
pub fn simulate_duel_many(cfg: DuelConfig, samples: u32) -> Result<DuelStats> {
    let (player, enemy) = load_pair(&cfg)?;
    let opts = DuelOptions::from_config(&cfg);
    let mut stats = DuelStats { samples, player_wins: 0, enemy_wins: 0, draws: 0 };
    for i in 0..samples {
        let mut dice = Dice::from_seed(cfg.seed.wrapping_add(i as u64));
        match run_duel(&mut dice, &player, &enemy, &opts)?.winner.as_str() {
            "player" => stats.player_wins += 1,
            "enemy" => stats.enemy_wins += 1,
            _ => stats.draws += 1,
        }
    }
    Ok(stats)
}

/// Turn-based duel. Higher DEX acts first each round (ties go to the
/// player). The enemy either attacks with a random weapon or prepares to
/// dodge the player's next attack.
pub fn run_duel(
    dice: &mut Dice,
    player: &Investigator,
    enemy: &Investigator,
    opts: &DuelOptions,
) -> Result<DuelResult> {
    let mut logs = Vec::new();

    let player_weapon = match opts.weapon.as_deref() {
        Some(name) => player.weapon(name)?,
        None => player.primary_weapon()?,
    }
    .clone();
    enemy.primary_weapon()?;

    let player_defense = DefenseMode::from_dodging(opts.player_dodges);
    let player_defense_skill = match player_defense {
        DefenseMode::Dodge => player.skill("dodge")?,
        DefenseMode::Block => player.skill("fighting")?,
    };
    let enemy_dodge_skill = enemy.skill("dodge")?;
    let enemy_fighting_skill = enemy.skill("fighting")?;
    let dodge_threshold = (opts.dodge_chance * 100.0).round() as i32;

    let mut player_health = Health::new(player.derived.hit_points);
    let mut enemy_health = Health::new(enemy.derived.hit_points);
    let mut enemy_dodging = false;
    let player_first = player.attributes.dexterity >= enemy.attributes.dexterity;

    logs.push(format!(
        "[START] {} (HP {}, {} {}) vs {} (HP {})",
        player.name, player_health.hp, player_weapon.name, player_weapon.damage, enemy.name, enemy_health.hp
    ));

    let mut rounds = 0u32;
    while rounds < opts.max_rounds && !player_health.is_down() && !enemy_health.is_down() {
        rounds += 1;
        logs.push(format!(
            "[ROUND] {} → {} acts first",
            rounds,
            if player_first { &player.name } else { &enemy.name }
        ));

        for player_turn in [player_first, !player_first] {
            if player_health.is_down() || enemy_health.is_down() {
                break;
            }
            if player_turn {
                let defense = DefenseMode::from_dodging(enemy_dodging);
                let defense_skill = if enemy_dodging { enemy_dodge_skill } else { enemy_fighting_skill };
                enemy_dodging = false;
                let result = resolve_opposed(dice, player_weapon.skill, defense_skill, defense);
                log_exchange(&mut logs, &player.name, &result);
                if result.winner == Winner::Attacker {
                    let dmg = roll_damage(
                        dice,
                        player_weapon.damage,
                        player.derived.damage_bonus,
                        enemy.armor,
                        result.partial_hit,
                    );
                    log_damage(&mut logs, &player.name, &player_weapon, &dmg);
                    apply_damage(&enemy.name, &mut enemy_health, dmg.total, |m| logs.push(m));
                }
            } else if dice.d100() <= dodge_threshold {
                enemy_dodging = true;
                logs.push(format!("[ACTION][{}] prepares to dodge", enemy.name));
            } else {
                let pick = dice.die(enemy.weapons.len() as u32) as usize - 1;
                let weapon = &enemy.weapons[pick];
                let result = resolve_opposed(dice, weapon.skill, player_defense_skill, player_defense);
                log_exchange(&mut logs, &enemy.name, &result);
                if result.winner == Winner::Attacker {
                    let dmg = roll_damage(
                        dice,
                        weapon.damage,
                        enemy.derived.damage_bonus,
                        player.armor,
                        result.partial_hit,
                    );
                    log_damage(&mut logs, &enemy.name, weapon, &dmg);
                    apply_damage(&player.name, &mut player_health, dmg.total, |m| logs.push(m));
                }
            }
        }
    }

    let winner = match (player_health.is_down(), enemy_health.is_down()) {
        (false, true) => "player",
        (true, false) => "enemy",
        _ => "draw",
    };

    logs.push(format!(
        "[END] winner={} player_hp={} enemy_hp={} rounds={}",
        winner, player_health.hp, enemy_health.hp, rounds
    ));

    Ok(DuelResult {
        winner: winner.to_string(),
        rounds,
        player_hp_end: player_health.hp,
        enemy_hp_end: enemy_health.hp,
        log: logs,
    })
}

fn log_exchange(logs: &mut Vec<String>, attacker: &str, result: &OpposedCheckResult) {
    let mark = match result.winner {
        Winner::Attacker if result.partial_hit => "½",
        Winner::Attacker => "✔",
        _ => "✖",
    };
    logs.push(format!(
        "[ATTACK][{}] vs {}: {} {}",
        attacker,
        result.defense.label(),
        result.description,
        mark
    ));
}

fn log_damage(logs: &mut Vec<String>, name: &str, weapon: &Weapon, dmg: &DamageRoll) {
    let bonus = match dmg.bonus.dice() {
        Some(d) => format!(" + {}={}", d, dmg.bonus_roll),
        None => String::new(),
    };
    let halved = if dmg.partial_hit { " (halved)" } else { "" };
    logs.push(format!(
        "[DMG][{}] {} {}={}{} − armor {} = {}{}",
        name, weapon.name, dmg.weapon, dmg.weapon_roll, bonus, dmg.armor, dmg.total, halved
    ));
}
