use clap::Parser;
use coc_engine::sheet::Investigator;
use coc_engine::{
    resolve_opposed, roll_damage, DamageBonus, DefenseMode, Dice, DiceNotation, SuccessTier,
    Winner,
};
use encoding_rs::Encoding;
use std::{fs, path::PathBuf};

#[derive(Parser)]
#[command(name = "simulate-vs")]
#[command(about = "Monte Carlo sim: repeated attacks until the defender drops")]
struct Args {
    /// Attacker skill percentage (ignored when --attacker is given)
    #[arg(long, default_value_t = 50)]
    skill: i32,

    /// Defender's Fighting (or Dodge with --dodge) percentage
    #[arg(long, default_value_t = 50)]
    defense: i32,

    /// Defender dodges instead of blocking
    #[arg(long, default_value_t = false)]
    dodge: bool,

    /// Weapon damage dice
    #[arg(long, default_value = "1D6")]
    weapon: String,

    /// Attacker damage bonus (+1D4, 0, -1, ...)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    bonus: String,

    /// Defender armor
    #[arg(long, default_value_t = 0)]
    armor: i32,

    /// Defender hit points
    #[arg(long, default_value_t = 10)]
    hp: i32,

    /// Optional attacker sheet JSON; uses its first weapon and damage bonus
    #[arg(long)]
    attacker: Option<PathBuf>,

    /// Optional defender sheet JSON; uses its HP, armor and Fighting/Dodge
    #[arg(long)]
    defender: Option<PathBuf>,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Safety cap on attacks per trial
    #[arg(long, default_value_t = 30)]
    max_rounds: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn read_sheet_auto(path: &std::path::Path) -> anyhow::Result<Investigator> {
    let text = read_text_auto(path)?;
    Ok(serde_json::from_str(&text)?)
}

struct Attack {
    skill: i32,
    dice: DiceNotation,
    bonus: DamageBonus,
}

struct Defense {
    skill: i32,
    armor: i32,
    hp: i32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mode = DefenseMode::from_dodging(args.dodge);

    let attack = match args.attacker.as_deref() {
        Some(path) => {
            let sheet = read_sheet_auto(path)?;
            let weapon = sheet.primary_weapon()?;
            Attack { skill: weapon.skill, dice: weapon.damage, bonus: sheet.derived.damage_bonus }
        }
        None => Attack {
            skill: args.skill,
            dice: args.weapon.parse()?,
            bonus: args.bonus.parse()?,
        },
    };

    let defense = match args.defender.as_deref() {
        Some(path) => {
            let sheet = read_sheet_auto(path)?;
            let skill = if args.dodge { sheet.skill("dodge")? } else { sheet.skill("fighting")? };
            Defense { skill, armor: sheet.armor, hp: sheet.derived.hit_points }
        }
        None => Defense { skill: args.defense, armor: args.armor, hp: args.hp },
    };

    // Stats
    let mut wins = 0u32;
    let mut exchanges = 0u32;
    let mut hits = 0u32;
    let mut partials = 0u32;
    let mut crits = 0u32;
    let mut fumbles = 0u32;
    let mut stalemates = 0u32;
    let mut dmg_total_on_hits = 0i64;
    let mut rounds_vec: Vec<u32> = Vec::with_capacity(args.trials as usize);

    for i in 0..args.trials {
        let mut hp = defense.hp;
        let mut rounds = 0u32;
        let mut dice = Dice::from_seed(args.seed.wrapping_add(i as u64));

        while rounds < args.max_rounds && hp > 0 {
            rounds += 1;
            exchanges += 1;
            let res = resolve_opposed(&mut dice, attack.skill, defense.skill, mode);
            match res.attacker.tier {
                SuccessTier::CriticalSuccess => crits += 1,
                SuccessTier::CriticalFailure => fumbles += 1,
                _ => {}
            }
            match res.winner {
                Winner::Attacker => {
                    let dmg = roll_damage(&mut dice, attack.dice, attack.bonus, defense.armor, res.partial_hit);
                    hits += 1;
                    if res.partial_hit {
                        partials += 1;
                    }
                    dmg_total_on_hits += dmg.total as i64;
                    hp = (hp - dmg.total).max(0);
                }
                Winner::None => stalemates += 1,
                Winner::Defender => {}
            }
        }

        if hp <= 0 {
            wins += 1;
            rounds_vec.push(rounds);
        }
    }

    rounds_vec.sort_unstable();
    let rate = |n: u32, of: u32| if of == 0 { 0.0 } else { n as f64 / of as f64 * 100.0 };
    let avg_dmg_per_hit = if hits == 0 { 0.0 } else { dmg_total_on_hits as f64 / hits as f64 };
    let avg_rounds = if rounds_vec.is_empty() {
        0.0
    } else {
        rounds_vec.iter().map(|&r| r as u64).sum::<u64>() as f64 / rounds_vec.len() as f64
    };
    let median_rounds = if rounds_vec.is_empty() {
        0
    } else {
        let m = rounds_vec.len() / 2;
        if rounds_vec.len() % 2 == 1 {
            rounds_vec[m]
        } else {
            (rounds_vec[m - 1] + rounds_vec[m]) / 2
        }
    };

    println!("simulate-vs results");
    println!("-------------------");
    println!("trials:             {}", args.trials);
    println!(
        "attack:             {}% [{} {}]",
        attack.skill, attack.dice, attack.bonus
    );
    println!(
        "defense:            {}% {} (armor {}, HP {})",
        defense.skill,
        mode.label(),
        defense.armor,
        defense.hp
    );
    println!();
    println!("drop rate:          {:.1}%", rate(wins, args.trials));
    println!("hit rate:           {:.1}%", rate(hits, exchanges));
    println!("partial-hit rate:   {:.1}%", rate(partials, hits));
    println!("stalemate rate:     {:.1}%", rate(stalemates, exchanges));
    println!("critical rate:      {:.1}%", rate(crits, exchanges));
    println!("fumble rate:        {:.1}%", rate(fumbles, exchanges));
    println!("avg dmg per hit:    {:.2}", avg_dmg_per_hit);
    println!("avg rounds (drops): {:.2}", avg_rounds);
    println!("median rounds:      {}", median_rounds);

    Ok(())
}
