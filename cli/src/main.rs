use clap::{Parser, Subcommand};
use coc_engine::api::{simulate_duel, DuelConfig};
use coc_engine::content::{builtin_professions, find_profession};
use coc_engine::sheet::Investigator;
use coc_engine::{
    compute_damage, generate_attributes, resolve_opposed, skill_check, DefenseMode, DiceNotation,
    Dice, Winner,
};
use tracing::Level;

#[derive(Subcommand)]
enum Cmd {
    /// Roll dice in <count>D<sides> notation, e.g. 3D6
    Roll {
        /// Dice to roll
        notation: String,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
        /// Number of rolls
        #[arg(long, default_value_t = 1)]
        rolls: u32,
    },
    /// Roll a percentile check against a skill value
    Check {
        /// Skill percentage
        #[arg(long)]
        skill: i32,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Opposed check: attacker skill vs defender skill
    Opposed {
        #[arg(long)]
        attacker: i32,
        #[arg(long)]
        defender: i32,
        /// Defender dodges instead of blocking
        #[arg(long, default_value_t = false)]
        dodge: bool,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Roll weapon damage with a damage bonus and armor
    Damage {
        /// Weapon dice, e.g. 1D6
        #[arg(long)]
        weapon: String,
        /// Damage bonus, e.g. +1D4 or 0
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        bonus: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        armor: i32,
        /// Halve the damage (evenly matched attack against a block)
        #[arg(long, default_value_t = false)]
        partial: bool,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate an investigator's characteristics and derived stats
    Generate {
        #[arg(long, default_value_t = 25)]
        age: u32,
        /// Profession title (see `professions`)
        #[arg(long)]
        profession: Option<String>,
        /// Name on the generated sheet
        #[arg(long, default_value = "Investigator")]
        name: String,
        /// Emit the full sheet as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// RNG seed for determinism
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List builtin professions and their skill-point formulas
    Professions,
    /// Duel two investigators (builtin ids or JSON files)
    Duel {
        #[arg(long, default_value = "jack_bunce")]
        player: String,
        #[arg(long, default_value = "mary_lake")]
        enemy: String,
        /// Treat --player/--enemy as file paths
        #[arg(long, default_value_t = false)]
        files: bool,
        /// Player's weapon by name
        #[arg(long)]
        weapon: Option<String>,
        /// Player defends with Dodge
        #[arg(long, default_value_t = false)]
        player_dodges: bool,
        /// Enemy's chance (0..=1) to prepare a dodge instead of attacking
        #[arg(long)]
        dodge_chance: Option<f64>,
        #[arg(long, default_value_t = 2025)]
        seed: u64,
    },
}

#[derive(Parser)]
#[command(name = "coc")]
#[command(about = "Call of Cthulhu rules harness")]
struct Cli {
    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn dice_for(seed: Option<u64>) -> Dice {
    seed.map_or_else(Dice::from_entropy, Dice::from_seed)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Roll { notation, seed, rolls } => {
            let notation: DiceNotation = notation.parse()?;
            let mut dice = dice_for(seed);
            for _ in 0..rolls {
                println!("{}", dice.roll_notation(notation));
            }
        }
        Cmd::Check { skill, seed } => {
            let mut dice = dice_for(seed);
            let res = skill_check(&mut dice, skill);
            println!(
                "skill={} ({}/{}) roll={} => {}",
                skill,
                skill.div_euclid(2),
                skill.div_euclid(5),
                res.roll,
                res.tier
            );
        }
        Cmd::Opposed { attacker, defender, dodge, seed } => {
            let mut dice = dice_for(seed);
            let res = resolve_opposed(&mut dice, attacker, defender, DefenseMode::from_dodging(dodge));
            let winner = match res.winner {
                Winner::Attacker => "attacker",
                Winner::Defender => "defender",
                Winner::None => "none",
            };
            println!("{}", res.description);
            println!(
                "winner={} partial_hit={} attacker_roll={} defender_roll={}",
                winner, res.partial_hit, res.attacker.roll, res.defender.roll
            );
        }
        Cmd::Damage { weapon, bonus, armor, partial, seed } => {
            let mut dice = dice_for(seed);
            let dmg = compute_damage(&mut dice, &weapon, &bonus, armor, partial)?;
            println!("damage={}", dmg);
        }
        Cmd::Generate { age, profession, name, json, seed } => {
            let profession = profession.as_deref().map(find_profession).transpose()?;
            let mut dice = dice_for(seed);
            let stats = generate_attributes(&mut dice, age, profession.as_ref().map(|p| &p.skill_points));
            let sheet = Investigator::from_stats(name, stats, profession.as_ref().map(|p| p.title.as_str()));
            if json {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            } else {
                print_sheet(&sheet);
            }
        }
        Cmd::Professions => {
            for p in builtin_professions()? {
                println!("{:<22} {:<20} {}", p.title, p.skill_points, p.skills.join(", "));
            }
        }
        Cmd::Duel { player, enemy, files, weapon, player_dodges, dodge_chance, seed } => {
            let (player_id, player_path) = if files { (None, Some(player)) } else { (Some(player), None) };
            let (enemy_id, enemy_path) = if files { (None, Some(enemy)) } else { (Some(enemy), None) };
            let res = simulate_duel(DuelConfig {
                player_id,
                player_path,
                enemy_id,
                enemy_path,
                weapon,
                player_dodges,
                dodge_chance,
                max_rounds: None,
                seed,
            })?;
            for line in &res.log {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn print_sheet(sheet: &Investigator) {
    let a = &sheet.attributes;
    let d = &sheet.derived;
    println!(
        "{} (age {}{})",
        sheet.name,
        sheet.age,
        sheet.profession.as_deref().map(|p| format!(", {}", p)).unwrap_or_default()
    );
    println!(
        "STR {:>3}  CON {:>3}  SIZ {:>3}  DEX {:>3}  APP {:>3}",
        a.strength, a.constitution, a.size, a.dexterity, a.appearance
    );
    println!(
        "INT {:>3}  POW {:>3}  EDU {:>3}  LUCK {:>3}",
        a.intelligence, a.power, a.education, a.luck
    );
    println!(
        "HP {}  MP {}  SAN {}  MOV {}  DB {}  Build {}",
        d.hit_points, d.magic_points, d.sanity, d.move_rate, d.damage_bonus, d.build
    );
    println!(
        "professional points {}  interest points {}",
        d.professional_points, d.interest_points
    );
}
