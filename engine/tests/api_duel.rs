use coc_engine::api::{run_duel, simulate_duel, simulate_duel_many, DuelConfig, DuelOptions};
use coc_engine::content::load_investigator;
use coc_engine::Dice;

fn builtins(seed: u64) -> DuelConfig {
    DuelConfig {
        player_id: Some("jack_bunce".into()),
        enemy_id: Some("mary_lake".into()),
        seed,
        ..Default::default()
    }
}

#[test]
fn duel_api_smoke() {
    let res = simulate_duel(builtins(2025)).expect("duel ran");
    assert!(res.rounds > 0 && res.rounds <= 30);
    assert!(matches!(res.winner.as_str(), "player" | "enemy" | "draw"));
    assert!(res.log.first().is_some_and(|l| l.starts_with("[START]")));
    assert!(res.log.last().is_some_and(|l| l.starts_with("[END]")));
}

#[test]
fn duel_from_files() {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let path = |name: &str| {
        manifest
            .join("content/investigators")
            .join(name)
            .to_string_lossy()
            .into_owned()
    };
    let cfg = DuelConfig {
        player_path: Some(path("mary_lake.json")),
        enemy_path: Some(path("jack_bunce.json")),
        weapon: Some(".22 Revolver".into()),
        player_dodges: true,
        seed: 9,
        ..Default::default()
    };
    let res = simulate_duel(cfg).expect("duel ran");
    assert!(res.log[0].contains("Mary Lake"));
    assert!(res.log[0].contains(".22 Revolver"));
}

#[test]
fn same_seed_same_fight() {
    let a = simulate_duel(builtins(77)).unwrap();
    let b = simulate_duel(builtins(77)).unwrap();
    assert_eq!(a.log, b.log);
    assert_eq!(a.winner, b.winner);
}

#[test]
fn winner_matches_final_hit_points() {
    for seed in 0..20 {
        let res = simulate_duel(builtins(seed)).unwrap();
        match res.winner.as_str() {
            "player" => assert_eq!(res.enemy_hp_end, 0, "seed {seed}"),
            "enemy" => assert_eq!(res.player_hp_end, 0, "seed {seed}"),
            _ => assert!(res.rounds == 30 || (res.player_hp_end == 0 && res.enemy_hp_end == 0)),
        }
    }
}

#[test]
fn never_dodging_enemy_only_attacks() {
    let player = load_investigator(Some("jack_bunce"), None).unwrap();
    let enemy = load_investigator(Some("mary_lake"), None).unwrap();
    let opts = DuelOptions { dodge_chance: 0.0, ..Default::default() };
    let res = run_duel(&mut Dice::from_seed(4), &player, &enemy, &opts).unwrap();
    assert!(!res.log.iter().any(|l| l.contains("prepares to dodge")));
}

#[test]
fn always_dodging_enemy_never_attacks() {
    let player = load_investigator(Some("jack_bunce"), None).unwrap();
    let enemy = load_investigator(Some("mary_lake"), None).unwrap();
    let opts = DuelOptions { dodge_chance: 1.0, max_rounds: 5, ..Default::default() };
    let res = run_duel(&mut Dice::from_seed(4), &player, &enemy, &opts).unwrap();
    assert!(!res.log.iter().any(|l| l.starts_with("[ATTACK][Mary Lake]")));
    assert_eq!(res.player_hp_end, 12);
}

#[test]
fn unknown_weapon_is_an_error() {
    let cfg = DuelConfig { weapon: Some("Elephant Gun".into()), ..builtins(1) };
    assert!(simulate_duel(cfg).is_err());
}

#[test]
fn missing_combatant_is_an_error() {
    let cfg = DuelConfig { enemy_id: None, ..builtins(1) };
    assert!(simulate_duel(cfg).is_err());
    let cfg = DuelConfig { enemy_id: Some("nyarlathotep".into()), ..builtins(1) };
    assert!(simulate_duel(cfg).is_err());
}

#[test]
fn duel_many_summary_makes_sense() {
    let stats = simulate_duel_many(builtins(1), 50).unwrap();
    assert_eq!(stats.samples, 50);
    assert_eq!(stats.player_wins + stats.enemy_wins + stats.draws, 50);
}
