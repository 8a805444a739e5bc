use coc_engine::content::load_investigator;
use coc_engine::dispatch::dispatch_all;
use coc_engine::{
    dispatch, CheckReport, CheckRequest, Dice, Difficulty, EngineError, Investigator, SuccessTier,
    Winner,
};

fn roster() -> Vec<Investigator> {
    ["jack_bunce", "mary_lake"]
        .into_iter()
        .map(|id| load_investigator(Some(id), None).expect("builtin investigator"))
        .collect()
}

#[test]
fn skill_request_reports_difficulty() {
    let mut dice = Dice::from_scripted(vec![20]);
    let req: CheckRequest = serde_json::from_str(
        r#"{"type": "skill", "actor": "mary lake", "skill": "Dodge", "difficulty": "hard"}"#,
    )
    .unwrap();
    match dispatch(&mut dice, &roster(), &req).unwrap() {
        CheckReport::Skill { actor, outcome, passed, difficulty, .. } => {
            assert_eq!(actor, "Mary Lake");
            assert_eq!(difficulty, Difficulty::Hard);
            assert_eq!(outcome.threshold, 35);
            assert_eq!(outcome.tier, SuccessTier::RegularSuccess);
            assert!(!passed);
        }
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn attack_win_rolls_damage_with_bonus() {
    let mut dice = Dice::from_scripted(vec![10, 80, 4, 2]);
    let req = CheckRequest::Attack {
        attacker: "Jack Bunce".into(),
        weapon: Some(".22 Revolver".into()),
        defender: "Mary Lake".into(),
        dodge: true,
    };
    match dispatch(&mut dice, &roster(), &req).unwrap() {
        CheckReport::Attack { weapon, result, damage, .. } => {
            assert_eq!(weapon, ".22 Revolver");
            assert_eq!(result.winner, Winner::Attacker);
            let damage = damage.expect("winner rolls damage");
            assert_eq!(damage.weapon_roll, 4);
            assert_eq!(damage.bonus_roll, 2);
            assert_eq!(damage.total, 6);
        }
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn even_block_halves_the_blow() {
    // Mary's fist (25) against Jack's Fighting (25): both regular.
    let mut dice = Dice::from_scripted(vec![20, 20, 3]);
    let req = CheckRequest::Attack {
        attacker: "Mary Lake".into(),
        weapon: None,
        defender: "Jack Bunce".into(),
        dodge: false,
    };
    match dispatch(&mut dice, &roster(), &req).unwrap() {
        CheckReport::Attack { weapon, result, damage, .. } => {
            assert_eq!(weapon, "Fist");
            assert!(result.partial_hit);
            assert_eq!(damage.map(|d| d.total), Some(1));
        }
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn failed_attack_rolls_no_damage() {
    let mut dice = Dice::from_scripted(vec![90, 10]);
    let req = CheckRequest::Attack {
        attacker: "Jack Bunce".into(),
        weapon: None,
        defender: "Mary Lake".into(),
        dodge: false,
    };
    match dispatch(&mut dice, &roster(), &req).unwrap() {
        CheckReport::Attack { result, damage, .. } => {
            assert_eq!(result.winner, Winner::Defender);
            assert!(damage.is_none());
        }
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn bad_requests_fail_before_rolling() {
    let roster = roster();
    let mut dice = Dice::from_scripted(vec![7, 8]);

    let unknown_actor = CheckRequest::Skill {
        actor: "Nobody".into(),
        skill: "Dodge".into(),
        difficulty: Difficulty::Regular,
    };
    assert_eq!(
        dispatch(&mut dice, &roster, &unknown_actor),
        Err(EngineError::UnknownActor("Nobody".into()))
    );

    let unknown_skill = CheckRequest::Opposed {
        attacker: "Jack Bunce".into(),
        attacker_skill: "Fighting".into(),
        defender: "Mary Lake".into(),
        defender_skill: "Juggling".into(),
        dodge: false,
    };
    assert!(matches!(
        dispatch(&mut dice, &roster, &unknown_skill),
        Err(EngineError::UnknownSkill(_))
    ));

    let ok = CheckRequest::Skill {
        actor: "Jack Bunce".into(),
        skill: "Dodge".into(),
        difficulty: Difficulty::Regular,
    };
    match dispatch(&mut dice, &roster, &ok).unwrap() {
        CheckReport::Skill { outcome, .. } => assert_eq!(outcome.roll, 7),
        other => panic!("unexpected report {other:?}"),
    }
}

#[test]
fn batches_run_in_order() {
    let requests: Vec<CheckRequest> = serde_json::from_str(
        r#"[
            {"type": "skill", "actor": "Jack Bunce", "skill": "Firearms"},
            {"type": "opposed", "attacker": "Jack Bunce", "attacker_skill": "STR",
             "defender": "Mary Lake", "defender_skill": "STR"}
        ]"#,
    )
    .unwrap();
    let mut dice = Dice::from_scripted(vec![30, 50, 50]);
    let reports = dispatch_all(&mut dice, &roster(), &requests).unwrap();
    assert_eq!(reports.len(), 2);
    match &reports[1] {
        CheckReport::Opposed { result, .. } => {
            // 50 vs STR 80 is regular; 50 vs STR 40 fails.
            assert_eq!(result.winner, Winner::Attacker);
        }
        other => panic!("unexpected report {other:?}"),
    }
    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["type"], "skill");
    assert_eq!(json[1]["type"], "opposed");
}
