use coc_engine::api::{simulate_duel, simulate_duel_many, DuelConfig};
use coc_engine::content::{find_profession, load_investigator};
use coc_engine::dispatch::dispatch_all;
use coc_engine::{generate_attributes, CheckRequest, Dice, DiceNotation, Investigator};
use jni::objects::{JClass, JString};
use jni::sys::{jint, jlong, jstring};
use jni::JNIEnv;
use serde::Deserialize;
use serde_json::{json, Value};

fn envelope(result: Result<Value, String>) -> String {
    let payload = match result {
        Ok(value) => json!({ "ok": true, "result": value }),
        Err(e) => json!({ "ok": false, "error": e }),
    };
    payload.to_string()
}

fn respond(env: &JNIEnv, result: Result<Value, String>) -> jstring {
    env.new_string(envelope(result))
        .map(|s| s.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

fn read_input(env: &mut JNIEnv, json: &JString) -> Result<String, String> {
    env.get_string(json).map(Into::into).map_err(|e| e.to_string())
}

fn invalid(e: impl std::fmt::Display) -> String {
    format!("invalid_config: {}", e)
}

#[no_mangle]
pub extern "system" fn Java_com_coc_Ffi_version<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    env.new_string(concat!("coc-ffi ", env!("CARGO_PKG_VERSION")))
        .map(|s| s.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

/// Sum of `n` rolls of `1..=sides` from the engine's seeded dice.
/// n<=0 → 0, sides<=1 → 1 per die.
#[no_mangle]
pub extern "system" fn Java_com_coc_Ffi_roll(
    _env: JNIEnv<'_>,
    _class: JClass<'_>,
    seed: jlong,
    n: jint,
    sides: jint,
) -> jint {
    roll_internal(seed, n, sides)
}

#[no_mangle]
pub extern "system" fn Java_com_coc_Ffi_checkJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let result = read_input(&mut env, &json).and_then(|s| check_internal(&s));
    respond(&env, result)
}

#[no_mangle]
pub extern "system" fn Java_com_coc_Ffi_generateJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let result = read_input(&mut env, &json).and_then(|s| generate_internal(&s));
    respond(&env, result)
}

#[no_mangle]
pub extern "system" fn Java_com_coc_Ffi_simulateDuelJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let result = read_input(&mut env, &json).and_then(|s| duel_internal(&s));
    respond(&env, result)
}

#[no_mangle]
pub extern "system" fn Java_com_coc_Ffi_simulateDuelManyJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let result = read_input(&mut env, &json).and_then(|s| duel_many_internal(&s));
    respond(&env, result)
}

// Internal functions for testing without JNI overhead
pub fn roll_internal(seed: i64, n: i32, sides: i32) -> i32 {
    let sides = sides.max(1) as u32;
    let rolls = n.max(0) as u32;
    if sides == 1 {
        return rolls as i32;
    }
    Dice::from_seed(seed as u64).roll_notation(DiceNotation::new(rolls, sides))
}

#[derive(Deserialize)]
struct CheckBatch {
    /// Full investigator sheets.
    #[serde(default)]
    roster: Vec<Investigator>,
    /// Builtin investigator ids appended to the roster.
    #[serde(default)]
    builtins: Vec<String>,
    requests: Vec<CheckRequest>,
    #[serde(default)]
    seed: u64,
}

pub fn check_internal(input: &str) -> Result<Value, String> {
    let batch: CheckBatch = serde_json::from_str(input).map_err(invalid)?;
    let mut roster = batch.roster;
    for id in &batch.builtins {
        roster.push(load_investigator(Some(id.as_str()), None).map_err(|e| e.to_string())?);
    }
    let mut dice = Dice::from_seed(batch.seed);
    let reports = dispatch_all(&mut dice, &roster, &batch.requests).map_err(|e| e.to_string())?;
    serde_json::to_value(reports).map_err(|e| e.to_string())
}

#[derive(Deserialize)]
struct GenerateRequest {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_age")]
    age: u32,
    #[serde(default)]
    profession: Option<String>,
    #[serde(default)]
    seed: u64,
}

fn default_name() -> String {
    "Investigator".to_string()
}

fn default_age() -> u32 {
    25
}

pub fn generate_internal(input: &str) -> Result<Value, String> {
    let req: GenerateRequest = serde_json::from_str(input).map_err(invalid)?;
    let profession = req
        .profession
        .as_deref()
        .map(find_profession)
        .transpose()
        .map_err(|e| e.to_string())?;
    let mut dice = Dice::from_seed(req.seed);
    let stats = generate_attributes(&mut dice, req.age, profession.as_ref().map(|p| &p.skill_points));
    let sheet = Investigator::from_stats(req.name, stats, profession.as_ref().map(|p| p.title.as_str()));
    serde_json::to_value(sheet).map_err(|e| e.to_string())
}

pub fn duel_internal(input: &str) -> Result<Value, String> {
    let cfg: DuelConfig = serde_json::from_str(input).map_err(invalid)?;
    let result = simulate_duel(cfg).map_err(|e| e.to_string())?;
    serde_json::to_value(result).map_err(|e| e.to_string())
}

pub fn duel_many_internal(input: &str) -> Result<Value, String> {
    let mut root: Value = serde_json::from_str(input).map_err(invalid)?;
    let samples = match root.get("samples") {
        None => 100,
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid(format!("samples must be an integer in 0..={}, got {}", u32::MAX, v)))?,
    };
    if let Some(obj) = root.as_object_mut() {
        obj.remove("samples");
    }
    let cfg: DuelConfig = serde_json::from_value(root).map_err(invalid)?;
    let stats = simulate_duel_many(cfg, samples).map_err(|e| e.to_string())?;
    serde_json::to_value(stats).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_internal() {
        let result1 = roll_internal(42, 3, 6);
        let result2 = roll_internal(42, 3, 6);
        assert_eq!(result1, result2);
        assert!((3..=18).contains(&result1));
    }

    #[test]
    fn test_roll_edge_cases() {
        assert_eq!(roll_internal(42, 0, 6), 0);
        assert_eq!(roll_internal(42, 1, 1), 1);
        assert_eq!(roll_internal(42, 4, 0), 4);
    }

    #[test]
    fn check_batch_against_builtins() {
        let input = r#"{
            "builtins": ["jack_bunce", "mary_lake"],
            "requests": [
                {"type": "skill", "actor": "Jack Bunce", "skill": "Firearms"},
                {"type": "attack", "attacker": "Mary Lake", "defender": "Jack Bunce", "dodge": true}
            ],
            "seed": 7
        }"#;
        let value = check_internal(input).expect("batch should dispatch");
        let reports = value.as_array().expect("array of reports");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["type"], "skill");
        assert_eq!(reports[1]["type"], "attack");
    }

    #[test]
    fn unknown_actor_is_reported() {
        let input = r#"{"requests": [{"type": "skill", "actor": "Nobody", "skill": "Dodge"}]}"#;
        let err = check_internal(input).unwrap_err();
        assert!(err.contains("Nobody"));
    }

    #[test]
    fn envelope_shapes() {
        let ok: Value = serde_json::from_str(&envelope(Ok(json!(3)))).unwrap();
        assert_eq!(ok["ok"], true);
        assert_eq!(ok["result"], 3);
        let err: Value = serde_json::from_str(&envelope(Err("bad \"quote\"".into()))).unwrap();
        assert_eq!(err["ok"], false);
        assert_eq!(err["error"], "bad \"quote\"");
    }

    #[test]
    fn generate_with_profession() {
        let value = generate_internal(r#"{"name": "Ada", "age": 30, "profession": "Doctor of Medicine", "seed": 3}"#)
            .expect("generate");
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["profession"], "Doctor of Medicine");
        assert!(value["derived"]["professional_points"].as_i64().unwrap() > 0);
    }

    #[test]
    fn duel_many_counts_every_sample() {
        let value = duel_many_internal(r#"{"player_id": "jack_bunce", "enemy_id": "mary_lake", "samples": 20, "seed": 1}"#)
            .expect("duels");
        let total = value["player_wins"].as_u64().unwrap()
            + value["enemy_wins"].as_u64().unwrap()
            + value["draws"].as_u64().unwrap();
        assert_eq!(total, 20);
    }

    #[test]
    fn out_of_range_samples_are_rejected() {
        let err = duel_many_internal(r#"{"player_id": "jack_bunce", "enemy_id": "mary_lake", "samples": 4294967296}"#)
            .unwrap_err();
        assert!(err.starts_with("invalid_config"), "{err}");
        let err = duel_many_internal(r#"{"player_id": "jack_bunce", "enemy_id": "mary_lake", "samples": -1}"#)
            .unwrap_err();
        assert!(err.starts_with("invalid_config"), "{err}");
    }

    #[test]
    fn bad_config_is_flagged() {
        assert!(duel_internal("not json").unwrap_err().starts_with("invalid_config"));
    }
}
