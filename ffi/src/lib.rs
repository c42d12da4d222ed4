use arena_engine::api::{simulate_battle, BattleConfig};
use arena_engine::{resolve, Combatant};
use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct Matchup {
    a: Combatant,
    b: Combatant,
}

fn ok(value: Value) -> Value {
    json!({ "ok": true, "result": value })
}

fn err(e: impl std::fmt::Display) -> Value {
    json!({ "ok": false, "error": e.to_string() })
}

fn respond(env: &JNIEnv, payload: Value) -> jstring {
    env.new_string(payload.to_string())
        .expect("new_string failed")
        .into_raw()
}

fn read_input(env: &mut JNIEnv, json: &JString) -> Result<String, Value> {
    env.get_string(json).map(Into::into).map_err(err)
}

#[no_mangle]
pub extern "system" fn Java_com_monsterarena_Ffi_version<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> JString<'local> {
    env.new_string(concat!("arena-ffi ", env!("CARGO_PKG_VERSION")))
        .expect("new_string failed")
}

#[no_mangle]
pub extern "system" fn Java_com_monsterarena_Ffi_resolveBattleJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let payload = match read_input(&mut env, &json) {
        Ok(input) => resolve_battle_json(&input),
        Err(e) => e,
    };
    respond(&env, payload)
}

#[no_mangle]
pub extern "system" fn Java_com_monsterarena_Ffi_simulateBattleJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let payload = match read_input(&mut env, &json) {
        Ok(input) => simulate_battle_json(&input),
        Err(e) => e,
    };
    respond(&env, payload)
}

// Internal functions for testing without JNI overhead

/// `{"a": Combatant, "b": Combatant}` in, enveloped `BattleOutcome` out.
pub fn resolve_battle_json(input: &str) -> Value {
    let matchup: Matchup = match serde_json::from_str(input) {
        Ok(m) => m,
        Err(e) => return err(format!("invalid_matchup: {}", e)),
    };
    match resolve(&matchup.a, &matchup.b) {
        Ok(outcome) => match serde_json::to_value(outcome) {
            Ok(v) => ok(v),
            Err(e) => err(e),
        },
        Err(e) => err(e),
    }
}

pub fn simulate_battle_json(input: &str) -> Value {
    let cfg: BattleConfig = match serde_json::from_str(input) {
        Ok(c) => c,
        Err(e) => return err(format!("invalid_config: {}", e)),
    };
    match simulate_battle(cfg) {
        Ok(report) => match serde_json::to_value(report) {
            Ok(v) => ok(v),
            Err(e) => err(e),
        },
        Err(e) => err(format!("{:#}", e)),
    }
}
