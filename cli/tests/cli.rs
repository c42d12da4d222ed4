use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn arena() -> Command {
    Command::cargo_bin("arena-cli").unwrap()
}

fn scratch(name: &str, contents: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arena-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn battle_prints_the_round_log() {
    arena()
        .args(["battle", "gorgo", "slime"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[INIT] Slime strikes first"))
        .stdout(predicate::str::contains(
            "[END] winner=Gorgo loser=Slime rounds=10",
        ));
}

#[test]
fn battle_json_report() {
    arena()
        .args(["battle", "castor", "pollux", "--roster-id", "twins", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""winner": "Castor""#))
        .stdout(predicate::str::contains(r#""rounds": 39"#));
}

#[test]
fn unknown_combatant_fails() {
    arena()
        .args(["battle", "gorgo", "dragon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no combatant matches 'dragon'"));
}

#[test]
fn play_runs_to_victory_with_a_fast_cadence() {
    let cfg = scratch(
        "fast.json",
        br#"{"lead_in_ms": 0, "round_interval_ms": 5, "reveal_delay_ms": 5, "skip_settle_ms": 1}"#,
    );
    arena()
        .args(["play", "gorgo", "slime", "--config"])
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("[ROUND] 1 Slime → Gorgo -2 HP (18 left)"))
        .stdout(predicate::str::contains("[ROUND] 10 Gorgo → Slime -4 HP (0 left)"))
        .stdout(predicate::str::contains("[RESULT] Gorgo defeats Slime after 10 rounds"))
        .stdout(predicate::str::contains("[VICTORY] Gorgo wins the battle!"));
}

#[test]
fn play_can_skip_straight_to_the_result() {
    arena()
        .args(["play", "gorgo", "slime", "--skip-after", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[SKIP] jumping to round 10"))
        .stdout(predicate::str::contains("[VICTORY] Gorgo wins the battle!"))
        .stdout(predicate::str::contains("[ROUND]").not());
}

#[test]
fn roster_dump_and_check() {
    arena()
        .args(["roster-dump"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "ironhide""#));

    arena()
        .args(["roster-dump", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id":"ironhide""#))
        .stdout(predicate::str::contains("\n  ").not());

    let file = scratch(
        "roster.yaml",
        b"monsters:\n  - {id: a, name: Alpha, attack: 9, defense: 1, speed: 2, hp: 5}\n",
    );
    arena()
        .arg("roster-check")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 combatants OK"))
        .stdout(predicate::str::contains("Alpha"));

    let bad = scratch(
        "bad.json",
        br#"{"monsters":[{"id":"x","name":"X","attack":0,"defense":1,"speed":1,"max_hp":1}]}"#,
    );
    arena()
        .arg("roster-check")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("attack must be within 1..=99"));
}

#[test]
fn round_robin_table() {
    Command::cargo_bin("round-robin")
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("battles:            6"))
        .stdout(predicate::str::is_match(r"1\s+Ironhide\s+3\s+0\s+70").unwrap());
}

#[test]
fn round_robin_reads_bom_prefixed_files() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(
        br#"{"monsters":[
            {"id":"a","name":"Alpha","attack":9,"defense":1,"speed":2,"max_hp":5},
            {"id":"b","name":"Beta","attack":2,"defense":2,"speed":3,"max_hp":7}
        ]}"#,
    );
    let file = scratch("bom.json", &bytes);
    Command::cargo_bin("round-robin")
        .unwrap()
        .arg("--roster")
        .arg(&file)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""battles": 1"#))
        .stdout(predicate::str::contains(r#""name": "Alpha""#));
}
