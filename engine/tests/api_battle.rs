use std::fs;

use arena_engine::api::{
    BattleConfig, RoundRobinConfig, simulate_battle, simulate_round_robin,
};
use arena_engine::content::{builtin_roster, load_playback_config, load_roster};
use arena_engine::{PlaybackConfig, RosterError};

fn battle(first: &str, second: &str) -> BattleConfig {
    BattleConfig {
        roster_path: None,
        roster_id: None,
        first: first.into(),
        second: second.into(),
    }
}

#[test]
fn starter_battle_by_id_and_name() {
    let res = simulate_battle(battle("gorgo", "Slime")).unwrap();
    assert_eq!(res.winner, "Gorgo");
    assert_eq!(res.loser, "Slime");
    assert_eq!(res.rounds, 10);
    assert_eq!(res.winner_hp_end, 10);
    assert_eq!(res.log.len(), 13);
    assert_eq!(res.log.last().unwrap(), "[END] winner=Gorgo loser=Slime rounds=10");
}

#[test]
fn yaml_builtin_roster_supports_the_hp_alias() {
    let cfg = BattleConfig {
        roster_id: Some("twins".into()),
        ..battle("castor", "pollux")
    };
    let res = simulate_battle(cfg).unwrap();
    assert_eq!(res.winner, "Castor");
    assert_eq!(res.rounds, 39);
    assert_eq!(res.winner_hp_end, 1);
}

#[test]
fn unknown_combatant_is_reported() {
    let err = simulate_battle(battle("gorgo", "dragon")).unwrap_err();
    assert_eq!(
        err.downcast_ref::<RosterError>(),
        Some(&RosterError::UnknownCombatant("dragon".into()))
    );
}

#[test]
fn same_combatant_twice_is_an_error() {
    let err = simulate_battle(battle("gorgo", "Gorgo")).unwrap_err();
    assert!(format!("{:#}", err).contains("cannot fight itself"));
}

#[test]
fn round_robin_over_starter_roster() {
    let report = simulate_round_robin(RoundRobinConfig::default()).unwrap();
    assert_eq!(report.battles, 6);
    let table: Vec<(&str, u32, u32, u32)> = report
        .standings
        .iter()
        .map(|s| (s.name.as_str(), s.wins, s.losses, s.rounds_fought))
        .collect();
    assert_eq!(
        table,
        [
            ("Ironhide", 3, 0, 70),
            ("Zephyr", 2, 1, 22),
            ("Gorgo", 1, 2, 55),
            ("Slime", 0, 3, 33),
        ]
    );
}

#[test]
fn roster_and_config_files_load_from_disk() {
    let dir = std::env::temp_dir().join(format!("arena-content-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let roster_path = dir.join("roster.yml");
    fs::write(
        &roster_path,
        "monsters:\n  - {id: a, name: Alpha, attack: 9, defense: 1, speed: 2, hp: 5}\n  - {id: b, name: Beta, attack: 2, defense: 2, speed: 3, max_hp: 7}\n",
    )
    .unwrap();
    let roster = load_roster(&roster_path).unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.find("beta").unwrap().max_hp, 7);

    let cfg = BattleConfig {
        roster_path: Some(roster_path.to_string_lossy().into_owned()),
        ..battle("a", "b")
    };
    assert_eq!(simulate_battle(cfg).unwrap().winner, "Alpha");

    let config_path = dir.join("playback.json");
    fs::write(&config_path, r#"{"round_interval_ms": 800}"#).unwrap();
    let config = load_playback_config(&config_path).unwrap();
    assert_eq!(
        config,
        PlaybackConfig {
            round_interval_ms: 800,
            ..PlaybackConfig::default()
        }
    );

    fs::write(&config_path, r#"{"round_interval_ms": 400}"#).unwrap();
    let err = load_playback_config(&config_path).unwrap_err();
    assert!(format!("{:#}", err).contains("skip_settle_ms"));

    let bad_path = dir.join("bad.json");
    fs::write(
        &bad_path,
        r#"{"monsters":[{"id":"x","name":"","attack":1,"defense":1,"speed":1,"max_hp":1}]}"#,
    )
    .unwrap();
    assert!(load_roster(&bad_path).is_err());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn unknown_builtin_roster_fails() {
    assert!(builtin_roster("nope").is_err());
    assert_eq!(builtin_roster("starter").unwrap().len(), 4);
}
