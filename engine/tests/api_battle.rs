use engine::api::{builtin_encounter, run_battle, CombatantSpec, EncounterConfig};

#[test]
fn builtin_encounter_reaches_a_verdict() {
    let cfg = builtin_encounter("goblin_ambush").expect("built-in encounter parses");
    assert_eq!(cfg.players.len(), 1);
    assert_eq!(cfg.enemies.len(), 2);

    let report = run_battle(&cfg).expect("scripted run succeeds");
    assert!(
        ["players", "enemies", "draw", "undecided"].contains(&report.winner.as_str()),
        "unexpected winner {}",
        report.winner
    );
    assert!(report.rounds >= 1);
    assert!(!report.log.is_empty());
    assert!(report.log[0].text.contains("Battle begins"));
}

#[test]
fn identical_seeds_replay_identically() {
    let cfg = builtin_encounter("goblin_ambush").expect("built-in encounter parses");
    let a = run_battle(&cfg).expect("first run");
    let b = run_battle(&cfg).expect("second run");
    assert_eq!(a.winner, b.winner);
    assert_eq!(a.rounds, b.rounds);
    assert_eq!(a.log, b.log);
}

#[test]
fn unknown_builtin_is_an_error() {
    let err = builtin_encounter("dragon_lair").unwrap_err();
    assert!(err.to_string().contains("dragon_lair"));
}

#[test]
fn empty_sides_are_rejected() {
    let no_players = EncounterConfig {
        seed: 1,
        players: vec![],
        enemies: vec![CombatantSpec {
            name: "Goblin".to_string(),
            archetype: engine::Archetype::Warrior,
        }],
    };
    assert!(run_battle(&no_players)
        .unwrap_err()
        .to_string()
        .contains("player side"));

    let no_enemies = EncounterConfig {
        seed: 1,
        players: vec![CombatantSpec {
            name: "Hero".to_string(),
            archetype: engine::Archetype::Warrior,
        }],
        enemies: vec![],
    };
    assert!(run_battle(&no_enemies)
        .unwrap_err()
        .to_string()
        .contains("enemy side"));
}

#[test]
fn report_serializes_to_json() {
    let cfg = builtin_encounter("goblin_ambush").expect("built-in encounter parses");
    let report = run_battle(&cfg).expect("scripted run succeeds");
    let value = serde_json::to_value(&report).expect("report serializes");
    assert!(value.get("winner").is_some());
    assert!(value.get("log").is_some());
    assert!(value["reward"].get("exp").is_some());
}
