use engine::{Archetype, Battle, BattleState, Character, EffectKind, Rng, Roster};

fn fighter(name: &str, hp: i32, attack: i32, defense: i32, speed: i32) -> Character {
    Character {
        id: name.to_lowercase(),
        name: name.to_string(),
        archetype: Archetype::Warrior,
        level: 1,
        hp,
        max_hp: hp,
        mp: 50,
        max_mp: 50,
        attack,
        defense,
        speed,
        exp: 0,
        exp_to_next: 100,
        alive: true,
    }
}

fn new_battle(seed: u64) -> Battle {
    Battle::new("effects_battle", Rng::from_seed(seed))
}

#[test]
fn stun_skips_the_turn_and_keeps_selections() {
    let mut roster = Roster::new();
    // The player cannot be hurt; the enemy only takes the player's blows.
    let p = roster.add(fighter("P", 100, 10, 100, 10));
    let e = roster.add(fighter("E", 100, 1, 10, 5));

    let mut battle = new_battle(1);
    let pid = battle.add_participant(&roster, p, true);
    let eid = battle.add_participant(&roster, e, false);
    battle.start(&roster);

    battle.apply_effect(pid, EffectKind::Stun, 1, 0);
    let power_strike = engine::skills_for(Archetype::Warrior)[1].clone();
    assert!(battle.select_skill(&roster, pid, &power_strike).is_ok());
    assert!(battle.select_target(pid, eid).is_ok());

    // The player's turn is skipped outright: no mp spent, no damage dealt,
    // and being skipped does not tick the stun down.
    battle.execute_turn(&mut roster);
    assert_eq!(roster.get(e).hp, 100);
    assert_eq!(roster.get(p).mp, 50);
    assert!(battle
        .log()
        .iter()
        .any(|entry| entry.text.contains("stunned") && entry.text.contains("skips")));
    assert!(battle.participant(pid).pending_skill.is_some());
    assert!(battle.participant(pid).pending_target.is_some());
    assert_eq!(battle.participant(pid).effects[0].remaining, 1);

    // The enemy's turn closes the round; the 1-round stun expires at the
    // boundary.
    battle.execute_turn(&mut roster);
    assert_eq!(battle.current_round, 2);
    assert!(battle.participant(pid).effects.is_empty());
    assert!(battle
        .log()
        .iter()
        .any(|entry| entry.text.contains("stun effect wears off")));

    // The selections made before the stun carry into this turn.
    battle.execute_turn(&mut roster);
    assert_eq!(roster.get(e).hp, 85);
    assert_eq!(roster.get(p).mp, 40);
    assert!(battle.participant(pid).pending_skill.is_none());
}

#[test]
fn poison_ticks_once_per_round_through_defense() {
    let mut roster = Roster::new();
    // Neither side can land a blow; only the poison moves hp.
    let p = roster.add(fighter("P", 100, 10, 100, 10));
    let e = roster.add(fighter("E", 100, 10, 100, 5));

    let mut battle = new_battle(2);
    battle.add_participant(&roster, p, true);
    let eid = battle.add_participant(&roster, e, false);
    battle.start(&roster);

    battle.apply_effect(eid, EffectKind::Poison, 3, 110);

    // Round 1 plays out; at the boundary the poison deals 110 - 100.
    battle.execute_turn(&mut roster);
    battle.execute_turn(&mut roster);
    assert_eq!(battle.current_round, 2);
    assert_eq!(roster.get(e).hp, 90);
    assert_eq!(battle.participant(eid).effects[0].remaining, 2);
    assert!(battle
        .log()
        .iter()
        .any(|entry| entry.text.contains("takes 10 poison damage")));

    // Second boundary ticks again.
    battle.execute_turn(&mut roster);
    battle.execute_turn(&mut roster);
    assert_eq!(roster.get(e).hp, 80);
    assert_eq!(battle.participant(eid).effects[0].remaining, 1);

    // Third boundary only expires the effect; no further tick.
    battle.execute_turn(&mut roster);
    battle.execute_turn(&mut roster);
    assert_eq!(roster.get(e).hp, 80);
    assert!(battle.participant(eid).effects.is_empty());
    assert!(battle
        .log()
        .iter()
        .any(|entry| entry.text.contains("poison effect wears off")));
}

#[test]
fn poison_defeat_is_detected_after_the_next_action() {
    let mut roster = Roster::new();
    let p = roster.add(fighter("P", 100, 0, 100, 10));
    let e = roster.add(fighter("E", 5, 0, 10, 5));

    let mut battle = new_battle(3);
    let pid = battle.add_participant(&roster, p, true);
    let eid = battle.add_participant(&roster, e, false);
    battle.start(&roster);

    battle.apply_effect(eid, EffectKind::Poison, 2, 30);

    // The round boundary kills the enemy, but the verdict waits for the
    // next resolved action.
    battle.execute_turn(&mut roster);
    battle.execute_turn(&mut roster);
    assert!(!battle.participant(eid).is_alive);
    assert_eq!(battle.alive_participants(), vec![pid]);
    assert_eq!(battle.state(), BattleState::InProgress);
    assert!(battle
        .log()
        .iter()
        .any(|entry| entry.text.contains("defeated by poison")));

    battle.execute_turn(&mut roster);
    assert_eq!(battle.state(), BattleState::PlayerWon);
    assert_eq!(battle.reward().exp, 10);
    assert_eq!(battle.reward().gold, 5);
}

#[test]
fn slow_is_recorded_but_never_reorders_turns() {
    let mut roster = Roster::new();
    let p = roster.add(fighter("P", 100, 10, 100, 50));
    let e = roster.add(fighter("E", 100, 10, 100, 5));

    let mut battle = new_battle(4);
    let pid = battle.add_participant(&roster, p, true);
    let eid = battle.add_participant(&roster, e, false);
    battle.start(&roster);
    assert_eq!(battle.turn_order[0], pid);

    battle.apply_effect(pid, EffectKind::Slow, 2, -2);

    battle.execute_turn(&mut roster);
    battle.execute_turn(&mut roster);
    assert_eq!(battle.current_round, 2);

    // The penalty sits on the effect; the ordering and the snapshot speed
    // are untouched.
    let slowed = battle.participant(pid);
    assert_eq!(slowed.effects[0].kind, EffectKind::Slow);
    assert_eq!(slowed.effects[0].value, -2);
    assert_eq!(slowed.effects[0].remaining, 1);
    assert_eq!(slowed.speed, 50);
    assert_eq!(battle.turn_order[0], pid);
    assert_eq!(battle.current_participant(), Some(pid));
    assert_eq!(roster.get(e).hp, 100);
}
