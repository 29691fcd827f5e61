use engine::{Archetype, Character, Rng};
use proptest::prelude::*;

fn sample(archetype: Archetype, seed: u64) -> Character {
    let mut rng = Rng::from_seed(seed);
    Character::new("c1", "Tester", archetype, &mut rng)
}

/// Hand-built character with exact stats, so assertions are free of roll
/// variance.
fn flat(hp: i32, defense: i32) -> Character {
    Character {
        id: "dummy".to_string(),
        name: "Dummy".to_string(),
        archetype: Archetype::Warrior,
        level: 1,
        hp,
        max_hp: hp,
        mp: 10,
        max_mp: 10,
        attack: 10,
        defense,
        speed: 5,
        exp: 0,
        exp_to_next: 100,
        alive: true,
    }
}

#[test]
fn warrior_stats_fall_in_archetype_ranges() {
    for seed in 0..20 {
        let c = sample(Archetype::Warrior, seed);
        assert!((100..=119).contains(&c.max_hp));
        assert!((30..=39).contains(&c.max_mp));
        assert!((15..=19).contains(&c.attack));
        assert!((10..=14).contains(&c.defense));
        assert!((5..=7).contains(&c.speed));
        assert_eq!(c.hp, c.max_hp);
        assert_eq!(c.mp, c.max_mp);
        assert_eq!(c.level, 1);
        assert_eq!(c.exp_to_next, 100);
        assert!(c.alive);
    }
}

#[test]
fn mage_stats_fall_in_archetype_ranges() {
    for seed in 0..20 {
        let c = sample(Archetype::Mage, seed);
        assert!((60..=74).contains(&c.max_hp));
        assert!((100..=119).contains(&c.max_mp));
        assert!((20..=26).contains(&c.attack));
        assert!((5..=7).contains(&c.defense));
        assert!((8..=11).contains(&c.speed));
    }
}

#[test]
fn archer_stats_fall_in_archetype_ranges() {
    for seed in 0..20 {
        let c = sample(Archetype::Archer, seed);
        assert!((70..=84).contains(&c.max_hp));
        assert!((50..=64).contains(&c.max_mp));
        assert!((18..=23).contains(&c.attack));
        assert!((7..=10).contains(&c.defense));
        assert!((12..=16).contains(&c.speed));
    }
}

#[test]
fn damage_is_reduced_by_defense_and_absorbed_when_small() {
    let mut c = flat(30, 5);
    assert_eq!(c.take_damage(12), 7);
    assert_eq!(c.hp, 23);

    // Fully absorbed: no damage, no negative healing.
    assert_eq!(c.take_damage(3), 0);
    assert_eq!(c.hp, 23);
    assert!(c.alive);
}

#[test]
fn lethal_damage_clamps_hp_and_clears_alive() {
    let mut c = flat(10, 0);
    assert_eq!(c.take_damage(25), 25);
    assert_eq!(c.hp, 0);
    assert!(!c.alive);
    assert!(!c.is_alive());
}

#[test]
fn heal_clamps_at_max_hp() {
    let mut c = flat(50, 0);
    c.take_damage(30);
    assert_eq!(c.hp, 20);
    assert_eq!(c.heal(10), 10);
    assert_eq!(c.hp, 30);
    assert_eq!(c.heal(100), 20);
    assert_eq!(c.hp, 50);
    assert_eq!(c.heal(5), 0);
}

#[test]
fn restore_mp_clamps_at_max_mp() {
    let mut c = flat(50, 0);
    c.mp = 2;
    assert_eq!(c.restore_mp(3), 3);
    assert_eq!(c.mp, 5);
    assert_eq!(c.restore_mp(100), 5);
    assert_eq!(c.mp, 10);
}

#[test]
fn gain_exp_levels_up_once_per_call() {
    let mut rng = Rng::from_seed(9);
    let mut c = sample(Archetype::Warrior, 9);

    // 350 exp crosses the level-1 (100) and level-2 (200) thresholds, but
    // only one step is taken per call; the surplus stays banked.
    assert!(c.gain_exp(350, &mut rng));
    assert_eq!(c.level, 2);
    assert_eq!(c.exp, 250);
    assert_eq!(c.exp_to_next, 200);

    assert!(c.gain_exp(0, &mut rng));
    assert_eq!(c.level, 3);
    assert_eq!(c.exp, 50);
    assert_eq!(c.exp_to_next, 300);

    assert!(!c.gain_exp(10, &mut rng));
    assert_eq!(c.level, 3);
}

#[test]
fn level_up_restores_hp_and_mp() {
    let mut rng = Rng::from_seed(4);
    let mut c = sample(Archetype::Mage, 4);
    c.take_damage(30);
    c.mp = 5;
    assert!(c.hp < c.max_hp);

    assert!(c.gain_exp(100, &mut rng));
    assert_eq!(c.level, 2);
    assert_eq!(c.hp, c.max_hp);
    assert_eq!(c.mp, c.max_mp);
}

#[test]
fn attack_damage_varies_within_two_points() {
    let mut rng = Rng::from_seed(11);
    let c = flat(10, 0);
    for _ in 0..50 {
        let dmg = c.attack_damage(&mut rng);
        assert!((8..=12).contains(&dmg), "got {dmg}");
    }
}

#[test]
fn display_name_includes_archetype() {
    let c = sample(Archetype::Archer, 1);
    assert_eq!(c.display_name(), "Tester (Archer)");
}

proptest! {
    #[test]
    fn damage_math_holds_for_all_inputs(
        raw in 0i32..1000,
        defense in 0i32..1000,
        hp in 1i32..1000,
    ) {
        let mut c = flat(hp, defense);
        let actual = c.take_damage(raw);
        prop_assert_eq!(actual, (raw - defense).max(0));
        prop_assert!(c.hp >= 0);
        prop_assert_eq!(c.alive, c.hp > 0);
    }

    #[test]
    fn heal_never_overflows_max_hp(
        max_hp in 1i32..1000,
        dmg in 0i32..1000,
        amount in 0i32..1000,
    ) {
        let mut c = flat(max_hp, 0);
        c.take_damage(dmg);
        let before = c.hp;
        let healed = c.heal(amount);
        prop_assert_eq!(healed, amount.min(max_hp - before));
        prop_assert!(c.hp <= max_hp);
    }
}
