use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Rng;

/// Fixed character class. Drives base stats, growth on level-up, and the
/// available skill roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Warrior,
    Mage,
    Archer,
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Archetype::Warrior => "Warrior",
            Archetype::Mage => "Mage",
            Archetype::Archer => "Archer",
        };
        f.write_str(name)
    }
}

/// A combat entity. Plain data; the battle only ever borrows it out of the
/// owning [`Roster`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub archetype: Archetype,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub exp: i32,
    pub exp_to_next: i32,
    pub alive: bool,
}

impl Character {
    /// Rolls a fresh level-1 character. Base stat ranges per archetype:
    /// warriors are durable and slow (hp 100-119, defense 10-14, speed 5-7),
    /// mages hit hard on a deep mana pool behind thin armor (mp 100-119,
    /// attack 20-26, defense 5-7), archers are the fastest (speed 12-16).
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        archetype: Archetype,
        rng: &mut Rng,
    ) -> Self {
        let (max_hp, max_mp, attack, defense, speed) = match archetype {
            Archetype::Warrior => (
                rng.roll(100, 119),
                rng.roll(30, 39),
                rng.roll(15, 19),
                rng.roll(10, 14),
                rng.roll(5, 7),
            ),
            Archetype::Mage => (
                rng.roll(60, 74),
                rng.roll(100, 119),
                rng.roll(20, 26),
                rng.roll(5, 7),
                rng.roll(8, 11),
            ),
            Archetype::Archer => (
                rng.roll(70, 84),
                rng.roll(50, 64),
                rng.roll(18, 23),
                rng.roll(7, 10),
                rng.roll(12, 16),
            ),
        };

        Self {
            id: id.into(),
            name: name.into(),
            archetype,
            level: 1,
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            attack,
            defense,
            speed,
            exp: 0,
            exp_to_next: 100,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Applies raw damage through defense. Hp never goes below zero; the
    /// character dies the moment it reaches zero. Returns the damage that
    /// actually landed.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        let actual = (damage - self.defense).max(0);
        self.hp -= actual;
        if self.hp <= 0 {
            self.hp = 0;
            self.alive = false;
        }
        actual
    }

    /// Restores hp, clamped at `max_hp`. Returns the amount actually added.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.min(self.max_hp - self.hp);
        self.hp += healed;
        healed
    }

    /// Restores mp, clamped at `max_mp`. Returns the amount actually added.
    pub fn restore_mp(&mut self, amount: i32) -> i32 {
        let restored = amount.min(self.max_mp - self.mp);
        self.mp += restored;
        restored
    }

    /// Grants exp. Performs at most one level-up step per call, even when
    /// the gained amount crosses several thresholds at once; the surplus
    /// stays banked toward the next call. Returns whether a level was
    /// gained.
    pub fn gain_exp(&mut self, amount: i32, rng: &mut Rng) -> bool {
        self.exp += amount;
        if self.exp >= self.exp_to_next {
            self.level_up(rng);
            return true;
        }
        false
    }

    fn level_up(&mut self, rng: &mut Rng) {
        self.level += 1;
        self.exp -= self.exp_to_next;
        self.exp_to_next = self.level * 100;

        match self.archetype {
            Archetype::Warrior => {
                self.max_hp += rng.roll(10, 14);
                self.max_mp += rng.roll(2, 4);
                self.attack += rng.roll(3, 4);
                self.defense += rng.roll(2, 3);
                self.speed += 1;
            }
            Archetype::Mage => {
                self.max_hp += rng.roll(5, 7);
                self.max_mp += rng.roll(8, 11);
                self.attack += rng.roll(4, 5);
                self.defense += 1;
                self.speed += 2;
            }
            Archetype::Archer => {
                self.max_hp += rng.roll(7, 10);
                self.max_mp += rng.roll(4, 6);
                self.attack += rng.roll(3, 4);
                self.defense += 1;
                self.speed += rng.roll(3, 4);
            }
        }

        // A level-up is a full refresh.
        self.hp = self.max_hp;
        self.mp = self.max_mp;
        tracing::debug!(name = %self.name, level = self.level, "level up");
    }

    /// Damage dealt by a basic attack: attack with a small uniform variance.
    pub fn attack_damage(&self, rng: &mut Rng) -> i32 {
        self.attack + rng.roll(-2, 2)
    }

    /// Presentation name, e.g. `Hero (Warrior)`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.archetype)
    }
}

/// Stable handle into a [`Roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub usize);

/// Arena owning every character in a driver session. Battles address
/// characters through [`CharacterId`] and borrow the roster per call, so
/// ownership stays with whoever created the characters.
#[derive(Debug, Default)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, character: Character) -> CharacterId {
        self.characters.push(character);
        CharacterId(self.characters.len() - 1)
    }

    pub fn get(&self, id: CharacterId) -> &Character {
        &self.characters[id.0]
    }

    pub fn get_mut(&mut self, id: CharacterId) -> &mut Character {
        &mut self.characters[id.0]
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharacterId, &Character)> {
        self.characters
            .iter()
            .enumerate()
            .map(|(idx, c)| (CharacterId(idx), c))
    }
}
