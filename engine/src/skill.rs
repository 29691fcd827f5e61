use serde::{Deserialize, Serialize};

use crate::character::{Archetype, Character};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    BasicAttack,
    // Warrior
    PowerStrike,
    Whirlwind,
    ShieldBash,
    // Mage
    Fireball,
    Frostbolt,
    Lightning,
    Heal,
    // Archer
    PiercingShot,
    Multishot,
    Trap,
}

/// Which participants a skill resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    SingleTarget,
    AllEnemies,
    AllAllies,
    SelfOnly,
}

/// An immutable skill definition. Skills are value data: cloned freely,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub kind: SkillKind,
    pub description: String,
    pub mp_cost: i32,
    pub damage: i32,
    pub heal: i32,
    pub target: TargetMode,
}

impl Skill {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        name: &str,
        kind: SkillKind,
        description: &str,
        mp_cost: i32,
        damage: i32,
        heal: i32,
        target: TargetMode,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            description: description.to_string(),
            mp_cost,
            damage,
            heal,
            target,
        }
    }

    /// The universal zero-cost attack. Its nominal damage is only a
    /// default; execution substitutes the attacker's randomized attack
    /// damage.
    pub fn basic_attack() -> Self {
        Skill::new(
            "basic_attack",
            "Basic Attack",
            SkillKind::BasicAttack,
            "A plain strike against a single enemy",
            0,
            10,
            0,
            TargetMode::SingleTarget,
        )
    }

    pub fn can_use(&self, character: &Character) -> bool {
        character.mp >= self.mp_cost
    }

    /// Debits the mp cost when affordable, and leaves mp untouched when
    /// not. Callers gate with [`Skill::can_use`].
    pub fn spend(&self, character: &mut Character) {
        if character.mp >= self.mp_cost {
            character.mp -= self.mp_cost;
        }
    }

    pub fn is_damage_skill(&self) -> bool {
        self.damage > 0
    }

    pub fn is_healing_skill(&self) -> bool {
        self.heal > 0
    }
}

/// The fixed roster for an archetype: the basic attack plus its
/// archetype-specific skills.
pub fn skills_for(archetype: Archetype) -> Vec<Skill> {
    let mut skills = vec![Skill::basic_attack()];
    match archetype {
        Archetype::Warrior => {
            skills.push(Skill::new(
                "power_strike",
                "Power Strike",
                SkillKind::PowerStrike,
                "A heavy blow against a single enemy",
                10,
                25,
                0,
                TargetMode::SingleTarget,
            ));
            skills.push(Skill::new(
                "whirlwind",
                "Whirlwind",
                SkillKind::Whirlwind,
                "A spinning slash that hits every enemy",
                20,
                15,
                0,
                TargetMode::AllEnemies,
            ));
            skills.push(Skill::new(
                "shield_bash",
                "Shield Bash",
                SkillKind::ShieldBash,
                "Slams a single enemy, with a chance to stun for a round",
                15,
                20,
                0,
                TargetMode::SingleTarget,
            ));
        }
        Archetype::Mage => {
            skills.push(Skill::new(
                "fireball",
                "Fireball",
                SkillKind::Fireball,
                "Hurls fire at a single enemy",
                15,
                30,
                0,
                TargetMode::SingleTarget,
            ));
            skills.push(Skill::new(
                "frostbolt",
                "Frostbolt",
                SkillKind::Frostbolt,
                "Frost damage to a single enemy, with a chance to slow",
                12,
                20,
                0,
                TargetMode::SingleTarget,
            ));
            skills.push(Skill::new(
                "lightning",
                "Chain Lightning",
                SkillKind::Lightning,
                "Lightning that arcs across every enemy",
                25,
                18,
                0,
                TargetMode::AllEnemies,
            ));
            skills.push(Skill::new(
                "heal",
                "Heal",
                SkillKind::Heal,
                "Restores the health of a single ally",
                20,
                0,
                30,
                TargetMode::SingleTarget,
            ));
        }
        Archetype::Archer => {
            skills.push(Skill::new(
                "piercing_shot",
                "Piercing Shot",
                SkillKind::PiercingShot,
                "A shot that punches through armor",
                15,
                28,
                0,
                TargetMode::SingleTarget,
            ));
            skills.push(Skill::new(
                "multishot",
                "Multishot",
                SkillKind::Multishot,
                "A volley loosed at every enemy",
                20,
                12,
                0,
                TargetMode::AllEnemies,
            ));
            skills.push(Skill::new(
                "trap",
                "Trap",
                SkillKind::Trap,
                "A hidden snare that wounds a single enemy",
                10,
                15,
                0,
                TargetMode::SingleTarget,
            ));
        }
    }
    skills
}
