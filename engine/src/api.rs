use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::battle::{Battle, BattleState, LogEntry, Reward};
use crate::character::{Archetype, Character, Roster};
use crate::Rng;

/// Hard cap for scripted runs. Two sides whose attacks cannot pierce each
/// other's defense would otherwise trade zero-damage blows forever.
const MAX_ROUNDS: u32 = 30;

/// A whole encounter in one value: the seed plus both sides.
#[derive(Debug, Clone, Deserialize)]
pub struct EncounterConfig {
    #[serde(default)]
    pub seed: u64,
    pub players: Vec<CombatantSpec>,
    pub enemies: Vec<CombatantSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CombatantSpec {
    pub name: String,
    pub archetype: Archetype,
}

/// What a scripted run produced, ready to serialize.
#[derive(Debug, Clone, Serialize)]
pub struct BattleReport {
    pub winner: String,
    pub rounds: u32,
    pub reward: Reward,
    pub log: Vec<LogEntry>,
}

/// Runs an encounter unattended: no selections are made, so every
/// combatant falls back to the basic attack against a random target each
/// turn. The run ends at a terminal state or at the round cap.
pub fn run_battle(cfg: &EncounterConfig) -> Result<BattleReport> {
    if cfg.players.is_empty() {
        bail!("encounter has no player side");
    }
    if cfg.enemies.is_empty() {
        bail!("encounter has no enemy side");
    }

    let mut rng = Rng::from_seed(cfg.seed);
    let mut roster = Roster::new();
    let mut combatants = Vec::new();
    for (idx, spec) in cfg.players.iter().enumerate() {
        let id = roster.add(Character::new(
            format!("player_{idx}"),
            spec.name.clone(),
            spec.archetype,
            &mut rng,
        ));
        combatants.push((id, true));
    }
    for (idx, spec) in cfg.enemies.iter().enumerate() {
        let id = roster.add(Character::new(
            format!("enemy_{idx}"),
            spec.name.clone(),
            spec.archetype,
            &mut rng,
        ));
        combatants.push((id, false));
    }

    let mut battle = Battle::new("scripted", rng);
    for (id, is_player) in combatants {
        battle.add_participant(&roster, id, is_player);
    }
    battle.start(&roster);

    while battle.state() == BattleState::InProgress && battle.current_round <= MAX_ROUNDS {
        battle.execute_turn(&mut roster);
    }

    let winner = match battle.state() {
        BattleState::PlayerWon => "players",
        BattleState::EnemiesWon => "enemies",
        BattleState::Draw => "draw",
        BattleState::InProgress | BattleState::NotStarted => "undecided",
    };

    Ok(BattleReport {
        winner: winner.to_string(),
        rounds: battle.current_round,
        reward: battle.reward().clone(),
        log: battle.log().to_vec(),
    })
}

/// Reads an encounter config from a JSON file.
pub fn load_config(path: &Path) -> Result<EncounterConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading encounter config {}", path.display()))?;
    let cfg = serde_json::from_str(&raw)
        .with_context(|| format!("parsing encounter config {}", path.display()))?;
    Ok(cfg)
}

/// Looks up a built-in encounter by name.
pub fn builtin_encounter(name: &str) -> Result<EncounterConfig> {
    let raw = crate::content::builtin_encounters()
        .get(name)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("unknown encounter '{name}'"))?;
    let cfg = serde_json::from_str(raw)
        .with_context(|| format!("parsing built-in encounter '{name}'"))?;
    Ok(cfg)
}
