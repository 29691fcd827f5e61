use serde::Serialize;
use thiserror::Error;

use crate::character::{CharacterId, Roster};
use crate::skill::{Skill, SkillKind, TargetMode};
use crate::Rng;

/// Lifecycle of a battle. The three outcome states are terminal: once one
/// holds, no further turn executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleState {
    NotStarted,
    InProgress,
    PlayerWon,
    EnemiesWon,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Stun,
    Poison,
    Slow,
    Buff,
}

impl EffectKind {
    fn noun(self) -> &'static str {
        match self {
            EffectKind::Stun => "stun",
            EffectKind::Poison => "poison",
            EffectKind::Slow => "slow",
            EffectKind::Buff => "buff",
        }
    }
}

/// A timed status effect attached to one participant. `remaining` counts
/// down exactly once per round, at the round boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub duration: u32,
    pub remaining: u32,
    pub value: i32,
}

/// Handle to one participant of one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParticipantId(pub usize);

/// Battle-scoped wrapper around a character: side affiliation, a cached
/// alive flag kept in lockstep with the character, the speed snapshot used
/// for the initial ordering, active effects, and the pending action for the
/// upcoming turn.
#[derive(Debug, Clone)]
pub struct Participant {
    pub character: CharacterId,
    pub is_player: bool,
    pub is_alive: bool,
    pub speed: i32,
    pub effects: Vec<Effect>,
    pub pending_skill: Option<Skill>,
    pub pending_target: Option<ParticipantId>,
}

/// One narrative line of the battle log. Entries are append-only and
/// non-decreasing in `(round, turn)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub round: u32,
    pub turn: u32,
    pub text: String,
}

/// Spoils granted when the player side wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub exp: i32,
    pub gold: i32,
    pub items: Vec<String>,
}

/// Why a selection was rejected. Every rejection leaves the battle
/// untouched; nothing in the engine is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("battle is not in progress")]
    NotInProgress,
    #[error("a defeated participant cannot act")]
    ParticipantDefeated,
    #[error("a defeated participant cannot be targeted")]
    TargetDefeated,
    #[error("not enough MP for {skill}")]
    NotEnoughMp { skill: String },
    #[error("{skill} can only target its user")]
    SelfTargetOnly { skill: String },
}

/// A turn-based battle between a player side and an enemy side.
///
/// A single driver loop owns the character [`Roster`] and calls the
/// protocol methods in lockstep: optional `select_skill`/`select_target`
/// for the current participant, then `execute_turn`, until `state()` turns
/// terminal. The engine never blocks and provides no locking of its own.
#[derive(Debug)]
pub struct Battle {
    pub id: String,
    /// Insertion order; membership is fixed once the battle starts.
    pub participants: Vec<Participant>,
    /// Permutation of `participants`, computed exactly once at `start`.
    pub turn_order: Vec<ParticipantId>,
    pub current_turn: usize,
    pub current_round: u32,
    state: BattleState,
    log: Vec<LogEntry>,
    reward: Reward,
    rng: Rng,
}

impl Battle {
    pub fn new(id: impl Into<String>, rng: Rng) -> Self {
        Self {
            id: id.into(),
            participants: Vec::new(),
            turn_order: Vec::new(),
            current_turn: 0,
            current_round: 0,
            state: BattleState::NotStarted,
            log: Vec::new(),
            reward: Reward::default(),
            rng,
        }
    }

    /// Adds a combatant. Meant to be called before [`Battle::start`]; the
    /// alive flag and ordering speed are snapshotted from the character.
    pub fn add_participant(
        &mut self,
        roster: &Roster,
        character: CharacterId,
        is_player: bool,
    ) -> ParticipantId {
        let ch = roster.get(character);
        self.participants.push(Participant {
            character,
            is_player,
            is_alive: ch.is_alive(),
            speed: ch.speed,
            effects: Vec::new(),
            pending_skill: None,
            pending_target: None,
        });
        ParticipantId(self.participants.len() - 1)
    }

    /// Begins the battle. With fewer than two participants this only logs
    /// a failure line and stays `NotStarted`; callers check `state()`.
    pub fn start(&mut self, roster: &Roster) {
        if self.participants.len() < 2 {
            self.log.push(LogEntry {
                round: 0,
                turn: 0,
                text: "A battle needs at least two participants".to_string(),
            });
            return;
        }

        // Faster participants act first; ties keep join order (stable sort).
        let mut order: Vec<ParticipantId> =
            (0..self.participants.len()).map(ParticipantId).collect();
        order.sort_by(|a, b| self.participants[b.0].speed.cmp(&self.participants[a.0].speed));
        self.turn_order = order;

        self.state = BattleState::InProgress;
        self.current_round = 1;
        self.current_turn = 0;

        self.log.push(LogEntry {
            round: 0,
            turn: 0,
            text: format!("Battle begins! Round {}", self.current_round),
        });
        for p in &self.participants {
            self.log.push(LogEntry {
                round: 0,
                turn: 0,
                text: format!("{} joins the battle", roster.get(p.character).display_name()),
            });
        }
        tracing::debug!(
            battle = %self.id,
            participants = self.participants.len(),
            "battle started"
        );
    }

    /// The participant whose turn it is, while the battle runs.
    pub fn current_participant(&self) -> Option<ParticipantId> {
        if self.state != BattleState::InProgress || self.turn_order.is_empty() {
            return None;
        }
        Some(self.turn_order[self.current_turn])
    }

    /// Stores the skill the participant will use on its next executed turn.
    pub fn select_skill(
        &mut self,
        roster: &Roster,
        participant: ParticipantId,
        skill: &Skill,
    ) -> Result<(), BattleError> {
        if self.state != BattleState::InProgress {
            return Err(BattleError::NotInProgress);
        }
        if !self.participants[participant.0].is_alive {
            return Err(BattleError::ParticipantDefeated);
        }
        if !skill.can_use(roster.get(self.participants[participant.0].character)) {
            return Err(BattleError::NotEnoughMp {
                skill: skill.name.clone(),
            });
        }
        self.participants[participant.0].pending_skill = Some(skill.clone());
        Ok(())
    }

    /// Stores the target for the pending skill. A self-only pending skill
    /// rejects any target other than the participant itself.
    pub fn select_target(
        &mut self,
        participant: ParticipantId,
        target: ParticipantId,
    ) -> Result<(), BattleError> {
        if self.state != BattleState::InProgress {
            return Err(BattleError::NotInProgress);
        }
        if !self.participants[participant.0].is_alive {
            return Err(BattleError::ParticipantDefeated);
        }
        if !self.participants[target.0].is_alive {
            return Err(BattleError::TargetDefeated);
        }
        if let Some(skill) = &self.participants[participant.0].pending_skill {
            if skill.target == TargetMode::SelfOnly && target != participant {
                return Err(BattleError::SelfTargetOnly {
                    skill: skill.name.clone(),
                });
            }
        }
        self.participants[participant.0].pending_target = Some(target);
        Ok(())
    }

    /// Executes the current participant's turn: stun skip, defaulting of
    /// skill and target, resolution, end check, turn advance. A no-op when
    /// the battle is not running.
    pub fn execute_turn(&mut self, roster: &mut Roster) {
        if self.state != BattleState::InProgress {
            return;
        }
        let Some(current) = self.current_participant() else {
            return;
        };

        // A stunned participant loses the turn. Its pending selections
        // survive the skip and carry into its next eligible turn.
        if self.is_stunned(current) {
            let name = self.display_name(roster, current);
            self.push_log(format!("{name} is stunned and skips the turn"));
            self.next_turn(roster);
            return;
        }

        if self.participants[current.0].pending_skill.is_none() {
            self.participants[current.0].pending_skill = Some(Skill::basic_attack());
        }

        if self.participants[current.0].pending_target.is_none() {
            match self.random_alive_target() {
                Some(target) => self.participants[current.0].pending_target = Some(target),
                None => {
                    let name = self.display_name(roster, current);
                    self.push_log(format!("{name} has no target to act against"));
                    self.next_turn(roster);
                    return;
                }
            }
        }

        let (skill, target) = {
            let p = &self.participants[current.0];
            match (p.pending_skill.clone(), p.pending_target) {
                (Some(skill), Some(target)) => (skill, target),
                _ => return,
            }
        };
        self.resolve_skill(roster, current, &skill, target);

        let p = &mut self.participants[current.0];
        p.pending_skill = None;
        p.pending_target = None;

        if self.check_battle_end(roster) {
            return;
        }
        self.next_turn(roster);
    }

    /// Every alive participant, in insertion order.
    pub fn alive_participants(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive)
            .map(|(idx, _)| ParticipantId(idx))
            .collect()
    }

    /// Attaches a timed effect to a participant.
    pub fn apply_effect(
        &mut self,
        target: ParticipantId,
        kind: EffectKind,
        duration: u32,
        value: i32,
    ) {
        self.participants[target.0].effects.push(Effect {
            kind,
            duration,
            remaining: duration,
            value,
        });
    }

    pub fn participant(&self, id: ParticipantId) -> &Participant {
        &self.participants[id.0]
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn reward(&self) -> &Reward {
        &self.reward
    }

    fn push_log(&mut self, text: String) {
        self.log.push(LogEntry {
            round: self.current_round,
            turn: self.current_turn as u32,
            text,
        });
    }

    fn display_name(&self, roster: &Roster, id: ParticipantId) -> String {
        roster.get(self.participants[id.0].character).display_name()
    }

    fn is_stunned(&self, participant: ParticipantId) -> bool {
        self.participants[participant.0]
            .effects
            .iter()
            .any(|e| e.kind == EffectKind::Stun && e.remaining > 0)
    }

    /// Fallback target choice: uniform among every alive participant on
    /// either side, the user included.
    fn random_alive_target(&mut self) -> Option<ParticipantId> {
        let alive = self.alive_participants();
        match alive.len() {
            0 => None,
            1 => Some(alive[0]),
            n => Some(alive[self.rng.pick(n)]),
        }
    }

    /// Debits the mp cost, logs the use, and fans the skill out according
    /// to its target mode.
    fn resolve_skill(
        &mut self,
        roster: &mut Roster,
        user: ParticipantId,
        skill: &Skill,
        target: ParticipantId,
    ) {
        skill.spend(roster.get_mut(self.participants[user.0].character));

        let user_name = self.display_name(roster, user);
        self.push_log(format!("{user_name} used {}", skill.name));

        let user_is_player = self.participants[user.0].is_player;
        match skill.target {
            TargetMode::SingleTarget => self.apply_skill(roster, user, skill, target),
            TargetMode::AllEnemies => {
                for idx in 0..self.participants.len() {
                    if self.participants[idx].is_alive
                        && self.participants[idx].is_player != user_is_player
                    {
                        self.apply_skill(roster, user, skill, ParticipantId(idx));
                    }
                }
            }
            TargetMode::AllAllies => {
                for idx in 0..self.participants.len() {
                    if self.participants[idx].is_alive
                        && self.participants[idx].is_player == user_is_player
                    {
                        self.apply_skill(roster, user, skill, ParticipantId(idx));
                    }
                }
            }
            TargetMode::SelfOnly => self.apply_skill(roster, user, skill, user),
        }
    }

    /// Full per-target resolution: damage, heal, then secondary procs.
    /// Damage and heal are independent branches; both may fire.
    fn apply_skill(
        &mut self,
        roster: &mut Roster,
        user: ParticipantId,
        skill: &Skill,
        target: ParticipantId,
    ) {
        let user_name = self.display_name(roster, user);
        let target_name = self.display_name(roster, target);
        let target_char = self.participants[target.0].character;

        if skill.is_damage_skill() {
            let damage = if skill.kind == SkillKind::BasicAttack {
                roster
                    .get(self.participants[user.0].character)
                    .attack_damage(&mut self.rng)
            } else {
                skill.damage
            };

            let actual = roster.get_mut(target_char).take_damage(damage);
            self.push_log(format!("{user_name} hits {target_name} for {actual} damage"));

            if !roster.get(target_char).is_alive() {
                self.participants[target.0].is_alive = false;
                self.push_log(format!("{target_name} is defeated"));
            }
        }

        if skill.is_healing_skill() {
            let healed = roster.get_mut(target_char).heal(skill.heal);
            self.push_log(format!("{target_name} recovers {healed} HP"));
        }

        match skill.kind {
            SkillKind::ShieldBash => {
                if self.rng.chance(25) {
                    self.apply_effect(target, EffectKind::Stun, 1, 0);
                    self.push_log(format!("{target_name} is stunned"));
                }
            }
            SkillKind::Frostbolt => {
                if self.rng.chance(30) {
                    self.apply_effect(target, EffectKind::Slow, 2, -2);
                    self.push_log(format!("{target_name} is slowed"));
                }
            }
            _ => {}
        }
    }

    fn next_turn(&mut self, roster: &mut Roster) {
        self.current_turn += 1;
        if self.current_turn >= self.turn_order.len() {
            self.current_round += 1;
            self.current_turn = 0;
            self.update_effects(roster);
            let round = self.current_round;
            self.log.push(LogEntry {
                round,
                turn: 0,
                text: format!("Round {round} begins"),
            });
        }
    }

    /// Round-boundary bookkeeping: every effect's remaining drops by one.
    /// Surviving poison ticks its value through `take_damage`; expired
    /// effects are dropped with an expiry line. Slow and buff values are
    /// carried but have no periodic action.
    fn update_effects(&mut self, roster: &mut Roster) {
        for idx in 0..self.participants.len() {
            let name = self.display_name(roster, ParticipantId(idx));
            let effects = std::mem::take(&mut self.participants[idx].effects);
            let mut kept = Vec::new();
            for mut effect in effects {
                effect.remaining = effect.remaining.saturating_sub(1);
                if effect.remaining > 0 {
                    kept.push(effect);
                    if effect.kind == EffectKind::Poison {
                        let char_id = self.participants[idx].character;
                        let actual = roster.get_mut(char_id).take_damage(effect.value);
                        self.log.push(LogEntry {
                            round: self.current_round,
                            turn: 0,
                            text: format!("{name} takes {actual} poison damage"),
                        });
                        if self.participants[idx].is_alive && !roster.get(char_id).is_alive() {
                            self.participants[idx].is_alive = false;
                            self.log.push(LogEntry {
                                round: self.current_round,
                                turn: 0,
                                text: format!("{name} is defeated by poison"),
                            });
                        }
                    }
                } else {
                    self.log.push(LogEntry {
                        round: self.current_round,
                        turn: 0,
                        text: format!("{name}'s {} effect wears off", effect.kind.noun()),
                    });
                }
            }
            self.participants[idx].effects = kept;
        }
    }

    /// Tallies alive participants per side and settles the outcome. Runs
    /// after every resolved action.
    fn check_battle_end(&mut self, roster: &Roster) -> bool {
        let mut alive_players = 0;
        let mut alive_enemies = 0;
        for p in &self.participants {
            if p.is_alive {
                if p.is_player {
                    alive_players += 1;
                } else {
                    alive_enemies += 1;
                }
            }
        }

        if alive_players == 0 && alive_enemies == 0 {
            self.state = BattleState::Draw;
            self.push_log("The battle ends in a draw".to_string());
            true
        } else if alive_players == 0 {
            self.state = BattleState::EnemiesWon;
            self.push_log("The battle is over. The enemies win".to_string());
            true
        } else if alive_enemies == 0 {
            self.state = BattleState::PlayerWon;
            self.push_log("The battle is over. The players win".to_string());
            self.calculate_rewards(roster);
            true
        } else {
            false
        }
    }

    /// Exp and gold accumulate over every defeated non-player participant,
    /// scaled by its level.
    fn calculate_rewards(&mut self, roster: &Roster) {
        let mut total_exp = 0;
        let mut total_gold = 0;
        for p in &self.participants {
            if !p.is_player && !p.is_alive {
                let level = roster.get(p.character).level;
                total_exp += level * 10;
                total_gold += level * 5;
            }
        }
        self.reward.exp = total_exp;
        self.reward.gold = total_gold;

        if total_exp > 0 || total_gold > 0 {
            self.push_log(format!("Spoils: {total_exp} exp and {total_gold} gold"));
        }
        tracing::debug!(battle = %self.id, exp = total_exp, gold = total_gold, "battle won");
    }
}
