//! Turn-based battle engine: characters, skill rosters, the battle state
//! machine, a scripted encounter harness, and the lock-guarded player/room
//! registry that sits in front of it all.

pub mod api;
pub mod battle;
pub mod character;
pub mod content;
pub mod game;
pub mod player;
pub mod room;
pub mod skill;

use rand::{Rng as _, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use battle::{
    Battle, BattleError, BattleState, Effect, EffectKind, LogEntry, Participant, ParticipantId,
    Reward,
};
pub use character::{Archetype, Character, CharacterId, Roster};
pub use skill::{skills_for, Skill, SkillKind, TargetMode};

/// The one random source behind every roll in the system: stat creation,
/// level-up growth, attack variance, fallback targeting, and status procs.
/// Seed it once, thread it through character creation, then hand it to the
/// battle that will own it, so a whole session replays from a single seed.
#[derive(Debug, Clone)]
pub struct Rng {
    inner: ChaCha8Rng,
}

impl Rng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform draw from `lo..=hi`.
    pub fn roll(&mut self, lo: i32, hi: i32) -> i32 {
        self.inner.gen_range(lo..=hi)
    }

    /// True with `percent` chance out of 100.
    pub fn chance(&mut self, percent: u32) -> bool {
        self.inner.gen_range(0..100u32) < percent
    }

    /// Uniform index below `len`. `len` must be nonzero.
    pub fn pick(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}
