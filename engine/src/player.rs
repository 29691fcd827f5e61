use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use serde::Serialize;

/// A registered player account. Mutable fields sit behind the record's own
/// reader/writer lock so the registry can hand out shared references.
#[derive(Debug)]
pub struct Player {
    id: String,
    state: RwLock<PlayerState>,
}

#[derive(Debug)]
struct PlayerState {
    name: String,
    level: i32,
    score: i32,
    created_at: SystemTime,
    updated_at: SystemTime,
}

/// Point-in-time copy of a player, safe to serialize and ship around.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub level: i32,
    pub score: i32,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = SystemTime::now();
        Self {
            id: id.into(),
            state: RwLock::new(PlayerState {
                name: name.into(),
                level: 1,
                score: 0,
                created_at: now,
                updated_at: now,
            }),
        }
    }

    // The guarded state is plain data, so a poisoned lock still holds a
    // valid value; recover it instead of propagating the panic.
    fn read(&self) -> RwLockReadGuard<'_, PlayerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PlayerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> String {
        self.read().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let mut state = self.write();
        state.name = name.into();
        state.updated_at = SystemTime::now();
    }

    pub fn level(&self) -> i32 {
        self.read().level
    }

    pub fn level_up(&self) {
        let mut state = self.write();
        state.level += 1;
        state.updated_at = SystemTime::now();
    }

    pub fn score(&self) -> i32 {
        self.read().score
    }

    pub fn add_score(&self, points: i32) {
        let mut state = self.write();
        state.score += points;
        state.updated_at = SystemTime::now();
    }

    pub fn created_at(&self) -> SystemTime {
        self.read().created_at
    }

    pub fn updated_at(&self) -> SystemTime {
        self.read().updated_at
    }

    pub fn snapshot(&self) -> PlayerInfo {
        let state = self.read();
        PlayerInfo {
            id: self.id.clone(),
            name: state.name.clone(),
            level: state.level,
            score: state.score,
            created_at: state.created_at,
            updated_at: state.updated_at,
        }
    }
}
