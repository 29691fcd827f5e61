use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::player::{Player, PlayerInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room is closed")]
    Closed,
    #[error("room is full")]
    Full,
    #[error("player already in room")]
    AlreadyJoined,
    #[error("player not in room")]
    NotInRoom,
}

/// A game room: a bounded, insertion-ordered set of players plus a status.
#[derive(Debug)]
pub struct Room {
    id: String,
    max_players: usize,
    state: RwLock<RoomState>,
}

#[derive(Debug)]
struct RoomState {
    name: String,
    players: IndexMap<String, Arc<Player>>,
    status: RoomStatus,
    created_at: SystemTime,
    updated_at: SystemTime,
}

/// Point-in-time copy of a room, safe to serialize.
#[derive(Debug, Clone, Serialize)]
pub struct RoomInfo {
    pub id: String,
    pub name: String,
    pub players: Vec<PlayerInfo>,
    pub max_players: usize,
    pub status: RoomStatus,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_players: usize) -> Self {
        let now = SystemTime::now();
        Self {
            id: id.into(),
            max_players,
            state: RwLock::new(RoomState {
                name: name.into(),
                players: IndexMap::new(),
                status: RoomStatus::Waiting,
                created_at: now,
                updated_at: now,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RoomState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RoomState> {
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

    pub fn status(&self) -> RoomStatus {
        self.read().status
    }

    pub fn set_status(&self, status: RoomStatus) {
        let mut state = self.write();
        state.status = status;
        state.updated_at = SystemTime::now();
    }

    pub fn player_count(&self) -> usize {
        self.read().players.len()
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    pub fn add_player(&self, player: Arc<Player>) -> Result<(), RoomError> {
        let mut state = self.write();
        if state.status == RoomStatus::Closed {
            return Err(RoomError::Closed);
        }
        if state.players.len() >= self.max_players {
            return Err(RoomError::Full);
        }
        if state.players.contains_key(player.id()) {
            return Err(RoomError::AlreadyJoined);
        }
        state.players.insert(player.id().to_string(), player);
        state.updated_at = SystemTime::now();
        Ok(())
    }

    pub fn remove_player(&self, player_id: &str) -> Result<(), RoomError> {
        let mut state = self.write();
        if state.players.shift_remove(player_id).is_none() {
            return Err(RoomError::NotInRoom);
        }
        state.updated_at = SystemTime::now();
        Ok(())
    }

    pub fn player(&self, player_id: &str) -> Option<Arc<Player>> {
        self.read().players.get(player_id).cloned()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.read().players.contains_key(player_id)
    }

    /// Members in join order.
    pub fn players(&self) -> Vec<Arc<Player>> {
        self.read().players.values().cloned().collect()
    }

    pub fn is_full(&self) -> bool {
        self.read().players.len() >= self.max_players
    }

    pub fn is_empty(&self) -> bool {
        self.read().players.is_empty()
    }

    pub fn created_at(&self) -> SystemTime {
        self.read().created_at
    }

    pub fn updated_at(&self) -> SystemTime {
        self.read().updated_at
    }

    pub fn snapshot(&self) -> RoomInfo {
        let state = self.read();
        RoomInfo {
            id: self.id.clone(),
            name: state.name.clone(),
            players: state.players.values().map(|p| p.snapshot()).collect(),
            max_players: self.max_players,
            status: state.status,
        }
    }
}
