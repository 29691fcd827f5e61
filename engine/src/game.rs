use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use thiserror::Error;

use crate::player::Player;
use crate::room::{Room, RoomError, RoomStatus};

const MIN_PLAYERS_TO_START: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("room not found")]
    RoomNotFound,
    #[error("player not found")]
    PlayerNotFound,
    #[error("need at least {0} players to start a game")]
    NotEnoughPlayers(usize),
    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Top-level registry of players and rooms. Each table sits behind its own
/// reader/writer lock, so concurrent create/read/update/delete is safe.
/// The battle engine never touches this type; it only ever receives
/// characters from a driver.
#[derive(Debug, Default)]
pub struct Game {
    rooms: RwLock<IndexMap<String, Arc<Room>>>,
    players: RwLock<IndexMap<String, Arc<Player>>>,
}

type RoomTable = IndexMap<String, Arc<Room>>;
type PlayerTable = IndexMap<String, Arc<Player>>;

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    fn rooms(&self) -> RwLockReadGuard<'_, RoomTable> {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn rooms_mut(&self) -> RwLockWriteGuard<'_, RoomTable> {
        self.rooms.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn players(&self) -> RwLockReadGuard<'_, PlayerTable> {
        self.players.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn players_mut(&self) -> RwLockWriteGuard<'_, PlayerTable> {
        self.players.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_room(&self, id: &str, name: &str, max_players: usize) -> Arc<Room> {
        let room = Arc::new(Room::new(id, name, max_players));
        self.rooms_mut().insert(id.to_string(), Arc::clone(&room));
        tracing::debug!(room = id, max_players, "room created");
        room
    }

    pub fn room(&self, room_id: &str) -> Option<Arc<Room>> {
        self.rooms().get(room_id).cloned()
    }

    /// Drops a room, evicting every member first.
    pub fn delete_room(&self, room_id: &str) -> Result<(), GameError> {
        let room = self
            .rooms_mut()
            .shift_remove(room_id)
            .ok_or(GameError::RoomNotFound)?;
        for player in room.players() {
            let _ = room.remove_player(player.id());
        }
        Ok(())
    }

    /// Every room, in creation order.
    pub fn all_rooms(&self) -> Vec<Arc<Room>> {
        self.rooms().values().cloned().collect()
    }

    pub fn register_player(&self, id: &str, name: &str) -> Arc<Player> {
        let player = Arc::new(Player::new(id, name));
        self.players_mut()
            .insert(id.to_string(), Arc::clone(&player));
        tracing::debug!(player = id, "player registered");
        player
    }

    pub fn player(&self, player_id: &str) -> Option<Arc<Player>> {
        self.players().get(player_id).cloned()
    }

    /// Removes a player from the registry and from every room it joined.
    pub fn unregister_player(&self, player_id: &str) -> Result<(), GameError> {
        if self.players_mut().shift_remove(player_id).is_none() {
            return Err(GameError::PlayerNotFound);
        }
        for room in self.all_rooms() {
            if room.contains(player_id) {
                let _ = room.remove_player(player_id);
            }
        }
        Ok(())
    }

    /// Every player, in registration order.
    pub fn all_players(&self) -> Vec<Arc<Player>> {
        self.players().values().cloned().collect()
    }

    pub fn join_room(&self, player_id: &str, room_id: &str) -> Result<(), GameError> {
        let player = self.player(player_id).ok_or(GameError::PlayerNotFound)?;
        let room = self.room(room_id).ok_or(GameError::RoomNotFound)?;
        room.add_player(player)?;
        Ok(())
    }

    pub fn leave_room(&self, player_id: &str, room_id: &str) -> Result<(), GameError> {
        let room = self.room(room_id).ok_or(GameError::RoomNotFound)?;
        room.remove_player(player_id)?;
        Ok(())
    }

    pub fn room_count(&self) -> usize {
        self.rooms().len()
    }

    pub fn player_count(&self) -> usize {
        self.players().len()
    }

    pub fn start_game(&self, room_id: &str) -> Result<(), GameError> {
        let room = self.room(room_id).ok_or(GameError::RoomNotFound)?;
        if room.player_count() < MIN_PLAYERS_TO_START {
            return Err(GameError::NotEnoughPlayers(MIN_PLAYERS_TO_START));
        }
        room.set_status(RoomStatus::Playing);
        Ok(())
    }

    pub fn end_game(&self, room_id: &str) -> Result<(), GameError> {
        let room = self.room(room_id).ok_or(GameError::RoomNotFound)?;
        room.set_status(RoomStatus::Waiting);
        Ok(())
    }
}
