//! Room registry: resolves room identifiers to live sessions.
//!
//! Sessions are created on demand by the first join to an unseen room
//! identifier and destroyed the instant their membership drains to zero.
//! An identity→room index answers "which session does this connection
//! belong to" without scanning every room, since most actions carry only
//! the acting identity.

use std::collections::HashMap;

use digitduel_protocol::{PlayerId, RoomId};

use crate::room::spawn_room;
use crate::{
    PlayerAction, PlayerSender, RegistryError, RoomHandle, RoomInfo, RoomRules, Session,
};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Owns the room-id→session mapping and the reverse player index.
///
/// This is the only state shared across sessions; callers guard it with a
/// single coarse lock. Per-session gameplay never runs under that lock —
/// it happens inside each room's actor task.
pub struct RoomRegistry {
    /// Active rooms, keyed by room identifier.
    rooms: HashMap<RoomId, RoomHandle>,

    /// Maps each player to the room they're currently in.
    /// A player can be in at most ONE room at a time (key invariant).
    player_rooms: HashMap<PlayerId, RoomId>,

    /// Rules applied to every session this registry creates.
    rules: RoomRules,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new(rules: RoomRules) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            rules,
        }
    }

    /// Resolves `room_id` to a session — creating one if absent — and
    /// joins the player to it.
    ///
    /// On success the reverse index is updated and the session has
    /// already unicast `Joined` to the new member. A rejection by the
    /// session (duplicate display name) surfaces as
    /// [`crate::GameError::NameTaken`].
    pub async fn join(
        &mut self,
        player_id: PlayerId,
        room_id: RoomId,
        display_name: &str,
        sender: PlayerSender,
    ) -> Result<(), RegistryError> {
        if let Some(current) = self.player_rooms.get(&player_id) {
            return Err(RegistryError::AlreadyInRoom(player_id, current.clone()));
        }

        let handle = match self.rooms.get(&room_id) {
            Some(handle) => handle.clone(),
            None => {
                let session = Session::new(room_id.clone(), display_name, self.rules);
                let handle = spawn_room(session, DEFAULT_CHANNEL_SIZE);
                self.rooms.insert(room_id.clone(), handle.clone());
                tracing::info!(%room_id, creator = display_name, "room created");
                handle
            }
        };

        handle.join(player_id, display_name, sender).await??;
        self.player_rooms.insert(player_id, room_id);
        Ok(())
    }

    /// Routes a gameplay action to the acting player's session, found via
    /// the reverse index.
    pub async fn route(
        &self,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<(), RegistryError> {
        let room_id = self
            .player_rooms
            .get(&player_id)
            .ok_or(RegistryError::NotInRoom(player_id))?;
        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RegistryError::Unavailable(room_id.clone()))?;
        handle.action(player_id, action).await
    }

    /// Removes a departed player from their session and deletes the
    /// session if it is now empty.
    pub async fn disconnect(&mut self, player_id: PlayerId) -> Result<(), RegistryError> {
        let room_id = self
            .player_rooms
            .remove(&player_id)
            .ok_or(RegistryError::NotInRoom(player_id))?;

        let Some(handle) = self.rooms.get(&room_id) else {
            return Ok(());
        };

        match handle.leave(player_id).await {
            Ok(true) => {
                self.rooms.remove(&room_id);
                tracing::info!(%room_id, "room removed (no players left)");
            }
            Ok(false) => {}
            // Actor already gone; drop the stale handle.
            Err(RegistryError::Unavailable(_)) => {
                self.rooms.remove(&room_id);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Returns the room a player is currently in, if any.
    pub fn player_room(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(player_id)
    }

    /// Returns metadata for one room.
    pub async fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RegistryError> {
        let handle = self
            .rooms
            .get(room_id)
            .ok_or_else(|| RegistryError::Unavailable(room_id.clone()))?;
        handle.info().await
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all active room identifiers.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomRules::default())
    }
}
