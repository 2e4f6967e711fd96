//! Error types for the game session engine.

use digitduel_protocol::{PlayerId, RoomId};

/// Client-input errors: the acting player did something the rules forbid.
///
/// These are reported back to the acting connection only. They are never
/// fatal to a session and never broadcast room-wide.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Another member of the session already uses this display name
    /// (case-insensitive).
    #[error("display name already taken in this room")]
    NameTaken,

    /// The secret is not a 4-digit number.
    #[error("secret must be a 4-digit number (1000-9999)")]
    InvalidSecret,

    /// The guess is not a 4-digit number.
    #[error("guess must be a 4-digit number (1000-9999)")]
    InvalidGuess,

    /// The acting player does not hold the turn.
    #[error("not your turn")]
    NotYourTurn,

    /// The acting player's guess budget for this round is exhausted.
    #[error("no guesses remaining")]
    NoGuessesRemaining,

    /// The guess target is not a member or has no committed secret.
    #[error("target player {0} not found or has no secret")]
    TargetNotFound(PlayerId),
}

/// Routing errors from the room registry.
///
/// Unlike [`GameError`], these are not rule violations — they mean an event
/// could not be delivered to a session at all.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The player is already a member of a room. A player can be in at
    /// most one room at a time.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The acting player is not in any room, so the event has no session
    /// to land in.
    #[error("player {0} is not in any room")]
    NotInRoom(PlayerId),

    /// The room's actor task is gone or its command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// The session rejected the action.
    #[error(transparent)]
    Rejected(#[from] GameError),
}
