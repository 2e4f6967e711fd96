//! Wire types for digitduel.
//!
//! Everything that travels between client and server is defined here:
//! identity newtypes, the inbound [`ClientEvent`] vocabulary, the outbound
//! [`ServerEvent`] vocabulary, and the snapshot structures that describe a
//! game session to a connected player.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected player.
///
/// Assigned by the server when a connection is accepted; valid for the
/// lifetime of that connection. Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A room identifier: three digits followed by three uppercase letters,
/// e.g. `482QTZ`.
///
/// Externally supplied identifiers are case-normalized to uppercase before
/// validation, so `482qtz` and `482QTZ` address the same room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Parses and normalizes a raw token into a room identifier.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidRoomId`] if the token does not match
    /// the `\d{3}[A-Z]{3}` pattern after uppercasing.
    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        let normalized = token.trim().to_ascii_uppercase();
        let bytes = normalized.as_bytes();
        let well_formed = bytes.len() == 6
            && bytes[..3].iter().all(u8::is_ascii_digit)
            && bytes[3..].iter().all(u8::is_ascii_uppercase);
        if !well_formed {
            return Err(ProtocolError::InvalidRoomId(token.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Generates a random room identifier matching the required pattern.
    pub fn generate() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let digits: u32 = rng.random_range(100..1000);
        let letters: String = (0..3)
            .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
            .collect();
        Self(format!("{digits}{letters}"))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Game records
// ---------------------------------------------------------------------------

/// Per-digit feedback on a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hint {
    /// The guessed digit matches the target digit.
    Correct,
    /// The guessed digit is too low — the matching digit is higher.
    Higher,
    /// The guessed digit is too high — the matching digit is lower.
    Lower,
}

/// The outcome of comparing one digit position of a guess to the secret.
///
/// Position 0 is the thousands place, position 3 the ones place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitResult {
    pub position: u8,
    pub guess_digit: u8,
    pub target_digit: u8,
    pub correct: bool,
    pub hint: Hint,
}

/// One evaluated guess, as appended to a session's history and broadcast
/// to the room. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub guesser_id: PlayerId,
    pub guesser_name: String,
    pub target_id: PlayerId,
    pub target_name: String,
    pub guess: u32,
    pub digit_results: [DigitResult; 4],
    pub all_correct: bool,
    /// Unix epoch milliseconds at evaluation time.
    pub timestamp_ms: u64,
}

// ---------------------------------------------------------------------------
// Session snapshots
// ---------------------------------------------------------------------------

/// The lifecycle phase of a game session.
///
/// ```text
/// Lobby → InProgress → Ended ─(restart)→ Lobby
/// ```
///
/// - **Lobby**: accepting joins, collecting secrets.
/// - **InProgress**: turn-based guessing.
/// - **Ended**: a win or draw occurred; frozen until restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    InProgress,
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

/// How a finished round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Outcome {
    /// A player guessed a secret exactly.
    Winner { player_id: PlayerId },
    /// Every player ran out of guesses.
    Draw,
}

/// A member of a session, as visible to every other member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub is_ready: bool,
    pub guesses_used: u8,
    pub guesses_remaining: u8,
}

/// A full view of a session, tailored to one recipient.
///
/// `your_secret` carries only the recipient's own committed secret; other
/// players' secrets never appear in any outbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub room_id: RoomId,
    pub creator_name: String,
    pub phase: Phase,
    pub players: Vec<PlayerSnapshot>,
    pub turn_holder: Option<PlayerId>,
    pub winner: Option<Outcome>,
    pub history: Vec<GuessRecord>,
    pub your_secret: Option<u32>,
    pub max_guesses: u8,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Messages a client sends to the server.
///
/// Internally tagged: `{ "type": "Join", "room_id": "...", ... }`. The
/// acting player is implicit in the connection for everything but `Join`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Join (or create) the room with the given identifier.
    Join {
        room_id: String,
        display_name: String,
    },

    /// Commit a secret number for the upcoming round.
    SetSecret { secret_number: u32 },

    /// Guess another player's secret.
    Guess { target_id: PlayerId, guess: u32 },

    /// Reset the current room to a fresh round.
    Restart,

    /// Query server status (active room count and identifiers).
    Status,
}

/// Messages the server sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Unicast reply to a `Join` attempt.
    Joined {
        success: bool,
        reason: Option<String>,
        player_id: Option<PlayerId>,
        session: Option<SessionSnapshot>,
    },

    /// Room-wide state push after any mutation.
    SessionUpdated { session: SessionSnapshot },

    /// Room-wide announcement of an evaluated guess. Always precedes the
    /// `SessionUpdated` that reflects the same guess.
    GuessMade { record: GuessRecord },

    /// Unicast rejection of an invalid action.
    ActionRejected { reason: String },

    /// Reply to a `Status` query.
    Status {
        total_rooms: usize,
        rooms: Vec<RoomId>,
        server_time_ms: u64,
    },
}

// =========================================================================
// Tests
// =========================================================================
