//! The per-room session state machine.
//!
//! All gameplay rules live here as plain synchronous methods on
//! [`Session`]: membership, phase transitions, turn tracking, guess
//! history, and the win/draw conditions. The methods never perform I/O —
//! the room actor wraps them and handles broadcasting, which keeps every
//! transition unit-testable without a runtime.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use digitduel_protocol::{
    GuessRecord, Outcome, Phase, PlayerId, PlayerSnapshot, RoomId, SessionSnapshot,
};
use serde::{Deserialize, Serialize};

use crate::{evaluate, turn, GameError};

/// Tunable rules shared by every session a registry creates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoomRules {
    /// Per-round guess budget for each player.
    pub max_guesses: u8,

    /// Minimum members required before an all-ready lobby starts a round.
    pub min_players_to_start: usize,
}

impl Default for RoomRules {
    fn default() -> Self {
        Self {
            max_guesses: 20,
            min_players_to_start: 2,
        }
    }
}

/// A connected participant within one session.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_ready: bool,
    pub guesses_used: u8,
    pub guesses_remaining: u8,
}

impl Player {
    fn new(id: PlayerId, name: String, max_guesses: u8) -> Self {
        Self {
            id,
            name,
            is_ready: false,
            guesses_used: 0,
            guesses_remaining: max_guesses,
        }
    }

    fn reset_round(&mut self, max_guesses: u8) {
        self.is_ready = false;
        self.guesses_used = 0;
        self.guesses_remaining = max_guesses;
    }
}

/// The authoritative state of one room.
///
/// Member order is join order and is semantically meaningful: it defines
/// turn rotation and the first-member fallback for the turn holder.
#[derive(Debug)]
pub struct Session {
    id: RoomId,
    creator_name: String,
    players: Vec<Player>,
    phase: Phase,
    turn_holder: Option<PlayerId>,
    winner: Option<Outcome>,
    history: Vec<GuessRecord>,
    secrets: HashMap<PlayerId, u32>,
    rules: RoomRules,
}

impl Session {
    /// Creates an empty session in the `Lobby` phase.
    ///
    /// `creator_name` records which participant caused the session to be
    /// created (informational only).
    pub fn new(id: RoomId, creator_name: &str, rules: RoomRules) -> Self {
        Self {
            id,
            creator_name: creator_name.to_string(),
            players: Vec::new(),
            phase: Phase::Lobby,
            turn_holder: None,
            winner: None,
            history: Vec::new(),
            secrets: HashMap::new(),
            rules,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn_holder(&self) -> Option<PlayerId> {
        self.turn_holder
    }

    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    pub fn history(&self) -> &[GuessRecord] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if the identity is a current member.
    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    /// Member identities in join order.
    pub fn member_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    // -----------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------

    /// Adds a member. Permitted in any phase: a mid-round joiner is simply
    /// not ready and sits out until the next round starts.
    ///
    /// The first member ever added becomes the turn holder.
    pub fn join(&mut self, id: PlayerId, name: &str) -> Result<(), GameError> {
        if self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name))
        {
            return Err(GameError::NameTaken);
        }

        self.players
            .push(Player::new(id, name.to_string(), self.rules.max_guesses));
        if self.turn_holder.is_none() {
            self.turn_holder = Some(id);
        }
        Ok(())
    }

    /// Records the acting player's secret for the upcoming round and marks
    /// them ready. Re-arming with a new secret before the round starts is
    /// allowed and simply replaces the previous one.
    ///
    /// When this update leaves at least `min_players_to_start` members all
    /// ready in the lobby, the round begins.
    pub fn set_secret(&mut self, id: PlayerId, secret: u32) -> Result<(), GameError> {
        if !evaluate::in_range(secret) {
            return Err(GameError::InvalidSecret);
        }

        self.secrets.insert(id, secret);
        if let Some(player) = self.player_mut(id) {
            player.is_ready = true;
        }

        let all_ready = self.players.len() >= self.rules.min_players_to_start
            && self.players.iter().all(|p| p.is_ready);
        if self.phase == Phase::Lobby && all_ready {
            self.phase = Phase::InProgress;
            tracing::info!(room_id = %self.id, players = self.players.len(), "round started");
        }
        Ok(())
    }

    /// Evaluates a guess by the acting player against `target`'s secret.
    ///
    /// Returns `Ok(None)` when no round is in progress — a stale guess is
    /// silently ignored rather than rejected. On success the session may
    /// transition to `Ended` (win on exact match, draw when every member's
    /// guess budget is exhausted).
    pub fn guess(
        &mut self,
        guesser: PlayerId,
        target: PlayerId,
        value: u32,
    ) -> Result<Option<GuessRecord>, GameError> {
        if self.phase != Phase::InProgress {
            return Ok(None);
        }
        if self.turn_holder != Some(guesser) {
            return Err(GameError::NotYourTurn);
        }
        let remaining = self
            .player(guesser)
            .map(|p| p.guesses_remaining)
            .unwrap_or(0);
        if remaining == 0 {
            return Err(GameError::NoGuessesRemaining);
        }
        if !evaluate::in_range(value) {
            return Err(GameError::InvalidGuess);
        }
        let secret = *self
            .secrets
            .get(&target)
            .ok_or(GameError::TargetNotFound(target))?;
        let target_name = self
            .player(target)
            .map(|p| p.name.clone())
            .ok_or(GameError::TargetNotFound(target))?;

        let guesser_name = match self.player_mut(guesser) {
            Some(player) => {
                player.guesses_used += 1;
                player.guesses_remaining -= 1;
                player.name.clone()
            }
            // Turn holder is always a member; unreachable in practice.
            None => return Err(GameError::NotYourTurn),
        };

        let digit_results = evaluate::evaluate(value, secret);
        let all_correct = evaluate::all_correct(&digit_results);

        let record = GuessRecord {
            guesser_id: guesser,
            guesser_name,
            target_id: target,
            target_name,
            guess: value,
            digit_results,
            all_correct,
            timestamp_ms: now_ms(),
        };
        self.history.push(record.clone());

        if all_correct {
            self.phase = Phase::Ended;
            self.winner = Some(Outcome::Winner { player_id: guesser });
            tracing::info!(room_id = %self.id, winner = %guesser, "round won");
        } else {
            let order = self.member_ids();
            self.turn_holder = turn::next_holder(&order, guesser).or(order.first().copied());

            if self.players.iter().all(|p| p.guesses_remaining == 0) {
                self.phase = Phase::Ended;
                self.winner = Some(Outcome::Draw);
                tracing::info!(room_id = %self.id, "round drawn, all guesses exhausted");
            }
        }

        Ok(Some(record))
    }

    /// Resets the session for a fresh round. Membership is retained; the
    /// turn goes back to the first member in join order.
    pub fn restart(&mut self) {
        self.phase = Phase::Lobby;
        self.reset_round();
        self.turn_holder = self.players.first().map(|p| p.id);
    }

    /// Removes a departing member.
    ///
    /// If the departing member held the turn, the turn is reseated to the
    /// new first member. An abrupt departure mid-round invalidates the
    /// round for everyone: the session drops back to `Lobby` with secrets,
    /// history, readiness, and guess counters cleared.
    ///
    /// Returns `true` if the session is now empty and should be destroyed.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        self.players.retain(|p| p.id != id);
        self.secrets.remove(&id);

        if self.players.is_empty() {
            return true;
        }

        if self.turn_holder == Some(id) {
            self.turn_holder = self.players.first().map(|p| p.id);
        }

        if self.phase == Phase::InProgress {
            self.phase = Phase::Lobby;
            self.reset_round();
        }
        false
    }

    fn reset_round(&mut self) {
        self.winner = None;
        self.history.clear();
        self.secrets.clear();
        let max_guesses = self.rules.max_guesses;
        for player in &mut self.players {
            player.reset_round(max_guesses);
        }
    }

    // -----------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------

    /// Builds the session view sent to one recipient.
    ///
    /// Snapshots are per-recipient because secrets are redacted: only the
    /// viewer's own committed secret is included.
    pub fn snapshot_for(&self, viewer: PlayerId) -> SessionSnapshot {
        SessionSnapshot {
            room_id: self.id.clone(),
            creator_name: self.creator_name.clone(),
            phase: self.phase,
            players: self
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id,
                    name: p.name.clone(),
                    is_ready: p.is_ready,
                    guesses_used: p.guesses_used,
                    guesses_remaining: p.guesses_remaining,
                })
                .collect(),
            turn_holder: self.turn_holder,
            winner: self.winner,
            history: self.history.clone(),
            your_secret: self.secrets.get(&viewer).copied(),
            max_guesses: self.rules.max_guesses,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
