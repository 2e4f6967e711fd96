//! Room actor: an isolated Tokio task that owns one [`Session`].
//!
//! Every inbound event for a room is a command on the actor's channel, so
//! the validate-then-mutate sequence of each transition is atomic per
//! session without explicit locking. Rooms never share state; events for
//! different rooms proceed concurrently.

use std::collections::HashMap;

use digitduel_protocol::{Phase, PlayerId, RoomId, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::{GameError, RegistryError, Session};

/// Channel sender for delivering outbound events to one player's
/// connection handler.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// An action a member can take inside their room. The acting identity is
/// supplied by the routing layer, not the payload.
#[derive(Debug, Clone)]
pub enum PlayerAction {
    /// Commit a secret for the upcoming round.
    SetSecret { secret: u32 },
    /// Guess another member's secret.
    Guess { target: PlayerId, guess: u32 },
    /// Reset the room to a fresh round.
    Restart,
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Add a member. On success the actor unicasts `Joined` to the new
    /// member (before the room-wide state push) and the reply is `Ok`.
    Join {
        player_id: PlayerId,
        display_name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), GameError>>,
    },

    /// Deliver a gameplay action from a member (fire-and-forget;
    /// rejections go back over the member's own outbound channel).
    Action {
        player_id: PlayerId,
        action: PlayerAction,
    },

    /// Remove a member. Replies `true` when the room is now empty and the
    /// actor is stopping.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<bool>,
    },

    /// Request room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: Phase,
    pub player_count: usize,
}

/// Handle to a running room actor. Cheap to clone; the registry holds one
/// per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Sends a join request and waits for the session's verdict.
    pub async fn join(
        &self,
        player_id: PlayerId,
        display_name: &str,
        sender: PlayerSender,
    ) -> Result<Result<(), GameError>, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                display_name: display_name.to_string(),
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))
    }

    /// Sends a gameplay action (fire-and-forget).
    pub async fn action(
        &self,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<(), RegistryError> {
        self.sender
            .send(RoomCommand::Action { player_id, action })
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))
    }

    /// Sends a leave request. Returns `true` when the room emptied.
    pub async fn leave(&self, player_id: PlayerId) -> Result<bool, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))
    }

    /// Requests the current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RegistryError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    session: Session,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until the room empties or every handle drops.
    async fn run(mut self) {
        tracing::info!(room_id = %self.session.id(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    display_name,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, &display_name, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Action { player_id, action } => {
                    self.handle_action(player_id, action);
                }
                RoomCommand::Leave { player_id, reply } => {
                    let empty = self.handle_leave(player_id);
                    let _ = reply.send(empty);
                    if empty {
                        break;
                    }
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!(room_id = %self.session.id(), "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        display_name: &str,
        sender: PlayerSender,
    ) -> Result<(), GameError> {
        self.session.join(player_id, display_name)?;
        self.senders.insert(player_id, sender);
        tracing::info!(
            room_id = %self.session.id(),
            %player_id,
            name = display_name,
            players = self.session.member_count(),
            "player joined"
        );

        // The joiner's confirmation goes out before the room-wide push so
        // they learn their own identity first.
        self.send_to(
            player_id,
            ServerEvent::Joined {
                success: true,
                reason: None,
                player_id: Some(player_id),
                session: Some(self.session.snapshot_for(player_id)),
            },
        );
        self.broadcast_state();
        Ok(())
    }

    fn handle_action(&mut self, player_id: PlayerId, action: PlayerAction) {
        if !self.session.contains(player_id) {
            tracing::warn!(
                room_id = %self.session.id(),
                %player_id,
                "action from non-member, ignoring"
            );
            return;
        }

        match action {
            PlayerAction::SetSecret { secret } => {
                match self.session.set_secret(player_id, secret) {
                    Ok(()) => self.broadcast_state(),
                    Err(e) => self.reject(player_id, &e),
                }
            }
            PlayerAction::Guess { target, guess } => {
                match self.session.guess(player_id, target, guess) {
                    // GuessMade goes out before the state push so clients
                    // can show the guess before any terminal phase.
                    Ok(Some(record)) => {
                        self.broadcast(ServerEvent::GuessMade { record });
                        self.broadcast_state();
                    }
                    // Stale guess outside a running round: dropped.
                    Ok(None) => {
                        tracing::debug!(
                            room_id = %self.session.id(),
                            %player_id,
                            "guess outside active round, ignoring"
                        );
                    }
                    Err(e) => self.reject(player_id, &e),
                }
            }
            PlayerAction::Restart => {
                self.session.restart();
                tracing::info!(room_id = %self.session.id(), "room restarted");
                self.broadcast_state();
            }
        }
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> bool {
        self.senders.remove(&player_id);
        let empty = self.session.remove(player_id);
        tracing::info!(
            room_id = %self.session.id(),
            %player_id,
            players = self.session.member_count(),
            "player left"
        );

        if !empty {
            self.broadcast_state();
        }
        empty
    }

    /// Pushes a per-recipient state snapshot to every member.
    fn broadcast_state(&self) {
        for member in self.session.member_ids() {
            let snapshot = self.session.snapshot_for(member);
            self.send_to(member, ServerEvent::SessionUpdated { session: snapshot });
        }
    }

    /// Sends the same event to every member.
    fn broadcast(&self, event: ServerEvent) {
        for member in self.session.member_ids() {
            self.send_to(member, event.clone());
        }
    }

    /// Unicasts a rejection to the acting player.
    fn reject(&self, player_id: PlayerId, error: &GameError) {
        tracing::debug!(
            room_id = %self.session.id(),
            %player_id,
            %error,
            "action rejected"
        );
        self.send_to(
            player_id,
            ServerEvent::ActionRejected {
                reason: error.to_string(),
            },
        );
    }

    /// Sends an event to a single member. Silently drops if the receiver
    /// is gone (connection already closed).
    fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.session.id().clone(),
            phase: self.session.phase(),
            player_count: self.session.member_count(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with
/// it. `channel_size` bounds the command queue for backpressure.
pub(crate) fn spawn_room(session: Session, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let room_id = session.id().clone();

    let actor = RoomActor {
        session,
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
