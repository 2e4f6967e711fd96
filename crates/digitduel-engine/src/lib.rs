//! Game session engine for digitduel.
//!
//! The authoritative, server-side core of the hidden-number guessing game:
//!
//! - [`Session`] — per-room state machine (membership, phase, turns,
//!   history, secrets)
//! - [`evaluate`] — pure digit-by-digit guess evaluation
//! - [`turn`] — circular turn rotation
//! - [`RoomRegistry`] — create-on-demand / delete-on-empty room table with
//!   an identity→room reverse index
//! - [`RoomHandle`] — command a running room actor
//!
//! Each room runs as an isolated Tokio task (actor model), so every event
//! touching a session is serialized against it without shared locks.

mod error;
pub mod evaluate;
mod registry;
mod room;
mod session;
pub mod turn;

pub use error::{GameError, RegistryError};
pub use registry::RoomRegistry;
pub use room::{PlayerAction, PlayerSender, RoomHandle, RoomInfo};
pub use session::{Player, RoomRules, Session};
