//! # digitduel
//!
//! Authoritative server for a turn-based multiplayer number-guessing
//! game. Players join six-character rooms, commit a secret 4-digit
//! number, and take turns guessing each other's secrets; the server
//! owns all game state and pushes every change to the room.
//!
//! The workspace is layered:
//!
//! - `digitduel-transport` — accepts WebSocket connections
//! - `digitduel-protocol` — wire events and the JSON codec
//! - `digitduel-engine` — sessions, rooms, turn order, guess evaluation
//! - `digitduel` (this crate) — ties the layers together into a server
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use digitduel::DigitduelServer;
//!
//! # async fn run() -> Result<(), digitduel::DigitduelError> {
//! let server = DigitduelServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::DigitduelError;
pub use server::{DigitduelServer, DigitduelServerBuilder};
