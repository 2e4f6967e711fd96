//! Wire protocol for digitduel.
//!
//! Defines the language clients and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`SessionSnapshot`],
//!   [`GuessRecord`], identity newtypes) — the structures on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how they become bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong in between.
//!
//! The protocol layer sits between transport (raw bytes) and the game
//! engine (session state). It knows nothing about connections or rooms.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, DigitResult, GuessRecord, Hint, Outcome, Phase, PlayerId,
    PlayerSnapshot, RoomId, ServerEvent, SessionSnapshot,
};
