//! Unified error type for the digitduel server.

use digitduel_engine::RegistryError;
use digitduel_protocol::ProtocolError;
use digitduel_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Server code deals with this single type instead of importing errors
/// from each sub-crate. The `#[from]` attribute on each variant
/// auto-generates `From` impls, so the `?` operator converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DigitduelError {
    /// A transport-level error (accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid identifier).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A routing or rule error from the game engine.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
