//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or validating wire data.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, or an
    /// unknown event type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room identifier token does not match the `\d{3}[A-Z]{3}` pattern.
    #[error("invalid room id: {0:?}")]
    InvalidRoomId(String),

    /// The message decoded cleanly but violates protocol rules.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
