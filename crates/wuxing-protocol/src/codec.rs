//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The transport carries opaque byte payloads; a codec is what turns those
//! bytes into [`ClientMessage`](crate::ClientMessage)s and
//! [`ServerMessage`](crate::ServerMessage)s back into bytes. The handler
//! doesn't care HOW — it just needs something implementing [`Codec`], so a
//! binary format could replace JSON without touching any other layer.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode protocol types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec is stored in the shared server
/// state and used from every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected message shape.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses UTF-8 JSON (via `serde_json`).
///
/// This is the wire format the login protocol ships with: payloads stay
/// human-readable in logs and in-flight captures. Behind the `json` feature
/// flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use wuxing_protocol::{ClientMessage, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let msg = ClientMessage::RequestVerificationCode {
///     email: "a@b.com".into(),
/// };
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded: ClientMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
