//! Unified error type for the Wuxing server.

use wuxing_auth::AuthError;
use wuxing_protocol::ProtocolError;
use wuxing_store::StoreError;
use wuxing_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Server code deals with this single type; the `#[from]` attributes let
/// `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WuxingError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An auth-level error (code delivery).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A store-level error (durable storage, balances).
    #[error(transparent)]
    Store(#[from] StoreError),
}
