//! Wire protocol for the Wuxing login flow.
//!
//! This crate defines the "language" that the login client and server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Elements`], etc.) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the login
//! handler (verification, profiles). It doesn't know about connections or
//! player data — it only knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage/ServerMessage) → Handler
//! ```
//!
//! Every payload is a flat JSON object tagged by a `"type"` field, carried
//! as opaque bytes by the transport. There is no envelope: the login
//! exchange is strictly request/response, so sequence numbers and delivery
//! channels would carry no information.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ArgValue, ClientMessage, CommandArgs, Elements, ServerMessage};
