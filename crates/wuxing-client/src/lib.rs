//! Client-side login flow for Wuxing.
//!
//! The login UI is two steps — enter an email, then enter the 6-digit code
//! that arrives in the inbox — with a countdown showing how long the code
//! stays valid. This crate models everything behind those widgets:
//!
//! 1. **The state machine** ([`LoginFlow`], [`FlowState`]) — which step is
//!    active, which messages to send, how server responses advance it.
//! 2. **Input checks** ([`is_valid_email`]) — local validation before a
//!    request is produced.
//! 3. **The countdown** ([`Countdown`], [`CountdownState`]) — a
//!    cancellable 1 Hz timer publishing label state through a watch
//!    channel.
//!
//! The flow is sans-IO: methods return the
//! [`ClientMessage`](wuxing_protocol::ClientMessage) to transmit and accept
//! decoded [`ServerMessage`](wuxing_protocol::ServerMessage)s back, so the
//! whole thing unit-tests without a socket and plugs into whatever
//! transport the UI shell provides.

mod countdown;
mod email;
mod error;
mod flow;

pub use countdown::{Countdown, CountdownState, format_remaining};
pub use email::is_valid_email;
pub use error::FlowError;
pub use flow::{FlowState, LoginFlow, ProfileSummary};
