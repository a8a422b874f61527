//! Core protocol types for the Wuxing wire format.
//!
//! Every type here is a structure that gets serialized to bytes, sent over
//! the network, and deserialized on the other side. The wire shape is a flat
//! JSON object with a `"type"` discriminator in `snake_case`, e.g.:
//!
//! ```json
//! { "type": "request_verification_code", "email": "a@b.com" }
//! ```
//!
//! The serde attributes below are load-bearing: the client SDK matches on
//! the exact `"type"` strings and field names, so changing them is a
//! protocol break.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// Cultivation progress for the five elements.
///
/// The key set is fixed — a profile always carries all five counters, never
/// a partial map. Modeling them as struct fields (rather than a
/// `HashMap<String, i64>`) makes that invariant structural: there is no way
/// to construct an `Elements` with a key missing, and the JSON form is
/// always the full `{"metal": .., "wood": .., "water": .., "fire": ..,
/// "earth": ..}` object.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct Elements {
    pub metal: i64,
    pub wood: i64,
    pub water: i64,
    pub fire: i64,
    pub earth: i64,
}

// ---------------------------------------------------------------------------
// GM command arguments
// ---------------------------------------------------------------------------

/// A single GM-command argument value.
///
/// GM commands carry a free-form `args` object; each value is one of the
/// JSON scalars. `#[serde(untagged)]` means the JSON value itself picks the
/// variant — `42` becomes `Int`, `"42"` becomes `Str` — with variants tried
/// in declaration order, so integers are preferred over floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ArgValue {
    /// Interprets the value as an `i64` where reasonable.
    ///
    /// Clients are lenient about numeric arguments and sometimes send them
    /// as strings, so `Str("500")` coerces. Floats and bools do not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Str(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// The `args`/`data` object attached to GM commands and their responses.
pub type CommandArgs = HashMap<String, ArgValue>;

// ---------------------------------------------------------------------------
// ClientMessage — client → server
// ---------------------------------------------------------------------------

/// Messages the client sends to the server.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` produces internally
/// tagged JSON with lowercase discriminators:
/// `{ "type": "verify_code", "email": ..., "code": ..., "timestamp": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// "Send a one-time code to this address."
    RequestVerificationCode { email: String },

    /// "Here is the code I received, issued at `timestamp`."
    ///
    /// The timestamp is the one the server handed back in
    /// [`ServerMessage::VerificationCodeResponse`] — echoing it is what lets
    /// the server recompute the expected code without having stored
    /// anything.
    VerifyCode {
        email: String,
        code: String,
        timestamp: i64,
    },

    /// A debug/administrative command operating on the caller's profile.
    GmCommand {
        command: String,
        #[serde(default)]
        args: CommandArgs,
    },
}

// ---------------------------------------------------------------------------
// ServerMessage — server → client
// ---------------------------------------------------------------------------

/// Messages the server sends to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Outcome of a code request. On success, `timestamp` is the issue time
    /// the client must echo back in [`ClientMessage::VerifyCode`]; it is the
    /// only piece of challenge state either side holds.
    VerificationCodeResponse {
        timestamp: i64,
        success: bool,
        message: String,
    },

    /// Outcome of a verification attempt. On success, carries the resolved
    /// profile; on failure, the profile fields hold their defaults and
    /// `message` distinguishes the cause (expired vs incorrect vs server
    /// error).
    VerifyCodeResponse {
        success: bool,
        message: String,
        nickname: String,
        level: u32,
        experience: i64,
        gold: i64,
        elements: Elements,
    },

    /// Outcome of a GM command. `data` carries command-specific results
    /// (e.g. the new level or gold balance).
    GmCommandResponse {
        success: bool,
        command: String,
        message: String,
        #[serde(default)]
        data: CommandArgs,
    },
}

// =========================================================================
// Tests
// =========================================================================
