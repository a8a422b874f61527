//! The durable-storage adapter: a typed interface to the external KV service.
//!
//! The persistence service itself is out of process — all this crate knows
//! is the contract: string and integer fields under well-known keys, plus a
//! named currency balance with *incremental* add/subtract primitives.
//! Queries return typed rows ([`ProfileRow`]) and writes go through typed
//! batches ([`WriteBatch`]), so nothing downstream ever probes an untyped
//! result object.

use crate::{StoreError, UserKey};

/// The durable field keys for a profile.
///
/// These names are the storage contract — they must match what every other
/// service reading the same account sees.
pub mod fields {
    pub const NICKNAME: &str = "nickname";
    pub const LEVEL: &str = "level";
    pub const EXPERIENCE: &str = "experience";
    pub const ELEMENT_METAL: &str = "element_metal";
    pub const ELEMENT_WOOD: &str = "element_wood";
    pub const ELEMENT_WATER: &str = "element_water";
    pub const ELEMENT_FIRE: &str = "element_fire";
    pub const ELEMENT_EARTH: &str = "element_earth";

    /// The one named currency balance.
    pub const CURRENCY_GOLD: &str = "gold";
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// The known profile field set as read from durable storage.
///
/// Every field is optional: a brand-new account has none of them. The store
/// treats a missing [`fields::NICKNAME`] as "no profile" — the nickname is
/// written by every profile creation, so its absence means the account was
/// never initialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileRow {
    pub nickname: Option<String>,
    pub level: Option<i64>,
    pub experience: Option<i64>,
    pub element_metal: Option<i64>,
    pub element_wood: Option<i64>,
    pub element_water: Option<i64>,
    pub element_fire: Option<i64>,
    pub element_earth: Option<i64>,
}

// ---------------------------------------------------------------------------
// Write batches
// ---------------------------------------------------------------------------

/// A single operation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Set a string field.
    SetText { field: &'static str, value: String },
    /// Set an integer field.
    SetInt { field: &'static str, value: i64 },
    /// Increase a currency balance.
    Credit { currency: &'static str, amount: i64 },
    /// Decrease a currency balance. Fails the batch if the balance would
    /// go negative.
    Debit { currency: &'static str, amount: i64 },
}

/// An atomic group of writes against one account.
///
/// Mirrors the transaction builder the persistence service exposes: chain
/// operations, attach a human-readable description (it ends up in the
/// service's audit trail), execute as a unit. Either every operation
/// applies or none do.
///
/// ```rust
/// use wuxing_store::{WriteBatch, fields};
///
/// let batch = WriteBatch::new()
///     .set_int(fields::LEVEL, 2)
///     .set_int(fields::EXPERIENCE, 0)
///     .credit(fields::CURRENCY_GOLD, 100)
///     .describe("level up");
/// assert_eq!(batch.ops().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
    description: String,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(
        mut self,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        self.ops.push(WriteOp::SetText {
            field,
            value: value.into(),
        });
        self
    }

    pub fn set_int(mut self, field: &'static str, value: i64) -> Self {
        self.ops.push(WriteOp::SetInt { field, value });
        self
    }

    pub fn credit(mut self, currency: &'static str, amount: i64) -> Self {
        self.ops.push(WriteOp::Credit { currency, amount });
        self
    }

    pub fn debit(mut self, currency: &'static str, amount: i64) -> Self {
        self.ops.push(WriteOp::Debit { currency, amount });
        self
    }

    /// Attaches an audit description to the batch.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

// ---------------------------------------------------------------------------
// The backend trait
// ---------------------------------------------------------------------------

/// Durable storage for player data.
///
/// Implementations talk to the external persistence service;
/// [`MemoryBackend`](crate::MemoryBackend) keeps everything in process for
/// tests and local runs.
///
/// Methods return `impl Future + Send` (the desugared `async fn` form) so
/// store operations stay spawnable from generic server tasks.
pub trait KvBackend: Send + Sync + 'static {
    /// Reads the known profile field set for an account.
    ///
    /// An account with no data yields a [`ProfileRow`] of `None`s — that is
    /// not an error. Errors mean the storage service itself failed.
    fn read_profile(
        &self,
        key: &UserKey,
    ) -> impl std::future::Future<Output = Result<ProfileRow, StoreError>> + Send;

    /// Reads a currency balance. Missing balances read as zero.
    fn read_currency(
        &self,
        key: &UserKey,
        currency: &str,
    ) -> impl std::future::Future<Output = Result<i64, StoreError>> + Send;

    /// Applies a write batch atomically: all operations or none.
    fn apply(
        &self,
        key: &UserKey,
        batch: WriteBatch,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
