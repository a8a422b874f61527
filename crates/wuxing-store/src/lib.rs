//! Player profile persistence for Wuxing.
//!
//! This crate owns everything between "a player verified their email" and
//! "their progression data is safe":
//!
//! 1. **The profile itself** ([`PlayerProfile`], [`UserKey`]) — nickname,
//!    level, experience, gold, and the five element counters.
//! 2. **The durable adapter** ([`KvBackend`], [`WriteBatch`],
//!    [`ProfileRow`]) — a typed interface to the external key-value
//!    persistence service, with [`MemoryBackend`] as the in-process
//!    implementation for tests and local runs.
//! 3. **The store** ([`ProfileStore`]) — a session cache in front of the
//!    backend, with per-key serialization of load/save/adjust.
//!
//! # How it fits in the stack
//!
//! ```text
//! Server handler (above)  ← resolves profiles after verification
//!     ↕
//! Store layer (this crate)  ← cache + durable adapter
//!     ↕
//! External KV service (below)  ← reached through the KvBackend trait
//! ```

#![allow(async_fn_in_trait)]

mod backend;
mod error;
mod key;
mod memory;
mod profile;
mod store;

pub use backend::{KvBackend, ProfileRow, WriteBatch, WriteOp, fields};
pub use error::StoreError;
pub use key::UserKey;
pub use memory::MemoryBackend;
pub use profile::PlayerProfile;
pub use store::ProfileStore;
