//! Email-verification primitives for the Wuxing login flow.
//!
//! This crate owns the pieces of login that don't touch a socket or a
//! database:
//!
//! 1. **Code generation** ([`generate_code`]) — a pure function mapping
//!    (identity, issue time, salt) to a 6-digit one-time code.
//! 2. **Verification** ([`check_code`], [`VerifyOutcome`]) — the
//!    validity-window rule that decides Verified / Expired / Rejected.
//! 3. **Delivery** ([`Mailer`] trait, [`MockMailer`]) — the seam through
//!    which codes reach the player's inbox.
//! 4. **Configuration** ([`AuthConfig`]) — the shared salt and window.
//!
//! # Statelessness
//!
//! The server never stores an issued code. The client echoes back the issue
//! timestamp, and the server recomputes the expected code from
//! (identity, timestamp, salt) — same inputs, same code. The price of that
//! design: within the validity window, the same (identity, timestamp, code)
//! triple verifies as many times as it is presented. Single-use semantics
//! would require a consumed-marker keyed by (identity, timestamp).

#![allow(async_fn_in_trait)]

mod challenge;
mod codegen;
mod config;
mod error;
mod mailer;

pub use challenge::{VerifyOutcome, check_code};
pub use codegen::generate_code;
pub use config::AuthConfig;
pub use error::AuthError;
pub use mailer::{Mailer, MockMailer, SentCode};
