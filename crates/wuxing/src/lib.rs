//! # Wuxing
//!
//! Server-side entry point for the Wuxing game: email-verification login
//! with stateless one-time codes, player-profile resolution, and a small
//! GM command surface.
//!
//! The server ties the workspace layers together:
//! transport (bytes) → protocol (messages) → auth (codes) + store
//! (profiles), with one handler task per connection.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wuxing::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), WuxingError> {
//!     let server = WuxingServerBuilder::new()
//!         .bind("0.0.0.0:8080")
//!         .auth_config(AuthConfig::default())
//!         .build(MemoryBackend::new(), MockMailer::new())
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod gm;
mod handler;
mod server;

pub use error::WuxingError;
pub use server::{WuxingServer, WuxingServerBuilder};

/// The common imports for building and running a login server.
pub mod prelude {
    pub use crate::{WuxingError, WuxingServer, WuxingServerBuilder};
    pub use wuxing_auth::{
        AuthConfig, AuthError, Mailer, MockMailer, VerifyOutcome, check_code,
        generate_code,
    };
    pub use wuxing_protocol::{
        ArgValue, ClientMessage, Codec, CommandArgs, Elements, JsonCodec,
        ProtocolError, ServerMessage,
    };
    pub use wuxing_store::{
        KvBackend, MemoryBackend, PlayerProfile, ProfileStore, StoreError,
        UserKey,
    };
}
