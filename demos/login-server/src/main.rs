//! A runnable login server: in-memory storage, mock mail delivery.
//!
//! Codes never leave the process — the mock mailer logs each one at info
//! level, so "check your inbox" means "check the server log". Auth
//! configuration (salt, validity window) is read from
//! `login.config.json` next to the working directory, with defaults when
//! the file is absent.

use wuxing::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let auth = AuthConfig::load_from_file("login.config.json");

    let server = WuxingServerBuilder::new()
        .bind("0.0.0.0:8080")
        .auth_config(auth)
        .build(MemoryBackend::new(), MockMailer::new())
        .await?;

    tracing::info!("login server listening on 0.0.0.0:8080");
    server.run().await?;
    Ok(())
}
