//! Per-connection handler: message loop and login orchestration.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Loop: receive payload → decode `ClientMessage` → dispatch
//!   2. On a successful verify, remember the account key in the
//!      connection context
//!   3. On exit (clean close, error, or timeout upstream), evict the
//!      connection's cache entries
//!
//! There is no handshake and no heartbeat: the login exchange is the first
//! and only traffic on the connection, and it is strictly
//! request/response.
//!
//! # Error boundary
//!
//! Nothing a client sends may crash this loop. Undecodable payloads are
//! skipped with a debug log; handler failures (mail channel down, storage
//! down) become `success:false` responses with a message naming the cause;
//! only transport failures end the task.

use std::sync::Arc;

use rand::Rng;
use wuxing_auth::{Mailer, VerifyOutcome, check_code, generate_code};
use wuxing_protocol::{ClientMessage, Codec, Elements, ServerMessage};
use wuxing_store::{KvBackend, PlayerProfile, UserKey};
use wuxing_transport::{Connection, ConnectionId, WebSocketConnection};

use crate::WuxingError;
use crate::gm;
use crate::server::ServerState;

/// What the handler knows about its connection between messages.
pub(crate) struct ConnectionCtx {
    pub(crate) id: ConnectionId,
    /// The verified account key, set by the first successful `verify_code`.
    /// Before that, profile operations fall back to a connection-scoped
    /// key — which does not survive reconnects.
    pub(crate) user_key: Option<UserKey>,
}

impl ConnectionCtx {
    /// The key profile operations should use right now: the verified
    /// account if there is one, the connection fallback otherwise.
    pub(crate) fn profile_key(&self) -> UserKey {
        self.user_key
            .clone()
            .unwrap_or(UserKey::Connection(self.id.into_inner()))
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<B, M, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<B, M, C>>,
) -> Result<(), WuxingError>
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    let mut ctx = ConnectionCtx {
        id: conn.id(),
        user_key: None,
    };
    tracing::debug!(conn_id = %ctx.id, "handling new connection");

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(conn_id = %ctx.id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(conn_id = %ctx.id, error = %e, "recv error");
                break;
            }
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(
                    conn_id = %ctx.id,
                    error = %e,
                    "failed to decode client message"
                );
                continue;
            }
        };

        if let Err(e) = dispatch(&conn, &state, &mut ctx, msg).await {
            tracing::debug!(conn_id = %ctx.id, error = %e, "reply failed");
            break;
        }
    }

    // The session cache is connection-scoped: drop this connection's
    // entries, both the verified account (if any) and the fallback key.
    if let Some(key) = ctx.user_key.take() {
        state.store.evict(&key).await;
    }
    state
        .store
        .evict(&UserKey::Connection(ctx.id.into_inner()))
        .await;

    Ok(())
}

/// Routes one decoded message. Only transport/encode failures propagate —
/// domain failures are answered on the wire.
async fn dispatch<B, M, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<B, M, C>>,
    ctx: &mut ConnectionCtx,
    msg: ClientMessage,
) -> Result<(), WuxingError>
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    let reply = match msg {
        ClientMessage::RequestVerificationCode { email } => {
            on_request_code(state, &email).await
        }
        ClientMessage::VerifyCode {
            email,
            code,
            timestamp,
        } => on_verify_code(state, ctx, &email, &code, timestamp).await,
        ClientMessage::GmCommand { command, args } => Some(
            gm::handle_command(state, &ctx.profile_key(), &command, &args)
                .await,
        ),
    };

    if let Some(reply) = reply {
        let bytes = state.codec.encode(&reply)?;
        conn.send(&bytes).await.map_err(WuxingError::Transport)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// request_verification_code
// ---------------------------------------------------------------------------

/// Issues a code and hands it to the mail channel.
///
/// Returns `None` for an empty email — malformed input is rejected locally
/// with no reply and no state change. Delivery failure is answered with
/// `success:false` and advances nothing: the client retries by requesting
/// a fresh code.
async fn on_request_code<B, M, C>(
    state: &Arc<ServerState<B, M, C>>,
    email: &str,
) -> Option<ServerMessage>
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    if email.is_empty() {
        tracing::warn!("empty email in verification code request");
        return None;
    }

    let timestamp = unix_now();
    let code = generate_code(email, timestamp, &state.auth.salt);
    tracing::info!(email, timestamp, "issued verification code");

    match state.mailer.send_verification_code(email, &code).await {
        Ok(()) => Some(ServerMessage::VerificationCodeResponse {
            timestamp,
            success: true,
            message: "verification code sent".to_string(),
        }),
        Err(e) => {
            tracing::error!(email, error = %e, "failed to send verification email");
            Some(ServerMessage::VerificationCodeResponse {
                timestamp: 0,
                success: false,
                message: "failed to send verification email, please retry"
                    .to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// verify_code
// ---------------------------------------------------------------------------

/// Checks a submitted code and, on success, resolves the player's profile.
async fn on_verify_code<B, M, C>(
    state: &Arc<ServerState<B, M, C>>,
    ctx: &mut ConnectionCtx,
    email: &str,
    code: &str,
    timestamp: i64,
) -> Option<ServerMessage>
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    if email.is_empty() || code.is_empty() {
        tracing::warn!("empty email or code in verification request");
        return None;
    }

    let now = unix_now();
    match check_code(email, code, timestamp, now, &state.auth) {
        VerifyOutcome::Expired => {
            tracing::info!(email, timestamp, now, "verification code expired");
            Some(verify_failure("code expired"))
        }
        VerifyOutcome::Rejected => {
            tracing::info!(email, "verification code incorrect");
            Some(verify_failure("incorrect code"))
        }
        VerifyOutcome::Verified => {
            tracing::info!(email, "verification successful");

            let key = UserKey::Account(email.to_string());
            let profile = resolve_profile(state, &key).await;
            ctx.user_key = Some(key);

            Some(ServerMessage::VerifyCodeResponse {
                success: true,
                message: "login successful".to_string(),
                nickname: profile.nickname,
                level: profile.level,
                experience: profile.experience,
                gold: profile.gold,
                elements: profile.elements,
            })
        }
    }
}

/// A failed verification reply: defaults in the profile fields, a message
/// naming the cause.
fn verify_failure(message: &str) -> ServerMessage {
    ServerMessage::VerifyCodeResponse {
        success: false,
        message: message.to_string(),
        nickname: String::new(),
        level: 1,
        experience: 0,
        gold: 0,
        elements: Elements::default(),
    }
}

// ---------------------------------------------------------------------------
// Profile resolution
// ---------------------------------------------------------------------------

/// Resolves the profile behind a verified identity, always producing one:
/// load an existing profile, or initialize a new player, or — if durable
/// storage is down — fall back to a session-only profile in the cache.
async fn resolve_profile<B, M, C>(
    state: &Arc<ServerState<B, M, C>>,
    key: &UserKey,
) -> PlayerProfile
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    match state.store.load(key).await {
        Ok(Some(profile)) => {
            tracing::info!(%key, nickname = %profile.nickname, "existing player loaded");
            return profile;
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(%key, error = %e, "profile load failed");
        }
    }

    let nickname = placeholder_nickname();
    match state.store.create_new(key, &nickname).await {
        Ok(profile) => {
            tracing::info!(%key, nickname, "new player created");
            profile
        }
        Err(e) => {
            tracing::warn!(
                %key,
                error = %e,
                "durable storage unavailable, using session-only profile"
            );
            let profile = PlayerProfile::create_new(&nickname);
            state.store.cache_profile(key, profile.clone()).await;
            profile
        }
    }
}

/// `"Player"` plus a random four-digit suffix.
fn placeholder_nickname() -> String {
    let suffix = rand::rng().random_range(1000..10000);
    format!("Player{suffix}")
}

/// Seconds since the Unix epoch, per the server's wall clock.
pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
