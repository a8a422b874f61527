//! GM commands: the debug/administrative surface over a resolved profile.
//!
//! Three commands, all operating on the caller's own profile:
//!
//! | command     | args                    | effect                                   |
//! |-------------|-------------------------|------------------------------------------|
//! | `level_up`  | —                       | level +1, experience reset, gold bonus   |
//! | `add_gold`  | `amount` (default 1000) | credit gold by a signed amount           |
//! | `set_level` | `level` (default 1)     | set level to `max(1, requested)`         |
//!
//! Every command loads, mutates, saves, and reports the result. A load or
//! save failure is reported as command failure — a partially applied
//! command never reports success.

use std::sync::Arc;

use wuxing_auth::Mailer;
use wuxing_protocol::{ArgValue, Codec, CommandArgs, ServerMessage};
use wuxing_store::{KvBackend, UserKey};

use crate::server::ServerState;

/// Gold granted on each level up.
const LEVEL_UP_GOLD_BONUS: i64 = 100;

/// Gold granted by `add_gold` when no amount is given.
const DEFAULT_GOLD_GRANT: i64 = 1000;

/// Dispatches one GM command. Always produces a response.
pub(crate) async fn handle_command<B, M, C>(
    state: &Arc<ServerState<B, M, C>>,
    key: &UserKey,
    command: &str,
    args: &CommandArgs,
) -> ServerMessage
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    tracing::info!(%key, command, "processing GM command");

    match command {
        "level_up" => level_up(state, key).await,
        "add_gold" => add_gold(state, key, args).await,
        "set_level" => set_level(state, key, args).await,
        _ => {
            tracing::warn!(%key, command, "unknown GM command");
            failure(command, format!("unknown command: {command}"))
        }
    }
}

/// `level_up`: level +1, experience reset to 0, fixed gold bonus.
///
/// The bonus moves through the incremental currency primitive, not through
/// a field write, so concurrent bonuses can't clobber each other.
async fn level_up<B, M, C>(
    state: &Arc<ServerState<B, M, C>>,
    key: &UserKey,
) -> ServerMessage
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    let Some(mut profile) = load_profile(state, key).await else {
        return failure("level_up", "player data not loaded");
    };

    profile.level += 1;
    profile.experience = 0;

    if let Err(e) = state.store.save(key, &profile).await {
        tracing::error!(%key, error = %e, "level_up save failed");
        return failure("level_up", "failed to save player data");
    }
    let gold = match state
        .store
        .adjust_currency(key, LEVEL_UP_GOLD_BONUS, true)
        .await
    {
        Ok(balance) => balance,
        Err(e) => {
            tracing::error!(%key, error = %e, "level_up gold bonus failed");
            return failure("level_up", "failed to grant level-up bonus");
        }
    };

    tracing::info!(%key, level = profile.level, "player leveled up");
    let mut data = CommandArgs::new();
    data.insert("level".into(), ArgValue::Int(i64::from(profile.level)));
    data.insert("gold".into(), ArgValue::Int(gold));
    success(
        "level_up",
        format!("level up successful, now level {}", profile.level),
        data,
    )
}

/// `add_gold`: credit a signed amount (default 1000).
async fn add_gold<B, M, C>(
    state: &Arc<ServerState<B, M, C>>,
    key: &UserKey,
    args: &CommandArgs,
) -> ServerMessage
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    let amount = args
        .get("amount")
        .and_then(ArgValue::as_i64)
        .unwrap_or(DEFAULT_GOLD_GRANT);

    match state.store.adjust_currency(key, amount, true).await {
        Ok(balance) => {
            let mut data = CommandArgs::new();
            data.insert("added".into(), ArgValue::Int(amount));
            data.insert("gold".into(), ArgValue::Int(balance));
            success("add_gold", format!("added {amount} gold"), data)
        }
        Err(e) => {
            tracing::error!(%key, error = %e, "add_gold failed");
            failure("add_gold", "failed to add gold")
        }
    }
}

/// `set_level`: set level to `max(1, requested)` (default 1).
async fn set_level<B, M, C>(
    state: &Arc<ServerState<B, M, C>>,
    key: &UserKey,
    args: &CommandArgs,
) -> ServerMessage
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    let requested = args
        .get("level")
        .and_then(ArgValue::as_i64)
        .unwrap_or(1);

    let Some(mut profile) = load_profile(state, key).await else {
        return failure("set_level", "player data not loaded");
    };

    profile.level = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);

    if let Err(e) = state.store.save(key, &profile).await {
        tracing::error!(%key, error = %e, "set_level save failed");
        return failure("set_level", "failed to save player data");
    }

    let mut data = CommandArgs::new();
    data.insert("level".into(), ArgValue::Int(i64::from(profile.level)));
    success(
        "set_level",
        format!("level set to {}", profile.level),
        data,
    )
}

/// Loads the caller's profile, mapping both NotFound and storage errors to
/// `None` — the command replies with a single "not loaded" failure either
/// way.
async fn load_profile<B, M, C>(
    state: &Arc<ServerState<B, M, C>>,
    key: &UserKey,
) -> Option<wuxing_store::PlayerProfile>
where
    B: KvBackend,
    M: Mailer,
    C: Codec,
{
    match state.store.load(key).await {
        Ok(found) => found,
        Err(e) => {
            tracing::error!(%key, error = %e, "GM profile load failed");
            None
        }
    }
}

fn success(
    command: &str,
    message: impl Into<String>,
    data: CommandArgs,
) -> ServerMessage {
    ServerMessage::GmCommandResponse {
        success: true,
        command: command.to_string(),
        message: message.into(),
        data,
    }
}

fn failure(command: &str, message: impl Into<String>) -> ServerMessage {
    ServerMessage::GmCommandResponse {
        success: false,
        command: command.to_string(),
        message: message.into(),
        data: CommandArgs::new(),
    }
}
