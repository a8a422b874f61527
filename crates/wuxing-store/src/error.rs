//! Error types for the store layer.

/// Errors that can occur while loading or persisting player data.
///
/// A missing profile is *not* an error — `load` reports it as `None` and
/// the caller treats it as a new player. Errors here mean the storage
/// service itself misbehaved.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The durable storage service could not be reached or failed the
    /// request. Callers degrade to session-only data rather than failing
    /// the login outright.
    #[error("durable storage unavailable: {0}")]
    Unavailable(String),

    /// A debit would have pushed a currency balance below zero.
    #[error("insufficient {currency} balance")]
    InsufficientBalance { currency: String },
}
