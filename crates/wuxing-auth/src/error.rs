//! Error types for the auth layer.

/// Errors that can occur while issuing a verification challenge.
///
/// Note that a wrong or stale code is *not* an error — those are ordinary
/// [`VerifyOutcome`](crate::VerifyOutcome)s. Errors here are operational
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The outbound channel failed to deliver the code. No challenge state
    /// advances; the client may simply request a fresh code.
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}
