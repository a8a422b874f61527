//! Error types for the client flow.

/// Input or sequencing problems caught locally, before anything is sent.
///
/// The `Display` strings double as the inline error-label texts the UI
/// shows next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The email field was empty.
    #[error("please enter an email address")]
    EmptyEmail,

    /// The email field doesn't look like an address.
    #[error("please enter a valid email address")]
    InvalidEmail,

    /// Fewer than six digits were entered.
    #[error("please enter the full 6-digit code")]
    IncompleteCode,

    /// The action doesn't exist in the current step (e.g. submitting a
    /// code before any was requested).
    #[error("{action} is not available in this step")]
    WrongStep {
        /// The attempted action, for the log line.
        action: &'static str,
    },
}
