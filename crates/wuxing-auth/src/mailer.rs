//! The outbound-delivery seam.
//!
//! The login flow doesn't send email itself — that belongs to whatever
//! channel the deployment wires in (SMTP relay, transactional-mail API,
//! SMS bridge). This module defines the [`Mailer`] trait as the single
//! integration point: the server is handed one implementation at
//! construction time and never looks anywhere else for it.

use std::sync::Mutex;

use crate::AuthError;

/// Delivers one-time codes (and other mail) to a player's address.
///
/// # Trait bounds
///
/// - `Send + Sync` → the mailer lives in shared server state and is called
///   from concurrent connection tasks.
/// - `'static` → it owns its configuration; nothing borrowed.
///
/// Methods return `impl Future + Send` (the desugared form of `async fn`)
/// so the returned futures stay spawnable from generic server code.
///
/// # Example
///
/// ```rust
/// use wuxing_auth::{AuthError, Mailer};
///
/// /// Pretends everything was delivered. Handy in examples and tests.
/// struct NullMailer;
///
/// impl Mailer for NullMailer {
///     async fn send_verification_code(
///         &self,
///         _email: &str,
///         _code: &str,
///     ) -> Result<(), AuthError> {
///         Ok(())
///     }
///
///     async fn send(
///         &self,
///         _to: &str,
///         _subject: &str,
///         _body: &str,
///     ) -> Result<(), AuthError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Mailer: Send + Sync + 'static {
    /// Sends a login verification code to `email`.
    ///
    /// # Errors
    /// Returns [`AuthError::Delivery`] when the channel reports failure.
    /// The caller surfaces this to the client as a failed code request —
    /// retryable by requesting a fresh code.
    fn send_verification_code(
        &self,
        email: &str,
        code: &str,
    ) -> impl std::future::Future<Output = Result<(), AuthError>> + Send;

    /// Sends an arbitrary message through the same channel.
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> impl std::future::Future<Output = Result<(), AuthError>> + Send;
}

// ---------------------------------------------------------------------------
// MockMailer
// ---------------------------------------------------------------------------

/// A [`Mailer`] that records sends instead of delivering them.
///
/// Used by tests and the local demo server. Every "sent" code is logged at
/// info level, which doubles as the way to log in against a dev server:
/// read the code out of the server log.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<SentCode>>,
}

/// A recorded verification-code send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub email: String,
    pub code: String,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every verification code "sent" so far, in order.
    pub fn sent_codes(&self) -> Vec<SentCode> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl Mailer for MockMailer {
    async fn send_verification_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<(), AuthError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(SentCode {
                email: email.to_string(),
                code: code.to_string(),
            });
        tracing::info!(email, code, "mock mail: verification code");
        Ok(())
    }

    async fn send(
        &self,
        to: &str,
        subject: &str,
        _body: &str,
    ) -> Result<(), AuthError> {
        tracing::info!(to, subject, "mock mail: message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_mailer_records_codes_in_order() {
        let mailer = MockMailer::new();

        mailer
            .send_verification_code("a@b.com", "111111")
            .await
            .unwrap();
        mailer
            .send_verification_code("c@d.com", "222222")
            .await
            .unwrap();

        let sent = mailer.sent_codes();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].email, "a@b.com");
        assert_eq!(sent[0].code, "111111");
        assert_eq!(sent[1].email, "c@d.com");
    }

    #[tokio::test]
    async fn test_mock_mailer_plain_send_records_nothing() {
        let mailer = MockMailer::new();
        mailer.send("a@b.com", "hello", "body").await.unwrap();
        assert!(mailer.sent_codes().is_empty());
    }
}
