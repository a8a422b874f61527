//! The verification rule: recompute and compare inside a validity window.
//!
//! A challenge has no stored representation. It is identified entirely by
//! (identity, issue timestamp), and its state machine is implicit in the
//! message sequence:
//!
//! ```text
//! NoChallenge ──(request_verification_code)──→ ChallengeIssued
//! ChallengeIssued ──(verify_code)──→ Verified | Expired | Rejected
//! ```

use crate::{AuthConfig, generate_code};

/// The outcome of checking a submitted code.
///
/// `Expired` and `Rejected` are ordinary outcomes, not faults — the caller
/// maps them to distinct user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The code matched inside the validity window.
    Verified,
    /// The window elapsed before the code was submitted. Reported without
    /// checking the code itself: a correct-but-stale code is still expired.
    Expired,
    /// The code did not match the recomputed expectation.
    Rejected,
}

impl VerifyOutcome {
    /// `true` only for [`VerifyOutcome::Verified`].
    pub fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// Checks a submitted code against the recomputed expectation.
///
/// `issued_at` is the timestamp echoed back by the client; `now` is the
/// server's current Unix time, passed in rather than read here so the rule
/// is a pure function. Expiry is a timestamp comparison, not a scheduler
/// timeout: the window closes when `now - issued_at` exceeds
/// `config.window_secs`. A timestamp from the future (`now < issued_at`)
/// cannot have expired and is checked normally.
pub fn check_code(
    identity: &str,
    submitted: &str,
    issued_at: i64,
    now: i64,
    config: &AuthConfig,
) -> VerifyOutcome {
    if now - issued_at > config.window_secs {
        return VerifyOutcome::Expired;
    }

    let expected = generate_code(identity, issued_at, &config.salt);
    if submitted == expected {
        VerifyOutcome::Verified
    } else {
        VerifyOutcome::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            salt: "test-salt".into(),
            window_secs: 300,
        }
    }

    fn code_for(identity: &str, issued_at: i64) -> String {
        generate_code(identity, issued_at, "test-salt")
    }

    #[test]
    fn test_correct_code_within_window_is_verified() {
        let cfg = config();
        let code = code_for("a@b.com", 1000);
        // 200 seconds later — well inside the 300-second window.
        let outcome = check_code("a@b.com", &code, 1000, 1200, &cfg);
        assert_eq!(outcome, VerifyOutcome::Verified);
        assert!(outcome.is_verified());
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        // now - issued_at == window_secs is the last valid instant.
        let cfg = config();
        let code = code_for("a@b.com", 1000);
        assert_eq!(
            check_code("a@b.com", &code, 1000, 1300, &cfg),
            VerifyOutcome::Verified
        );
        assert_eq!(
            check_code("a@b.com", &code, 1000, 1301, &cfg),
            VerifyOutcome::Expired
        );
    }

    #[test]
    fn test_expired_regardless_of_code_correctness() {
        // Past the window, even the correct code reports Expired — the two
        // failure modes must stay distinguishable to the user.
        let cfg = config();
        let correct = code_for("a@b.com", 1000);
        assert_eq!(
            check_code("a@b.com", &correct, 1000, 1400, &cfg),
            VerifyOutcome::Expired
        );
        assert_eq!(
            check_code("a@b.com", "000000", 1000, 1400, &cfg),
            VerifyOutcome::Expired
        );
    }

    #[test]
    fn test_wrong_code_within_window_is_rejected() {
        let cfg = config();
        let correct = code_for("a@b.com", 1000);
        let wrong = if correct == "123456" { "654321" } else { "123456" };
        assert_eq!(
            check_code("a@b.com", wrong, 1000, 1100, &cfg),
            VerifyOutcome::Rejected
        );
    }

    #[test]
    fn test_code_is_bound_to_identity() {
        // A code issued for one identity must not verify another.
        let cfg = config();
        let code = code_for("a@b.com", 1000);
        assert_eq!(
            check_code("other@b.com", &code, 1000, 1100, &cfg),
            VerifyOutcome::Rejected
        );
    }

    #[test]
    fn test_replay_within_window_verifies_repeatedly() {
        // Known limitation of the stateless design: nothing marks a
        // challenge as consumed, so the same triple keeps verifying until
        // the window closes.
        let cfg = config();
        let code = code_for("a@b.com", 1000);
        for now in [1100, 1200, 1300] {
            assert_eq!(
                check_code("a@b.com", &code, 1000, now, &cfg),
                VerifyOutcome::Verified
            );
        }
    }

    #[test]
    fn test_future_timestamp_is_not_expired() {
        let cfg = config();
        let code = code_for("a@b.com", 2000);
        assert_eq!(
            check_code("a@b.com", &code, 2000, 1000, &cfg),
            VerifyOutcome::Verified
        );
    }
}
