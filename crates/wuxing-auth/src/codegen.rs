//! Deterministic one-time-code generation.
//!
//! A code is a pure function of (identity, issue time, salt). No state, no
//! randomness: any party holding the same three inputs computes the same
//! code, which is what lets the server verify without persisting issued
//! challenges.

use sha2::{Digest, Sha256};

/// Generates the 6-digit verification code for an identity at an issue time.
///
/// The seed is `"{identity}:{issued_at}:{salt}"`. Its SHA-256 digest is
/// reduced to a 32-bit integer (first four bytes, big-endian), mapped to the
/// non-negative range, and taken modulo 1,000,000 — then zero-padded to
/// exactly six decimal digits.
///
/// A 6-digit space is guessable by brute force; the protocol compensates by
/// binding validity to a short window ([`check_code`](crate::check_code)),
/// not by making the code unguessable.
///
/// ```rust
/// use wuxing_auth::generate_code;
///
/// let a = generate_code("a@b.com", 1700000000, "salt");
/// let b = generate_code("a@b.com", 1700000000, "salt");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 6);
/// ```
pub fn generate_code(identity: &str, issued_at: i64, salt: &str) -> String {
    let seed = format!("{identity}:{issued_at}:{salt}");
    let digest = Sha256::digest(seed.as_bytes());

    // First four digest bytes as a signed 32-bit word, folded into the
    // non-negative range. `unsigned_abs` rather than `abs`: i32::MIN has no
    // positive counterpart.
    let word =
        i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let code = word.unsigned_abs() % 1_000_000;

    format!("{code:06}")
}
