//! Local email-address syntax check.

/// Checks that `email` looks like `local@host.tld`.
///
/// This is the same lightweight rule the UI applies before sending a code
/// request: non-empty local part, exactly one `@`, a dot in the domain
/// with characters on both sides, no whitespace anywhere. It is a syntax
/// gate, not identity validation — the code email is what proves the
/// address is real.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_addresses() {
        for email in [
            "a@b.com",
            "user.name+tag@example.co.uk",
            "2@163.com",
            "x@y.z",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for email in [
            "",
            "plainaddress",
            "@no-local.com",
            "no-domain@",
            "no-tld@host",
            "empty-host@.com",
            "empty-tld@host.",
            "two@@signs.com",
            "spaces in@local.com",
            "spaces@in domain.com",
        ] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }
}
