//! Keys under which profiles are cached and persisted.

use std::fmt;

/// The identifier a profile is keyed by, in cache and durable storage alike.
///
/// Two kinds, in order of preference:
///
/// - **Account**: the verified login email. Stable across connections and
///   across server restarts — this is the durable identity.
/// - **Connection**: a transport connection number. Used only when no
///   verified identity exists yet (e.g. a GM command issued before login).
///   *Not* stable across reconnects: a player who drops and reconnects gets
///   a new connection id, so anything keyed this way is effectively
///   session-scoped. Callers relying on connection keys get the weaker
///   guarantee and should know it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserKey {
    /// A verified account identity (the login email).
    Account(String),
    /// A per-connection fallback identity.
    Connection(u64),
}

impl UserKey {
    /// `true` when this key survives reconnects.
    pub fn is_durable(&self) -> bool {
        matches!(self, Self::Account(_))
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(email) => write!(f, "acct:{email}"),
            Self::Connection(id) => write!(f, "conn:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_display() {
        assert_eq!(
            UserKey::Account("a@b.com".into()).to_string(),
            "acct:a@b.com"
        );
        assert_eq!(UserKey::Connection(7).to_string(), "conn:7");
    }

    #[test]
    fn test_user_key_durability() {
        assert!(UserKey::Account("a@b.com".into()).is_durable());
        assert!(!UserKey::Connection(7).is_durable());
    }

    #[test]
    fn test_user_key_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(UserKey::Account("a@b.com".into()), 1);
        map.insert(UserKey::Connection(7), 2);
        assert_eq!(map[&UserKey::Account("a@b.com".into())], 1);
        assert_eq!(map[&UserKey::Connection(7)], 2);
    }
}
