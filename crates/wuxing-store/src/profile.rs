//! The player profile: the progression data behind an account.

use serde::{Deserialize, Serialize};
use wuxing_protocol::Elements;

/// A player's progression data.
///
/// Created on first successful verification, loaded from durable storage or
/// the session cache on later logins, mutated by gameplay and GM commands,
/// and persisted back opportunistically after mutation.
///
/// Invariants: `level ≥ 1`, `experience ≥ 0`, `gold ≥ 0`, and the element
/// map is always fully populated ([`Elements`] is a fixed five-field
/// struct, so partial maps are unrepresentable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Display name. Starts as a generated placeholder; mutable.
    pub nickname: String,
    pub level: u32,
    pub experience: i64,
    pub gold: i64,
    pub elements: Elements,
}

/// Starting gold for a brand-new profile.
pub(crate) const STARTING_GOLD: i64 = 100;

impl PlayerProfile {
    /// Builds a new profile with creation defaults: level 1, no experience,
    /// 100 gold, all five element counters at zero.
    pub fn create_new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            level: 1,
            experience: 0,
            gold: STARTING_GOLD,
            elements: Elements::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_new_defaults() {
        let profile = PlayerProfile::create_new("Player1234");
        assert_eq!(profile.nickname, "Player1234");
        assert_eq!(profile.level, 1);
        assert_eq!(profile.experience, 0);
        assert_eq!(profile.gold, 100);
        assert_eq!(profile.elements, Elements::default());
    }
}
