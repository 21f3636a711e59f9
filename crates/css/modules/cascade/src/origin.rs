//! Style origins.
//! Spec: <https://www.w3.org/TR/css-cascade-5/#cascading-origins>

use serde::{Deserialize, Serialize};

/// Where a declaration came from.
///
/// The resolver itself never ranks origins; candidates are expected to be
/// pre-filtered to a single origin tier by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    UserAgent,
    User,
    #[default]
    Author,
}

impl Origin {
    /// Precedence tier of this origin for the given importance.
    ///
    /// Normal: UA < User < Author. Important reverses the origins and sits
    /// above every normal tier.
    /// Spec: Section 6.1, cascade sorting order by origin and importance
    #[inline]
    pub const fn tier(self, important: bool) -> u8 {
        match (important, self) {
            (false, Self::UserAgent) => 0,
            (false, Self::User) => 1,
            (false, Self::Author) => 2,
            (true, Self::Author) => 3,
            (true, Self::User) => 4,
            (true, Self::UserAgent) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn important_reverses_origin_tiers() {
        assert!(Origin::Author.tier(false) > Origin::User.tier(false));
        assert!(Origin::User.tier(false) > Origin::UserAgent.tier(false));
        assert!(Origin::UserAgent.tier(true) > Origin::User.tier(true));
        assert!(Origin::User.tier(true) > Origin::Author.tier(true));
        assert!(Origin::Author.tier(true) > Origin::Author.tier(false));
    }

    #[test]
    fn origins_use_kebab_case_in_json() -> Result<(), serde_json::Error> {
        let origin: Origin = serde_json::from_str("\"user-agent\"")?;
        assert_eq!(origin, Origin::UserAgent);
        assert_eq!(serde_json::to_string(&Origin::Author)?, "\"author\"");
        Ok(())
    }
}
