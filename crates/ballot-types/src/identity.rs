use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Separator between the kind and id components of an [`Identity`].
const SEPARATOR: char = ':';

/// Canonical, globally unique handle for an entity that votes or is voted on.
///
/// An `Identity` is the pair (entity kind, entity id), rendered as
/// `"<Kind>:<id>"`, e.g. `"Post:42"`. The kind may itself contain `::`
/// (module paths such as `"Forum::Thread"`), but the id never contains `:`,
/// so the rendering is collision-free and [`Identity::parse`] inverts it by
/// splitting at the last separator.
///
/// Two identities are equal iff their kind and id match.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity {
    kind: String,
    id: String,
}

impl Identity {
    /// Build an identity from an entity kind and id.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Result<Self, TypeError> {
        let kind = kind.into();
        let id = id.into();
        if kind.is_empty() {
            return Err(TypeError::EmptyKind);
        }
        if id.is_empty() {
            return Err(TypeError::EmptyId { kind });
        }
        if id.contains(SEPARATOR) {
            return Err(TypeError::SeparatorInId { id });
        }
        Ok(Self { kind, id })
    }

    /// Identity for a record with a numeric primary key.
    ///
    /// A numeric id never contains `:`, so `kind` is the only input to
    /// check. Like [`Identity::new`], any non-empty kind is accepted,
    /// including one ending in `:`: parsing splits at the last separator, so
    /// `("A:", 1)` renders as `"A::1"` and parses back to the same pair.
    /// Use [`Identity::new`] when the kind comes from untrusted input.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is empty.
    pub fn record(kind: &str, id: u64) -> Self {
        assert!(!kind.is_empty(), "identity kind must not be empty");
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    /// Parse the `"<Kind>:<id>"` rendering produced by `Display`.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let (kind, id) = s
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| TypeError::Malformed(s.to_string()))?;
        Self::new(kind, id)
    }

    /// The entity kind (type name).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The entity id, unique within its kind.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.kind, self.id)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

impl FromStr for Identity {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_string()
    }
}

/// Anything with a stable [`Identity`].
pub trait Identifiable {
    fn identity(&self) -> Identity;
}

/// Capability of being voted on.
///
/// The engine checks [`Voteable::accepts_votes`] before issuing any
/// mutation; returning `false` (e.g. for a locked or archived subject) makes
/// every cast and clear fail with `InvalidVoteable`.
pub trait Voteable: Identifiable {
    fn accepts_votes(&self) -> bool {
        true
    }
}

/// Capability of casting votes.
///
/// Returning `false` from [`Voter::casts_votes`] makes every cast and clear
/// by this voter fail with `InvalidVoter`.
pub trait Voter: Identifiable {
    fn casts_votes(&self) -> bool {
        true
    }
}

impl Identifiable for Identity {
    fn identity(&self) -> Identity {
        self.clone()
    }
}

impl Voteable for Identity {}

impl Voter for Identity {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_joins_kind_and_id() {
        let id = Identity::record("Post", 42);
        assert_eq!(id.to_string(), "Post:42");
        assert_eq!(id.kind(), "Post");
        assert_eq!(id.id(), "42");
    }

    #[test]
    fn equality_is_kind_and_id() {
        assert_eq!(Identity::record("Post", 1), Identity::new("Post", "1").unwrap());
        assert_ne!(Identity::record("Post", 1), Identity::record("User", 1));
        assert_ne!(Identity::record("Post", 1), Identity::record("Post", 2));
    }

    #[test]
    fn namespaced_kind_round_trips() {
        let id = Identity::new("Forum::Thread", "7").unwrap();
        assert_eq!(id.to_string(), "Forum::Thread:7");
        assert_eq!(Identity::parse("Forum::Thread:7").unwrap(), id);
    }

    #[test]
    fn record_matches_new() {
        assert_eq!(Identity::record("Post", 42), Identity::new("Post", "42").unwrap());
        let trailing = Identity::record("A:", 1);
        assert_eq!(trailing.to_string(), "A::1");
        assert_eq!(Identity::parse("A::1").unwrap(), trailing);
        assert_ne!(trailing, Identity::record("A", 1));
    }

    #[test]
    #[should_panic(expected = "identity kind must not be empty")]
    fn record_rejects_empty_kind() {
        Identity::record("", 1);
    }

    #[test]
    fn rejects_empty_parts() {
        assert_eq!(Identity::new("", "1"), Err(TypeError::EmptyKind));
        assert!(matches!(Identity::new("Post", ""), Err(TypeError::EmptyId { .. })));
    }

    #[test]
    fn rejects_separator_in_id() {
        assert!(matches!(
            Identity::new("Post", "a:b"),
            Err(TypeError::SeparatorInId { .. })
        ));
    }

    #[test]
    fn parse_without_separator_is_malformed() {
        assert!(matches!(Identity::parse("Post42"), Err(TypeError::Malformed(_))));
        assert!(matches!(Identity::parse(":42"), Err(TypeError::EmptyKind)));
    }

    #[test]
    fn serde_uses_string_form() {
        let id = Identity::record("User", 9);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"User:9\"");
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<Identity>("\"nope\"").is_err());
    }

    #[test]
    fn identity_is_both_voter_and_voteable() {
        let id = Identity::record("Post", 3);
        assert!(id.accepts_votes());
        assert!(id.casts_votes());
        assert_eq!(id.identity(), id);
    }

    proptest! {
        #[test]
        fn rendering_is_collision_free(
            k1 in "[A-Za-z:]{1,8}", i1 in "[a-z0-9]{1,6}",
            k2 in "[A-Za-z:]{1,8}", i2 in "[a-z0-9]{1,6}",
        ) {
            let a = Identity::new(k1.clone(), i1.clone()).unwrap();
            let b = Identity::new(k2.clone(), i2.clone()).unwrap();
            prop_assert_eq!(a.to_string() == b.to_string(), k1 == k2 && i1 == i2);
            prop_assert_eq!(Identity::parse(&a.to_string()).unwrap(), a);
        }
    }
}
