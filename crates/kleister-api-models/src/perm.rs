//! Permission grade carried by permissioned associations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grade a user or team holds on a pack, mod or team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Perm {
    /// Regular member.
    User,
    /// May manage the resource.
    Admin,
    /// Full control including membership.
    Owner,
}

impl Perm {
    /// Every accepted grade, lowest first.
    pub const ALL: [Self; 3] = [Self::User, Self::Admin, Self::Owner];

    /// Wire representation of the grade.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }
}

impl Display for Perm {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Raised when a string is not one of `user`, `admin` or `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPerm {
    /// Value supplied by the caller.
    pub value: String,
}

impl Display for InvalidPerm {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "invalid permission '{}', expected one of user, admin, owner",
            self.value
        )
    }
}

impl Error for InvalidPerm {}

impl FromStr for Perm {
    type Err = InvalidPerm;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            other => Err(InvalidPerm {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_grades() {
        for perm in Perm::ALL {
            assert_eq!(perm.as_str().parse::<Perm>(), Ok(perm));
        }
    }

    #[test]
    fn rejects_unknown_and_mixed_case_grades() {
        let err = "superuser".parse::<Perm>().expect_err("unknown grade");
        assert_eq!(err.value, "superuser");
        assert!(err.to_string().contains("user, admin, owner"));
        assert!("Owner".parse::<Perm>().is_err());
    }

    #[test]
    fn grades_are_ordered_as_a_ladder() {
        assert!(Perm::User < Perm::Admin);
        assert!(Perm::Admin < Perm::Owner);
    }

    #[test]
    fn serializes_lowercase() {
        let text = serde_json::to_string(&Perm::Owner).expect("serialize");
        assert_eq!(text, "\"owner\"");
        let parsed: Perm = serde_json::from_str("\"admin\"").expect("deserialize");
        assert_eq!(parsed, Perm::Admin);
        assert!(serde_json::from_str::<Perm>("\"root\"").is_err());
    }
}
