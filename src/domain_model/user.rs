use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(UserId)
    }
}

/// Role flags held by a user. A user may hold none, one or both.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub admin: bool,
    pub moderator: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        admin: false,
        moderator: false,
    };

    pub const ADMIN: Capabilities = Capabilities {
        admin: true,
        moderator: false,
    };

    pub const MODERATOR: Capabilities = Capabilities {
        admin: false,
        moderator: true,
    };

    /// Admins and moderators may act on other users' records and content.
    pub fn can_moderate(&self) -> bool {
        self.admin || self.moderator
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub capabilities: Capabilities,
    pub blocked: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.capabilities.admin
    }

    pub fn is_moderator(&self) -> bool {
        self.capabilities.moderator
    }

    /// True when `self` is the owner of `other`, or holds a moderating role.
    pub fn may_act_on(&self, other: UserId) -> bool {
        self.user_id == other || self.capabilities.can_moderate()
    }
}

/// A user that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilterOptions {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
}

impl UserFilterOptions {
    pub fn username(&self) -> Option<&str> {
        non_empty(&self.username)
    }

    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }

    pub fn first_name(&self) -> Option<&str> {
        non_empty(&self.first_name)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.username().is_none() && self.email().is_none() && self.first_name().is_none()
    }

    /// Conjunction of every non-empty predicate, each a substring match.
    pub fn matches(&self, user: &User) -> bool {
        let check = |needle: Option<&str>, haystack: &str| match needle {
            Some(needle) => haystack.contains(needle),
            None => true,
        };

        check(self.username(), &user.username)
            && check(self.email(), &user.email)
            && check(self.first_name(), &user.first_name)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
