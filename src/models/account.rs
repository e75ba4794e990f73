//! Accounts and editorial roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a user account (owned by the external account directory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A user account as seen by the core: enough to address notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub full_name: String,
    pub email: String,
}

/// The role a user plays with respect to one article.
///
/// Resolved per article by [`crate::roles::RoleResolver`]; journal-wide
/// memberships (editor, typesetter, EO, director) come from the account
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Corresponding author of the article.
    Author,
    /// Listed author who is not the corresponding author.
    Coauthor,
    /// Editor in charge of the article.
    Editor,
    Reviewer,
    Typesetter,
    /// Editorial office staff.
    Eo,
    Director,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Self::Author => "author",
            Self::Coauthor => "coauthor",
            Self::Editor => "editor",
            Self::Reviewer => "reviewer",
            Self::Typesetter => "typesetter",
            Self::Eo => "eo",
            Self::Director => "director",
        };
        write!(f, "{slug}")
    }
}

/// Who is attempting an operation.
///
/// System-driven transitions (submission processing, production checks) are
/// performed by [`Actor::System`]; everything else carries the acting account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Actor {
    System,
    User(AccountId),
}

impl Actor {
    /// The acting account, if this is a user-driven operation.
    pub fn account(&self) -> Option<AccountId> {
        match self {
            Self::System => None,
            Self::User(id) => Some(*id),
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}
