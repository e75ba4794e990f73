//! Account directory collaborator.
//!
//! The surrounding system owns user accounts and journal-wide role
//! memberships; the core queries them through this narrow interface.

use crate::error::{CoreError, Result};
use crate::models::account::{Account, AccountId, Role};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use tracing::warn;

/// Journal-scoped account and role lookups.
///
/// One directory instance answers for exactly one journal: the journal is
/// fixed at construction time, so `eo_account` and `directors` take no
/// journal argument. A multi-journal deployment builds one directory per
/// journal and hands each engine the matching instance.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// The account record for an id.
    async fn account(&self, id: AccountId) -> Result<Account>;

    /// Whether the user holds a journal-wide role (editor, typesetter,
    /// EO, director).
    async fn has_role(&self, user: AccountId, role: Role) -> Result<bool>;

    /// The sole editorial-office account for the journal.
    async fn eo_account(&self) -> Result<AccountId>;

    /// All accounts holding the director role for the journal.
    async fn directors(&self) -> Result<Vec<AccountId>>;
}

/// Resolve "the" director for the journal.
///
/// More than one director indicates a misconfiguration; pick the lowest
/// account id so repeated calls agree, and warn.
pub async fn resolve_director(directory: &dyn AccountDirectory) -> Result<AccountId> {
    let mut directors = directory.directors().await?;
    directors.sort();
    match directors.first() {
        Some(first) => {
            if directors.len() > 1 {
                warn!(
                    director_count = directors.len(),
                    chosen = %first,
                    "journal has more than one director, picking lowest account id"
                );
            }
            Ok(*first)
        }
        None => Err(CoreError::MissingDirector),
    }
}

/// In-memory directory for tests and single-process deployments.
#[derive(Default)]
pub struct InMemoryDirectory {
    accounts: DashMap<AccountId, Account>,
    roles: DashMap<AccountId, HashSet<Role>>,
    eo: parking_lot::RwLock<Option<AccountId>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, account: Account, roles: impl IntoIterator<Item = Role>) {
        let id = account.id;
        self.accounts.insert(id, account);
        self.roles.insert(id, roles.into_iter().collect());
    }

    pub fn grant_role(&self, user: AccountId, role: Role) {
        self.roles.entry(user).or_default().insert(role);
    }

    pub fn set_eo(&self, eo: AccountId) {
        *self.eo.write() = Some(eo);
    }
}

#[async_trait]
impl AccountDirectory for InMemoryDirectory {
    async fn account(&self, id: AccountId) -> Result<Account> {
        self.accounts
            .get(&id)
            .map(|a| a.clone())
            .ok_or(CoreError::UnknownAccount(id))
    }

    async fn has_role(&self, user: AccountId, role: Role) -> Result<bool> {
        Ok(self
            .roles
            .get(&user)
            .map(|r| r.contains(&role))
            .unwrap_or(false))
    }

    async fn eo_account(&self) -> Result<AccountId> {
        (*self.eo.read()).ok_or(CoreError::MissingEoAccount)
    }

    async fn directors(&self) -> Result<Vec<AccountId>> {
        Ok(self
            .roles
            .iter()
            .filter(|entry| entry.value().contains(&Role::Director))
            .map(|entry| *entry.key())
            .collect())
    }
}
